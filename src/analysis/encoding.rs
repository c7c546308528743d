//! Turning version bytes into text.

use crate::error::DecodeError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Character encodings accepted for source files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, normalizing CRLF and lone CR line endings to LF.
    ///
    /// Content holding a NUL byte is treated as binary and rejected.
    pub fn decode(self, bytes: &[u8]) -> Result<String, DecodeError> {
        if let Some(offset) = bytes.iter().position(|&b| b == 0) {
            return Err(DecodeError::Binary { offset });
        }

        let text = match self {
            Self::Utf8 => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(body)
                    .map_err(|e| DecodeError::InvalidUtf8 {
                        offset: e.valid_up_to() + (bytes.len() - body.len()),
                    })?
                    .to_string()
            }
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        };

        Ok(normalize_line_endings(text))
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(DecodeError::UnsupportedEncoding(s.to_string())),
        }
    }
}

fn normalize_line_endings(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings_normalized() {
        let text = TextEncoding::Utf8.decode(b"a\r\nb\rc\n").expect("valid text");
        assert_eq!(text, "a\nb\nc\n");
    }

    #[test]
    fn test_bom_dropped() {
        let text = TextEncoding::Utf8.decode(b"\xEF\xBB\xBFint x;").expect("valid text");
        assert_eq!(text, "int x;");
    }

    #[test]
    fn test_binary_rejected() {
        let err = TextEncoding::Latin1.decode(b"ab\0cd").expect_err("binary");
        assert_eq!(err, DecodeError::Binary { offset: 2 });
    }

    #[test]
    fn test_invalid_utf8_offset() {
        let err = TextEncoding::Utf8.decode(b"ok\xFFno").expect_err("invalid");
        assert_eq!(err, DecodeError::InvalidUtf8 { offset: 2 });
    }

    #[test]
    fn test_latin1_maps_every_byte() {
        let text = TextEncoding::Latin1.decode(b"caf\xE9").expect("latin-1 never fails");
        assert_eq!(text, "caf\u{e9}");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("UTF8".parse::<TextEncoding>(), Ok(TextEncoding::Utf8));
        assert_eq!("iso-8859-1".parse::<TextEncoding>(), Ok(TextEncoding::Latin1));
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }
}
