//! Source collection for comparison runs.
//!
//! Every root is either a single file or a directory tree. Trees are walked
//! with `walkdir` and their files paired up by relative path; a file missing
//! from some root becomes an absent version there.

use super::PipelineError;
use indexmap::IndexMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// One file to analyze, with its location in each compared root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the roots, `/`-separated
    pub path: String,
    /// Location per root, oldest first; `None` where the file is absent
    pub versions: Vec<Option<PathBuf>>,
}

impl SourceFile {
    /// Prepend an absent version, so every line of the file counts as added.
    #[must_use]
    pub fn against_nothing(mut self) -> Self {
        self.versions.insert(0, None);
        self
    }
}

/// Relative paths of the regular files under `root`, in name order.
pub fn collect_files(root: &Path) -> Result<Vec<String>, PipelineError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| PipelineError::SourcesFailed {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        files.push(parts.join("/"));
    }
    Ok(files)
}

/// Whether file names in `dir` are case-sensitive.
///
/// Creates a uniquely named mixed-case file and checks whether its
/// case-flipped name resolves. The probe file is removed afterwards.
pub fn probe_case_sensitivity(dir: &Path) -> std::io::Result<bool> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let name = format!(".locDiff-CaseProbe-{}-{nanos}", std::process::id());
    let probe = dir.join(&name);
    OpenOptions::new().write(true).create_new(true).open(&probe)?;

    let flipped: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect();
    let sensitive = !dir.join(flipped).exists();

    std::fs::remove_file(&probe)?;
    Ok(sensitive)
}

/// Pair the files of several roots by relative path.
///
/// When `case_sensitive` is false, paths differing only in case are the
/// same file; the name seen first is reported. Output is sorted by path.
pub fn pair_sources(
    roots: &[PathBuf],
    case_sensitive: bool,
) -> Result<Vec<SourceFile>, PipelineError> {
    if roots.iter().all(|root| root.is_file()) {
        let path = roots
            .last()
            .and_then(|root| root.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(vec![SourceFile {
            path,
            versions: roots.iter().cloned().map(Some).collect(),
        }]);
    }

    let mut paired: IndexMap<String, SourceFile> = IndexMap::new();
    for (index, root) in roots.iter().enumerate() {
        if !root.is_dir() {
            return Err(PipelineError::SourcesFailed {
                path: root.clone(),
                message: "cannot compare a file with a directory".to_string(),
            });
        }
        for relative in collect_files(root)? {
            let key = if case_sensitive {
                relative.clone()
            } else {
                relative.to_lowercase()
            };
            let location = root.join(&relative);
            let entry = paired.entry(key).or_insert_with(|| SourceFile {
                path: relative.clone(),
                versions: vec![None; roots.len()],
            });
            if entry.versions[index].is_some() {
                tracing::warn!(
                    "{} collides with {} in {}; keeping {}",
                    relative,
                    entry.path,
                    root.display(),
                    relative
                );
            }
            entry.versions[index] = Some(location);
        }
    }

    let mut sources: Vec<SourceFile> = paired.into_values().collect();
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

/// Directory whose file system decides name matching, if names need pairing.
///
/// A single root is never paired, so nothing is written into it.
fn case_check_root(roots: &[PathBuf]) -> Option<&PathBuf> {
    if roots.len() < 2 {
        return None;
    }
    roots.iter().rev().find(|root| root.is_dir())
}

/// Check the roots exist, probe the last tree's case sensitivity and pair.
pub fn resolve_sources(roots: &[PathBuf]) -> Result<Vec<SourceFile>, PipelineError> {
    for root in roots {
        if !root.exists() {
            return Err(PipelineError::SourcesFailed {
                path: root.clone(),
                message: "no such file or directory".to_string(),
            });
        }
    }

    let case_sensitive = match case_check_root(roots) {
        Some(target) => probe_case_sensitivity(target).unwrap_or_else(|e| {
            tracing::warn!(
                "Cannot probe case sensitivity of {}: {}; assuming case-sensitive",
                target.display(),
                e
            );
            true
        }),
        None => true,
    };
    tracing::debug!("Case-sensitive file names: {}", case_sensitive);

    pair_sources(roots, case_sensitive)
}
