//! Count command handler.
//!
//! Counts one file or tree by comparing it against nothing, so every
//! significant line is reported as added.

use crate::config::CompareConfig;
use crate::filter::FilterRegistry;
use crate::pipeline::{
    compare_sources, exit_codes, output_report, resolve_sources, PipelineError, SourceFile,
};
use anyhow::Result;

/// Run the count command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_count(config: CompareConfig, registry: &FilterRegistry) -> Result<i32> {
    let [root] = config.versions.as_slice() else {
        anyhow::bail!("count takes exactly one path, got {}", config.versions.len());
    };

    let quiet = config.behavior.quiet;
    if !quiet {
        tracing::info!("Counting {}", root.display());
    }

    let sources: Vec<SourceFile> = resolve_sources(std::slice::from_ref(root))?
        .into_iter()
        .map(SourceFile::against_nothing)
        .collect();
    let labels = vec!["empty".to_string(), "current".to_string()];

    // Identical-file skipping never applies: an empty version differs from any file.
    let comparison = compare_sources(&sources, &labels, registry, &config.analysis, quiet);

    output_report(&config, &comparison)
        .map_err(|source| PipelineError::ReportFailed { source })?;

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::reports::ReportFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_count_tree() {
        let dir = TempDir::new().expect("temp dir");
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("src")).expect("mkdir");
        fs::write(tree.join("src/main.c"), "int main() {\n  // note\n\n  return 0;\n}\n")
            .expect("write");
        fs::write(tree.join("run.sh"), "#!/bin/sh\necho hi\n").expect("write");

        let out = dir.path().join("count.txt");
        let app = AppConfig::builder()
            .output_format(ReportFormat::Count)
            .output_file(Some(out.clone()))
            .quiet(true)
            .build();
        let config = CompareConfig::from_app_config(&app, vec![tree]).expect("valid config");
        let registry = FilterRegistry::builtin().expect("builtin filters");

        assert_eq!(run_count(config, &registry).expect("runs"), exit_codes::SUCCESS);
        // main.c: 3 code lines; run.sh: the shebang is a comment, one echo line.
        assert_eq!(fs::read_to_string(out).expect("reads"), "4\n");
    }

    #[test]
    fn test_count_takes_one_path() {
        let app = AppConfig::default();
        let config = CompareConfig::from_app_config(&app, Vec::new()).expect("valid config");
        let registry = FilterRegistry::builtin().expect("builtin filters");
        assert!(run_count(config, &registry).is_err());
    }
}
