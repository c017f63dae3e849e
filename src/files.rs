use glob::{MatchOptions, Pattern};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ProcessError;

/// Orthophoto archives consumed by the tiling pass.
pub const TILING_PATTERNS: &[&str] = &["*.jp2", "*.ecw"];
/// Intermediate tiles consumed by the compositing pass.
pub const COMPOSITE_PATTERNS: &[&str] = &["*.tif"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub base_name: String,
}

impl SourceFile {
    /// Returns `None` for paths without a file name.
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Option<Self> {
        let path = path.into();
        let base_name = path.file_stem()?.to_string_lossy().into_owned();
        Some(SourceFile { path, base_name })
    }
}

/// Lists the files directly inside `directory` whose names match one of
/// `patterns`, ordered by path.
pub fn gather_files(directory: &Path, patterns: &[&str]) -> Result<Vec<SourceFile>, ProcessError> {
    let patterns = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ProcessError::Pattern {
                pattern: p.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Only an unreadable input directory is fatal.
            Err(e) if e.depth() == 0 => {
                return Err(ProcessError::Io {
                    path: directory.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                warn!("Ignoring unreadable entry in {}: {}", directory.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matched = {
            let file_name = entry.file_name().to_string_lossy();
            patterns.iter().any(|p| p.matches_with(&file_name, options))
        };
        if !matched {
            debug!("Ignoring {}", entry.path().display());
            continue;
        }

        if let Some(file) = SourceFile::from_path(entry.into_path()) {
            files.push(file);
        }
    }

    Ok(files)
}
