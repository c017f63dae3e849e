use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ProcessError;

pub const MAX_OUTPUT_PATH_LEN: usize = 1024;

/// Joins `file_name` onto `dir`, rejecting paths that reach the length bound.
pub fn output_path(dir: &Path, file_name: &str) -> Result<PathBuf, ProcessError> {
    let path = dir.join(file_name);
    if path.as_os_str().len() >= MAX_OUTPUT_PATH_LEN {
        return Err(ProcessError::PathTooLong {
            path,
            limit: MAX_OUTPUT_PATH_LEN,
        });
    }
    Ok(path)
}

/// Removes the file at `path` when dropped, unless it was committed.
#[derive(Debug)]
pub struct PartialOutput {
    path: PathBuf,
    committed: bool,
}

impl PartialOutput {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if fs::remove_file(&self.path).is_ok() {
            debug!("Removed partial output {}", self.path.display());
        }
    }
}
