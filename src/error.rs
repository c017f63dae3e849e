use gdal::errors::GdalError;

use crate::config::ConfigError;

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Columns,
    Rows,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Columns => write!(f, "Columns"),
            Axis::Rows => write!(f, "Rows"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ValidationError {
    NotDivisible {
        axis: Axis,
        size: usize,
        tile: usize,
    },
    SampleDepth {
        band: usize,
        found: String,
    },
    BandOutOfRange {
        band: usize,
        count: usize,
    },
    MissingGeoTransform,
    ImageTooLarge {
        width: usize,
        height: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotDivisible { axis, size, tile } => {
                write!(f, "{} ({}) are not evenly divisible by {}", axis, size, tile)
            }
            ValidationError::SampleDepth { band, found } => {
                write!(f, "Unexpected data type in band {}: {}", band, found)
            }
            ValidationError::BandOutOfRange { band, count } => {
                write!(f, "Band {} requested but raster only has {} bands", band, count)
            }
            ValidationError::MissingGeoTransform => write!(f, "Could not read geo transform"),
            ValidationError::ImageTooLarge { width, height } => {
                write!(f, "Image of {}x{} pixels exceeds PNG size limits", width, height)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum ProcessError {
    Config(ConfigError),
    Validation {
        path: PathBuf,
        error: ValidationError,
    },
    Open {
        path: PathBuf,
        source: GdalError,
    },
    Read {
        path: PathBuf,
        source: GdalError,
    },
    Write {
        path: PathBuf,
        source: GdalError,
    },
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    PathTooLong {
        path: PathBuf,
        limit: usize,
    },
    SpatialRef {
        epsg: u32,
        source: GdalError,
    },
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}

impl ProcessError {
    /// Open and read failures may be skipped depending on the failure policy.
    /// Everything else always aborts the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProcessError::Open { .. } | ProcessError::Read { .. })
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Config(e) => write!(f, "{}", e),
            ProcessError::Validation { path, error } => {
                write!(f, "{}: {}", path.display(), error)
            }
            ProcessError::Open { path, source } => {
                write!(f, "Failed to open file '{}': {}", path.display(), source)
            }
            ProcessError::Read { path, source } => {
                write!(f, "Encountered I/O error reading '{}': {}", path.display(), source)
            }
            ProcessError::Write { path, source } => {
                write!(f, "Could not write raster '{}': {}", path.display(), source)
            }
            ProcessError::Encode { path, source } => {
                write!(f, "Could not encode image '{}': {}", path.display(), source)
            }
            ProcessError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path.display(), source)
            }
            ProcessError::PathTooLong { path, limit } => write!(
                f,
                "Output file path longer than {} bytes: {}",
                limit,
                path.display()
            ),
            ProcessError::SpatialRef { epsg, source } => {
                write!(f, "Could not create spatial reference EPSG:{}: {}", epsg, source)
            }
            ProcessError::Pattern { pattern, source } => {
                write!(f, "Invalid file pattern '{}': {}", pattern, source)
            }
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Config(e) => Some(e),
            ProcessError::Validation { error, .. } => Some(error),
            ProcessError::Open { source, .. }
            | ProcessError::Read { source, .. }
            | ProcessError::Write { source, .. }
            | ProcessError::SpatialRef { source, .. } => Some(source),
            ProcessError::Encode { source, .. } => Some(source),
            ProcessError::Io { source, .. } => Some(source),
            ProcessError::Pattern { source, .. } => Some(source),
            ProcessError::PathTooLong { .. } => None,
        }
    }
}

impl From<ConfigError> for ProcessError {
    fn from(err: ConfigError) -> ProcessError {
        ProcessError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_open_and_read_are_recoverable() {
        let path = PathBuf::from("a.tif");
        let open = ProcessError::Open {
            path: path.clone(),
            source: GdalError::BadArgument("missing".to_string()),
        };
        let read = ProcessError::Read {
            path: path.clone(),
            source: GdalError::BadArgument("short read".to_string()),
        };
        let validation = ProcessError::Validation {
            path: path.clone(),
            error: ValidationError::MissingGeoTransform,
        };
        let too_long = ProcessError::PathTooLong { path, limit: 1024 };

        assert!(open.is_recoverable());
        assert!(read.is_recoverable());
        assert!(!validation.is_recoverable());
        assert!(!too_long.is_recoverable());
    }

    #[test]
    fn test_display_not_divisible() {
        let error = ValidationError::NotDivisible {
            axis: Axis::Columns,
            size: 1000,
            tile: 256,
        };
        assert_eq!(
            error.to_string(),
            "Columns (1000) are not evenly divisible by 256"
        );
    }
}
