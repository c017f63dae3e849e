use log::warn;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ProcessError;

/// What a batch does when a source file cannot be opened or read.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole batch.
    #[serde(rename(deserialize = "fail"))]
    FailFast,
    /// Log a warning and continue with the next file.
    #[serde(rename(deserialize = "skip"))]
    Skip,
}

impl FailurePolicy {
    /// Turns a skippable failure on `path` into `Ok(None)` under `Skip`.
    pub fn apply<T>(
        self,
        path: &Path,
        result: Result<T, ProcessError>,
    ) -> Result<Option<T>, ProcessError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() && self == FailurePolicy::Skip => {
                warn!("Skipping '{}': {}", path.display(), e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug)]
pub struct FailurePolicyParseError(String);

impl fmt::Display for FailurePolicyParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid failure policy '{}', expected 'fail' or 'skip'", self.0)
    }
}

impl std::error::Error for FailurePolicyParseError {}

impl FromStr for FailurePolicy {
    type Err = FailurePolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(FailurePolicy::FailFast),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(FailurePolicyParseError(other.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailurePolicy::FailFast => write!(f, "fail"),
            FailurePolicy::Skip => write!(f, "skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("fail".parse::<FailurePolicy>().unwrap(), FailurePolicy::FailFast);
        assert_eq!("skip".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_apply_policy() {
        let path = Path::new("tile.tif");
        let open_error = || -> Result<u8, ProcessError> {
            Err(ProcessError::Open {
                path: path.to_path_buf(),
                source: gdal::errors::GdalError::BadArgument("gone".to_string()),
            })
        };
        let too_long = || -> Result<u8, ProcessError> {
            Err(ProcessError::PathTooLong {
                path: path.to_path_buf(),
                limit: 1024,
            })
        };

        assert_eq!(FailurePolicy::Skip.apply(path, Ok(1)).unwrap(), Some(1));
        assert_eq!(FailurePolicy::Skip.apply(path, open_error()).unwrap(), None);
        assert!(FailurePolicy::FailFast.apply(path, open_error()).is_err());
        assert!(FailurePolicy::Skip.apply(path, too_long()).is_err());
    }

    #[test]
    fn test_deserialize_policy() {
        let policy: FailurePolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(policy, FailurePolicy::Skip);
    }
}
