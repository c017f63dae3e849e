use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod band_selection;
pub use band_selection::BandSelection;

pub mod error;
pub use error::ConfigError;

pub mod failure_policy;
pub use failure_policy::FailurePolicy;

/// Source orthophotos carry no spatial reference, so tiles are stamped with
/// ETRS89 / UTM zone 33N unless told otherwise.
pub const DEFAULT_EPSG: u32 = 25833;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    pub rows: usize,
    pub cols: usize,
}

impl TileSize {
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if rows == 0 {
            return Err(ConfigError::ZeroTileSize("rows"));
        }
        if cols == 0 {
            return Err(ConfigError::ZeroTileSize("columns"));
        }
        Ok(TileSize { rows, cols })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    input_dir: Option<PathBuf>,
    output_dir: PathBuf,
    tile_size: Option<TileSize>,
    prefix: Option<String>,
    bands: Option<BandSelection>,
    epsg: u32,
    quiet: bool,
    tile_failure: FailurePolicy,
    convert_failure: FailurePolicy,
}

// Values are validated while deserializing so a bad config file fails before
// any raster is opened.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            input_dir: Option<PathBuf>,
            output_dir: PathBuf,
            tile_rows: Option<usize>,
            tile_cols: Option<usize>,
            prefix: Option<String>,
            bands: Option<BandSelection>,
            epsg: Option<u32>,
            #[serde(default)]
            quiet: bool,
            on_tile_error: Option<FailurePolicy>,
            on_convert_error: Option<FailurePolicy>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let tile_size = match (helper.tile_rows, helper.tile_cols) {
            (None, None) => None,
            (Some(rows), Some(cols)) => Some(TileSize::new(rows, cols).map_err(D::Error::custom)?),
            _ => return Err(D::Error::custom(ConfigError::MissingTileSize)),
        };

        let mut config = Config::new(helper.output_dir);
        config.input_dir = helper.input_dir;
        config.tile_size = tile_size;
        config.prefix = helper.prefix;
        config.bands = helper.bands;
        config.quiet = helper.quiet;
        if let Some(epsg) = helper.epsg {
            config.epsg = epsg;
        }
        if let Some(policy) = helper.on_tile_error {
            config.tile_failure = policy;
        }
        if let Some(policy) = helper.on_convert_error {
            config.convert_failure = policy;
        }

        Ok(config)
    }
}

impl Config {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            input_dir: None,
            output_dir: output_dir.into(),
            tile_size: None,
            prefix: None,
            bands: None,
            epsg: DEFAULT_EPSG,
            quiet: false,
            tile_failure: FailurePolicy::FailFast,
            convert_failure: FailurePolicy::Skip,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn with_input_dir<P: Into<PathBuf>>(mut self, input_dir: P) -> Self {
        self.input_dir = Some(input_dir.into());
        self
    }

    pub fn with_tile_size(mut self, tile_size: TileSize) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_bands(mut self, bands: BandSelection) -> Self {
        self.bands = Some(bands);
        self
    }

    pub fn with_epsg(mut self, epsg: u32) -> Self {
        self.epsg = epsg;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_tile_failure(mut self, policy: FailurePolicy) -> Self {
        self.tile_failure = policy;
        self
    }

    pub fn with_convert_failure(mut self, policy: FailurePolicy) -> Self {
        self.convert_failure = policy;
        self
    }

    pub fn input_dir(&self) -> Result<&Path, ConfigError> {
        self.input_dir.as_deref().ok_or(ConfigError::MissingInputDir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn tile_size(&self) -> Result<TileSize, ConfigError> {
        self.tile_size.ok_or(ConfigError::MissingTileSize)
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    pub fn bands(&self) -> Result<BandSelection, ConfigError> {
        self.bands.ok_or(ConfigError::MissingBands)
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn tile_failure(&self) -> FailurePolicy {
        self.tile_failure
    }

    pub fn convert_failure(&self) -> FailurePolicy {
        self.convert_failure
    }

    pub fn check_output_dir(&self) -> Result<(), ConfigError> {
        if self.output_dir.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::OutputDir(self.output_dir.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let mut file = File::create(&file_path).unwrap();

        let config_data = r#"
    {
        "input_dir": "/data/jp2",
        "output_dir": "/data/tiles",
        "tile_rows": 256,
        "tile_cols": 512,
        "prefix": "berlin-",
        "bands": [3, 2, 1],
        "on_convert_error": "fail"
    }
    "#;

        file.write_all(config_data.as_bytes()).unwrap();

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.input_dir().unwrap(), Path::new("/data/jp2"));
        assert_eq!(config.tile_size().unwrap(), TileSize { rows: 256, cols: 512 });
        assert_eq!(config.prefix(), "berlin-");
        assert_eq!(config.bands().unwrap().indices(), [3, 2, 1]);
        assert_eq!(config.epsg(), DEFAULT_EPSG);
        assert_eq!(config.tile_failure(), FailurePolicy::FailFast);
        assert_eq!(config.convert_failure(), FailurePolicy::FailFast);
        assert!(!config.quiet());
    }

    #[test]
    fn test_zero_tile_size_is_rejected() {
        let result: Result<Config, _> = serde_json::from_str(
            r#"{ "output_dir": "/tmp", "tile_rows": 0, "tile_cols": 256 }"#,
        );
        assert!(result.is_err());

        assert!(matches!(
            TileSize::new(256, 0),
            Err(ConfigError::ZeroTileSize("columns"))
        ));
    }

    #[test]
    fn test_half_specified_tile_size_is_rejected() {
        let result: Result<Config, _> =
            serde_json::from_str(r#"{ "output_dir": "/tmp", "tile_rows": 256 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_misspelled_key_is_rejected() {
        let result: Result<Config, _> = serde_json::from_str(
            r#"{ "output_dir": "/tmp", "on_tile_eror": "skip" }"#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("on_tile_eror"), "{}", err);
    }

    #[test]
    fn test_wrong_band_count_is_rejected() {
        let result: Result<Config, _> =
            serde_json::from_str(r#"{ "output_dir": "/tmp", "bands": [1, 2] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = Config::new("/out");
        assert_eq!(config.epsg(), 25833);
        assert_eq!(config.prefix(), "");
        assert_eq!(config.tile_failure(), FailurePolicy::FailFast);
        assert_eq!(config.convert_failure(), FailurePolicy::Skip);
        assert!(matches!(config.tile_size(), Err(ConfigError::MissingTileSize)));
        assert!(matches!(config.bands(), Err(ConfigError::MissingBands)));

        let config = config
            .with_epsg(4326)
            .with_prefix(Some("p_".to_string()))
            .with_tile_failure(FailurePolicy::Skip);
        assert_eq!(config.epsg(), 4326);
        assert_eq!(config.prefix(), "p_");
        assert_eq!(config.tile_failure(), FailurePolicy::Skip);
    }

    #[test]
    fn test_check_output_dir() {
        let dir = tempdir().unwrap();
        assert!(Config::new(dir.path()).check_output_dir().is_ok());
        assert!(
            Config::new(dir.path().join("missing"))
                .check_output_dir()
                .is_err()
        );
    }
}
