use gdal::raster::GdalDataType;
use gdal::{Dataset, GeoTransform};
use std::path::{Path, PathBuf};

use crate::error::{ProcessError, ValidationError};

/// A source raster opened read-only through GDAL.
pub struct SourceDataset {
    path: PathBuf,
    dataset: Dataset,
}

impl SourceDataset {
    pub fn open(path: &Path) -> Result<Self, ProcessError> {
        let dataset = Dataset::open(path).map_err(|source| ProcessError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            dataset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// (columns, rows)
    pub fn raster_size(&self) -> (usize, usize) {
        self.dataset.raster_size()
    }

    pub fn band_count(&self) -> usize {
        self.dataset.raster_count()
    }

    pub fn geo_transform(&self) -> Result<GeoTransform, ProcessError> {
        self.dataset
            .geo_transform()
            .map_err(|_| self.invalid(ValidationError::MissingGeoTransform))
    }

    /// Fails unless `index` (1-based) names an existing 8-bit unsigned band.
    pub fn ensure_byte_band(&self, index: usize) -> Result<(), ProcessError> {
        let count = self.band_count();
        if index == 0 || index > count {
            return Err(self.invalid(ValidationError::BandOutOfRange { band: index, count }));
        }

        let band = self.dataset.rasterband(index).map_err(|e| self.read_error(e))?;
        let band_type = band.band_type();
        if band_type != GdalDataType::UInt8 {
            return Err(self.invalid(ValidationError::SampleDepth {
                band: index,
                found: format!("{:?}", band_type),
            }));
        }

        Ok(())
    }

    /// Reads a whole band row-major with stride = columns.
    pub fn read_byte_band(&self, index: usize) -> Result<Vec<u8>, ProcessError> {
        self.ensure_byte_band(index)?;

        let size = self.raster_size();
        let band = self.dataset.rasterband(index).map_err(|e| self.read_error(e))?;
        let buffer = band
            .read_as::<u8>((0, 0), size, size, None)
            .map_err(|e| self.read_error(e))?;

        let (_, data) = buffer.into_shape_and_vec();
        Ok(data)
    }

    pub(crate) fn invalid(&self, error: ValidationError) -> ProcessError {
        ProcessError::Validation {
            path: self.path.clone(),
            error,
        }
    }

    fn read_error(&self, source: gdal::errors::GdalError) -> ProcessError {
        ProcessError::Read {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{NORTH_UP, pattern_band, write_fixture};
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let result = SourceDataset::open(&dir.path().join("missing.jp2"));
        assert!(matches!(result, Err(ProcessError::Open { .. })));
    }

    #[test]
    fn test_read_byte_band() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("source.tif");
        let bands = vec![pattern_band(6, 4, 0), pattern_band(6, 4, 1)];
        write_fixture(&path, 6, 4, &bands, Some(&NORTH_UP));

        let dataset = SourceDataset::open(&path).unwrap();
        assert_eq!(dataset.raster_size(), (6, 4));
        assert_eq!(dataset.band_count(), 2);
        assert_eq!(dataset.geo_transform().unwrap(), NORTH_UP);
        assert_eq!(dataset.read_byte_band(2).unwrap(), bands[1]);
    }

    #[test]
    fn test_band_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("source.tif");
        write_fixture(&path, 2, 2, &[pattern_band(2, 2, 0)], Some(&NORTH_UP));

        let dataset = SourceDataset::open(&path).unwrap();
        for band in [0, 2] {
            assert!(matches!(
                dataset.ensure_byte_band(band),
                Err(ProcessError::Validation {
                    error: ValidationError::BandOutOfRange { .. },
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_non_byte_band_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("uint16.tif");
        write_fixture(&path, 2, 2, &[vec![1u16, 2, 3, 4]], Some(&NORTH_UP));

        let dataset = SourceDataset::open(&path).unwrap();
        assert!(matches!(
            dataset.read_byte_band(1),
            Err(ProcessError::Validation {
                error: ValidationError::SampleDepth { band: 1, .. },
                ..
            })
        ));
    }
}
