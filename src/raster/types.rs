use gdal::GeoTransform;
use log::debug;
use std::fmt;
use std::path::Path;

use super::SourceDataset;
use crate::config::TileSize;
use crate::error::{Axis, ProcessError, ValidationError};

/// A source raster fully materialised into band-sequential buffers.
#[derive(Debug)]
pub struct Raster {
    pub columns: usize,
    pub rows: usize,
    pub bands: Vec<Vec<u8>>,
    pub geo_transform: GeoTransform,
}

impl Raster {
    /// Opens `path`, checks it can be cut into `tile_size` tiles and that every
    /// band is 8-bit, then reads all bands.
    pub fn open(path: &Path, tile_size: TileSize) -> Result<Self, ProcessError> {
        let dataset = SourceDataset::open(path)?;
        let (columns, rows) = dataset.raster_size();

        if columns % tile_size.cols != 0 {
            return Err(dataset.invalid(ValidationError::NotDivisible {
                axis: Axis::Columns,
                size: columns,
                tile: tile_size.cols,
            }));
        }
        if rows % tile_size.rows != 0 {
            return Err(dataset.invalid(ValidationError::NotDivisible {
                axis: Axis::Rows,
                size: rows,
                tile: tile_size.rows,
            }));
        }

        let geo_transform = dataset.geo_transform()?;

        let band_count = dataset.band_count();
        for band in 1..=band_count {
            dataset.ensure_byte_band(band)?;
        }

        let bands = (1..=band_count)
            .map(|band| dataset.read_byte_band(band))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Read {} bands of {}x{} from {}",
            band_count,
            columns,
            rows,
            dataset.path().display()
        );

        Ok(Raster {
            columns,
            rows,
            bands,
            geo_transform,
        })
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }
}

impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Columns: {}\nRows: {}\nBands: {}\nOrigin: ({}, {})\nPixel size: ({}, {})",
            self.columns,
            self.rows,
            self.bands.len(),
            self.geo_transform[0],
            self.geo_transform[3],
            self.geo_transform[1],
            self.geo_transform[5],
        )
    }
}
