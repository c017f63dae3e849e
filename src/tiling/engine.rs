use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Driver, DriverManager};
use log::{debug, info};
use std::path::PathBuf;

use super::grid::{TileGrid, TileSpec, copy_block, tile_geo_transform, tile_name};
use crate::config::{Config, FailurePolicy, TileSize};
use crate::error::ProcessError;
use crate::files::SourceFile;
use crate::output::{PartialOutput, output_path};
use crate::raster::Raster;

/// Cuts source rasters into georeferenced GeoTIFF tiles.
pub struct TilingEngine {
    tile_size: TileSize,
    prefix: String,
    output_dir: PathBuf,
    failure: FailurePolicy,
    // Shared by every tile of every file in the batch.
    spatial_ref: SpatialRef,
    driver: Driver,
}

impl TilingEngine {
    pub fn new(config: &Config) -> Result<Self, ProcessError> {
        let epsg = config.epsg();
        let spatial_ref = SpatialRef::from_epsg(epsg)
            .map_err(|source| ProcessError::SpatialRef { epsg, source })?;
        let driver =
            DriverManager::get_driver_by_name("GTiff").map_err(|source| ProcessError::Write {
                path: config.output_dir().to_path_buf(),
                source,
            })?;

        Ok(Self {
            tile_size: config.tile_size()?,
            prefix: config.prefix().to_string(),
            output_dir: config.output_dir().to_path_buf(),
            failure: config.tile_failure(),
            spatial_ref,
            driver,
        })
    }

    /// Tiles every file in order and returns all written tile paths.
    pub fn tile_files(&self, files: &[SourceFile]) -> Result<Vec<PathBuf>, ProcessError> {
        let mut written = Vec::new();
        let mut skipped = 0;

        for file in files {
            match self.failure.apply(&file.path, self.tile_file(file))? {
                Some(tiles) => written.extend(tiles),
                None => skipped += 1,
            }
        }

        info!(
            "Wrote {} tiles from {} files ({} skipped)",
            written.len(),
            files.len() - skipped,
            skipped
        );
        Ok(written)
    }

    /// Writes all tiles of one source file, column by column.
    pub fn tile_file(&self, file: &SourceFile) -> Result<Vec<PathBuf>, ProcessError> {
        info!("Processing {}", file.path.display());

        let raster = Raster::open(&file.path, self.tile_size)?;
        debug!("{}", raster);

        let grid = TileGrid::new(raster.columns, raster.rows, self.tile_size);
        let mut written = Vec::with_capacity(grid.tile_count());

        for spec in grid.iter() {
            let name = tile_name(&self.prefix, &file.base_name, &spec);
            let output = PartialOutput::new(output_path(&self.output_dir, &name)?);

            self.write_tile(&raster, &spec, &output)
                .map_err(|source| ProcessError::Write {
                    path: output.path().to_path_buf(),
                    source,
                })?;

            let path = output.commit();
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    // GTiff flushes cached blocks on close, so a failed close is a failed write.
    fn write_tile(
        &self,
        raster: &Raster,
        spec: &TileSpec,
        output: &PartialOutput,
    ) -> gdal::errors::Result<()> {
        let TileSize { rows, cols } = self.tile_size;

        let mut dataset = self.driver.create_with_band_type::<u8, _>(
            output.path(),
            cols,
            rows,
            raster.band_count(),
        )?;
        dataset.set_geo_transform(&tile_geo_transform(&raster.geo_transform, spec))?;
        dataset.set_spatial_ref(&self.spatial_ref)?;

        for (index, band) in raster.bands.iter().enumerate() {
            let block = copy_block(band, raster.columns, spec, self.tile_size);
            let mut buffer = Buffer::new((cols, rows), block);
            let mut out_band = dataset.rasterband(index + 1)?;
            out_band.write((0, 0), (cols, rows), &mut buffer)?;
        }

        dataset.close()
    }
}
