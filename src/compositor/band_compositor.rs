use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::pixels::{check_png_limits, interleave};
use crate::config::{BandSelection, Config, FailurePolicy};
use crate::error::ProcessError;
use crate::files::SourceFile;
use crate::output::{PartialOutput, output_path};
use crate::raster::SourceDataset;

/// Renders three selected bands of a raster as an RGB PNG.
///
/// The image keeps the raster's orientation: PNG width is the raster's column
/// count and PNG height its row count.
#[derive(Debug)]
pub struct BandCompositor {
    bands: BandSelection,
    output_dir: PathBuf,
    failure: FailurePolicy,
}

impl BandCompositor {
    pub fn new(config: &Config) -> Result<Self, ProcessError> {
        Ok(Self {
            bands: config.bands()?,
            output_dir: config.output_dir().to_path_buf(),
            failure: config.convert_failure(),
        })
    }

    pub fn convert_files(&self, files: &[SourceFile]) -> Result<Vec<PathBuf>, ProcessError> {
        let mut written = Vec::with_capacity(files.len());

        for file in files {
            if let Some(path) = self.failure.apply(&file.path, self.convert_file(file))? {
                written.push(path);
            }
        }

        info!(
            "Wrote {} images ({} skipped)",
            written.len(),
            files.len() - written.len()
        );
        Ok(written)
    }

    pub fn convert_file(&self, file: &SourceFile) -> Result<PathBuf, ProcessError> {
        info!("Processing {}", file.path.display());

        let dataset = SourceDataset::open(&file.path)?;
        let (columns, rows) = dataset.raster_size();
        let (width, height) = check_png_limits(columns, rows).map_err(|e| dataset.invalid(e))?;

        let indices = self.bands.indices();
        for band in indices {
            dataset.ensure_byte_band(band)?;
        }
        let [red, green, blue] = indices.map(|band| dataset.read_byte_band(band));
        let pixels = interleave(&[red?, green?, blue?]);
        debug!(
            "Composed bands {} of {}",
            self.bands,
            dataset.path().display()
        );

        let name = format!("{}.png", file.base_name);
        let output = PartialOutput::new(output_path(&self.output_dir, &name)?);
        write_png(output.path(), width, height, &pixels).map_err(|source| {
            ProcessError::Encode {
                path: output.path().to_path_buf(),
                source,
            }
        })?;

        Ok(output.commit())
    }
}

fn write_png(path: &Path, width: u32, height: u32, pixels: &[u8]) -> image::ImageResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    PngEncoder::new(&mut writer).write_image(pixels, width, height, ExtendedColorType::Rgb8)?;
    writer.flush()?;
    Ok(())
}
