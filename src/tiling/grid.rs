use gdal::GeoTransform;

use crate::config::TileSize;

/// Position of one tile within its source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpec {
    pub x_chunk: usize,
    pub y_chunk: usize,
    pub pixel_x_offset: usize,
    pub pixel_y_offset: usize,
}

impl TileSpec {
    pub fn new(x_chunk: usize, y_chunk: usize, tile_size: TileSize) -> Self {
        Self {
            x_chunk,
            y_chunk,
            pixel_x_offset: x_chunk * tile_size.cols,
            pixel_y_offset: y_chunk * tile_size.rows,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TileGrid {
    x_chunks: usize,
    y_chunks: usize,
    tile_size: TileSize,
}

impl TileGrid {
    /// Assumes `columns` and `rows` are multiples of the tile size.
    pub fn new(columns: usize, rows: usize, tile_size: TileSize) -> Self {
        Self {
            x_chunks: columns / tile_size.cols,
            y_chunks: rows / tile_size.rows,
            tile_size,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.x_chunks * self.y_chunks
    }

    /// Column index in the outer loop, row index in the inner one.
    pub fn iter(&self) -> impl Iterator<Item = TileSpec> + use<> {
        let TileGrid {
            x_chunks,
            y_chunks,
            tile_size,
        } = *self;
        (0..x_chunks)
            .flat_map(move |x| (0..y_chunks).map(move |y| TileSpec::new(x, y, tile_size)))
    }
}

/// Geotransform of a tile, computed directly from its pixel offset.
/// Assumes a north-up raster without rotation terms.
pub fn tile_geo_transform(source: &GeoTransform, spec: &TileSpec) -> GeoTransform {
    let mut geo_transform = *source;
    geo_transform[0] = source[0] + spec.pixel_x_offset as f64 * source[1];
    geo_transform[3] = source[3] + spec.pixel_y_offset as f64 * source[5];
    geo_transform
}

/// Copies the `tile_size` block at the tile's pixel offset out of a
/// row-major band with the given stride.
pub fn copy_block(band: &[u8], stride: usize, spec: &TileSpec, tile_size: TileSize) -> Vec<u8> {
    let mut block = Vec::with_capacity(tile_size.cols * tile_size.rows);
    for row in 0..tile_size.rows {
        let start = (spec.pixel_y_offset + row) * stride + spec.pixel_x_offset;
        block.extend_from_slice(&band[start..start + tile_size.cols]);
    }
    block
}

pub fn tile_name(prefix: &str, base_name: &str, spec: &TileSpec) -> String {
    format!(
        "{}{}-X{:04}_Y{:04}.tif",
        prefix, base_name, spec.x_chunk, spec.y_chunk
    )
}
