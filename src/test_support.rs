use gdal::raster::{Buffer, GdalType};
use gdal::{DriverManager, GeoTransform};
use std::path::Path;

/// 0.2 m orthophoto pixels, origin in UTM 33N metres.
pub const NORTH_UP: GeoTransform = [390000.0, 0.2, 0.0, 5820000.0, 0.0, -0.2];

/// Deterministic band content that differs per pixel and per band.
pub fn pattern_band(columns: usize, rows: usize, seed: usize) -> Vec<u8> {
    (0..rows)
        .flat_map(|y| (0..columns).map(move |x| ((x * 7 + y * 13 + seed * 31) % 251) as u8))
        .collect()
}

/// Writes a GeoTIFF with one entry of `bands` per raster band.
pub fn write_fixture<T: GdalType + Copy>(
    path: &Path,
    columns: usize,
    rows: usize,
    bands: &[Vec<T>],
    geo_transform: Option<&GeoTransform>,
) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = driver
        .create_with_band_type::<T, _>(path, columns, rows, bands.len())
        .unwrap();

    if let Some(geo_transform) = geo_transform {
        dataset.set_geo_transform(geo_transform).unwrap();
    }

    for (index, data) in bands.iter().enumerate() {
        let mut band = dataset.rasterband(index + 1).unwrap();
        let mut buffer = Buffer::new((columns, rows), data.clone());
        band.write((0, 0), (columns, rows), &mut buffer).unwrap();
    }
}
