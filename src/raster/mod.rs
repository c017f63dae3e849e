pub mod dataset;
pub mod types;

pub use dataset::SourceDataset;
pub use types::Raster;
