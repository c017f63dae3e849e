pub mod engine;
pub mod grid;

pub use engine::TilingEngine;
