pub mod band_compositor;
pub mod pixels;

pub use band_compositor::BandCompositor;
