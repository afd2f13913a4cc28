//! Per-format decoders.

pub mod gif;
pub mod jpeg;
pub mod png;
pub mod raster;
pub mod webp;
