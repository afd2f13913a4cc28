//! Reference image decoders.
//!
//! This crate provides:
//! - PNG, JPEG, GIF (animated) and WebP (animated) decoders
//! - Generic still rasters through the `image` crate
//! - Decode limits checked before allocation
//! - Helpers to install a selection of decoders into a [`Registry`]

pub mod convert;
pub mod formats;
pub mod limits;
pub mod sequence;

pub use formats::gif::GifDecoder;
pub use formats::jpeg::JpegDecoder;
pub use formats::png::PngDecoder;
pub use formats::raster::{RasterDecoder, RASTER_TAGS};
pub use formats::webp::WebpDecoder;
pub use limits::DecodeLimits;
pub use sequence::{DecodedFrame, FrameSequence, DEFAULT_FRAME_DELAY_MS};

use bitflags::bitflags;
use media::Registry;

bitflags! {
    /// Decoder families to install.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Codecs: u32 {
        const PNG = 1 << 0;
        const JPEG = 1 << 1;
        const GIF = 1 << 2;
        const WEBP = 1 << 3;
        /// BMP, TGA, PNM family, ICO, TIFF and QOI.
        const RASTER = 1 << 4;
    }
}

impl Default for Codecs {
    fn default() -> Self {
        Codecs::all()
    }
}

/// Install the selected decoders, each checking `limits`.
pub fn install(registry: &mut Registry, codecs: Codecs, limits: DecodeLimits) {
    if codecs.contains(Codecs::PNG) {
        registry.install_decoder("png", PngDecoder::new(limits));
    }
    if codecs.contains(Codecs::JPEG) {
        registry.install_decoder("jpg", JpegDecoder::new(limits));
        registry.install_decoder("jpeg", JpegDecoder::new(limits));
    }
    if codecs.contains(Codecs::GIF) {
        registry.install_decoder("gif", GifDecoder::new(limits));
    }
    if codecs.contains(Codecs::WEBP) {
        registry.install_decoder("webp", WebpDecoder::new(limits));
    }
    if codecs.contains(Codecs::RASTER) {
        for &(tag, format) in RASTER_TAGS {
            registry.install_decoder(tag, RasterDecoder::new(format, limits));
        }
    }
}

/// Install every decoder with default limits.
pub fn install_all(registry: &mut Registry) {
    install(registry, Codecs::all(), DecodeLimits::default());
}
