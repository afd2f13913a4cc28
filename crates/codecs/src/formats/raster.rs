//! Generic still raster formats decoded through the `image` crate.

use crate::limits::DecodeLimits;
use crate::sequence::FrameSequence;
use common::{MediaError, MediaResult, PixelFormat};
use image::{ImageFormat, ImageReader};
use media::{DecodeContext, ImageDecoder};
use std::io::Cursor;
use tracing::trace;

/// Registry tags served by [`RasterDecoder`], with their formats.
pub const RASTER_TAGS: &[(&str, ImageFormat)] = &[
    ("bmp", ImageFormat::Bmp),
    ("tga", ImageFormat::Tga),
    ("pnm", ImageFormat::Pnm),
    ("pbm", ImageFormat::Pnm),
    ("pgm", ImageFormat::Pnm),
    ("ppm", ImageFormat::Pnm),
    ("pam", ImageFormat::Pnm),
    ("ico", ImageFormat::Ico),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("qoi", ImageFormat::Qoi),
];

/// One still raster format.
#[derive(Clone, Debug)]
pub struct RasterDecoder {
    format: ImageFormat,
    limits: DecodeLimits,
}

impl RasterDecoder {
    pub fn new(format: ImageFormat, limits: DecodeLimits) -> Self {
        Self { format, limits }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn decode(&self, data: &[u8]) -> MediaResult<FrameSequence> {
        let (width, height) = ImageReader::with_format(Cursor::new(data), self.format)
            .into_dimensions()
            .map_err(|e| MediaError::decode(e.to_string()))?;
        self.limits.check(width, height, PixelFormat::Rgba8)?;

        let image = image::load_from_memory_with_format(data, self.format)
            .map_err(|e| MediaError::decode(e.to_string()))?;
        let (format, pixels) = if image.color().has_alpha() {
            (PixelFormat::Rgba8, image.to_rgba8().into_raw())
        } else {
            (PixelFormat::Rgb8, image.to_rgb8().into_raw())
        };
        trace!(width, height, format = format.name(), source = ?self.format, "decoded raster");

        FrameSequence::still(image.width(), image.height(), format, pixels)
    }
}

impl ImageDecoder for RasterDecoder {
    fn open_from_memory(&self, data: &[u8]) -> MediaResult<Box<dyn DecodeContext>> {
        Ok(Box::new(self.decode(data)?))
    }

    fn close(&self, context: Box<dyn DecodeContext>) {
        drop(context);
    }
}
