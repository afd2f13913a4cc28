//! JPEG decoder.

use crate::convert;
use crate::limits::DecodeLimits;
use crate::sequence::FrameSequence;
use common::{MediaError, MediaResult, PixelFormat};
use jpeg_decoder::PixelFormat as JpegPixelFormat;
use media::{DecodeContext, ImageDecoder};
use std::io::Cursor;
use tracing::trace;

/// Baseline and progressive JPEG, always decoded to RGB.
#[derive(Clone, Debug, Default)]
pub struct JpegDecoder {
    limits: DecodeLimits,
}

impl JpegDecoder {
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn decode(&self, data: &[u8]) -> MediaResult<FrameSequence> {
        let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(data));
        decoder
            .read_info()
            .map_err(|e| MediaError::decode(e.to_string()))?;
        let info = decoder
            .info()
            .ok_or_else(|| MediaError::decode("No JPEG info"))?;

        let (width, height) = (u32::from(info.width), u32::from(info.height));
        self.limits.check(width, height, PixelFormat::Rgb8)?;
        decoder.set_max_decoding_buffer_size(self.limits.max_bytes);

        let raw = decoder
            .decode()
            .map_err(|e| MediaError::decode(e.to_string()))?;
        trace!(width, height, format = ?info.pixel_format, "decoded jpeg");

        let pixels = match info.pixel_format {
            JpegPixelFormat::RGB24 => raw,
            JpegPixelFormat::L8 => convert::gray_to_rgb(&raw),
            JpegPixelFormat::L16 => convert::gray16_to_rgb(&raw),
            JpegPixelFormat::CMYK32 => convert::cmyk_to_rgb(&raw),
        };

        FrameSequence::still(width, height, PixelFormat::Rgb8, pixels)
    }
}

impl ImageDecoder for JpegDecoder {
    fn open_from_memory(&self, data: &[u8]) -> MediaResult<Box<dyn DecodeContext>> {
        Ok(Box::new(self.decode(data)?))
    }

    fn close(&self, context: Box<dyn DecodeContext>) {
        drop(context);
    }
}
