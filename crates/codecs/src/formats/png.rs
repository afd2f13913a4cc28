//! PNG decoder.

use crate::convert;
use crate::limits::DecodeLimits;
use crate::sequence::FrameSequence;
use common::{MediaError, MediaResult, PixelFormat};
use media::{DecodeContext, FileInput, ImageDecoder};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use tracing::trace;

/// Still PNG images, from memory or straight from a file.
#[derive(Clone, Debug, Default)]
pub struct PngDecoder {
    limits: DecodeLimits,
}

impl PngDecoder {
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    /// Decode the first image of a PNG stream.
    pub fn decode<R: Read>(&self, reader: R) -> MediaResult<FrameSequence> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e| MediaError::decode(e.to_string()))?;

        let (width, height) = {
            let info = reader.info();
            (info.width, info.height)
        };
        self.limits.check(width, height, PixelFormat::Rgba8)?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let output_info = reader
            .next_frame(&mut buf)
            .map_err(|e| MediaError::decode(e.to_string()))?;
        buf.truncate(output_info.buffer_size());
        trace!(width, height, color = ?output_info.color_type, "decoded png");

        let (format, pixels) = match output_info.color_type {
            png::ColorType::Rgb => (PixelFormat::Rgb8, buf),
            png::ColorType::Rgba => (PixelFormat::Rgba8, buf),
            png::ColorType::Grayscale => (PixelFormat::Rgb8, convert::gray_to_rgb(&buf)),
            png::ColorType::GrayscaleAlpha => {
                (PixelFormat::Rgba8, convert::gray_alpha_to_rgba(&buf))
            }
            png::ColorType::Indexed => {
                return Err(MediaError::unsupported("unexpanded indexed PNG"));
            }
        };

        FrameSequence::still(output_info.width, output_info.height, format, pixels)
    }
}

impl ImageDecoder for PngDecoder {
    fn open_from_memory(&self, data: &[u8]) -> MediaResult<Box<dyn DecodeContext>> {
        Ok(Box::new(self.decode(Cursor::new(data))?))
    }

    fn file_input(&self) -> Option<&dyn FileInput> {
        Some(self)
    }

    fn close(&self, context: Box<dyn DecodeContext>) {
        drop(context);
    }
}

impl FileInput for PngDecoder {
    fn open_from_file(&self, file: File, _len: u64) -> MediaResult<Box<dyn DecodeContext>> {
        Ok(Box::new(self.decode(BufReader::new(file))?))
    }
}
