//! WebP decoder.
//!
//! Still images go through libwebp; animations are composed by the `image`
//! crate.

use crate::limits::DecodeLimits;
use crate::sequence::{DecodedFrame, FrameSequence};
use common::{MediaError, MediaResult, PixelFormat};
use image::codecs::webp::WebPDecoder as AnimatedWebPDecoder;
use image::{AnimationDecoder, ImageDecoder as _};
use media::{DecodeContext, ImageDecoder};
use std::io::Cursor;
use tracing::trace;

/// Lossy, lossless and animated WebP.
#[derive(Clone, Debug, Default)]
pub struct WebpDecoder {
    limits: DecodeLimits,
}

impl WebpDecoder {
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn decode(&self, data: &[u8]) -> MediaResult<FrameSequence> {
        let container = AnimatedWebPDecoder::new(Cursor::new(data))
            .map_err(|e| MediaError::decode(e.to_string()))?;
        let (width, height) = container.dimensions();
        self.limits.check(width, height, PixelFormat::Rgba8)?;

        if container.has_animation() {
            self.decode_animation(container, width, height)
        } else {
            self.decode_still(data)
        }
    }

    fn decode_still(&self, data: &[u8]) -> MediaResult<FrameSequence> {
        let image = webp::Decoder::new(data)
            .decode()
            .ok_or_else(|| MediaError::decode("WebP decode failed"))?;

        let format = PixelFormat::with_alpha(image.is_alpha());
        trace!(
            width = image.width(),
            height = image.height(),
            format = format.name(),
            "decoded webp"
        );
        FrameSequence::still(image.width(), image.height(), format, image.to_vec())
    }

    fn decode_animation(
        &self,
        container: AnimatedWebPDecoder<Cursor<&[u8]>>,
        width: u32,
        height: u32,
    ) -> MediaResult<FrameSequence> {
        let mut frames = Vec::new();
        for frame in container.into_frames() {
            let frame = frame.map_err(|e| MediaError::decode(e.to_string()))?;
            self.limits
                .check_frames(width, height, PixelFormat::Rgba8, frames.len() + 1)?;

            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 { 0 } else { numer / denom };
            frames.push(DecodedFrame {
                pixels: frame.into_buffer().into_raw(),
                delay_ms,
            });
        }
        trace!(width, height, frames = frames.len(), "decoded animated webp");

        FrameSequence::animation(width, height, PixelFormat::Rgba8, frames)
    }
}

impl ImageDecoder for WebpDecoder {
    fn open_from_memory(&self, data: &[u8]) -> MediaResult<Box<dyn DecodeContext>> {
        Ok(Box::new(self.decode(data)?))
    }

    fn close(&self, context: Box<dyn DecodeContext>) {
        drop(context);
    }
}
