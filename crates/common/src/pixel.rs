//! Pixel formats exchanged between decoders and renderers.

use crate::error::{MediaError, MediaResult};
use serde::{Deserialize, Serialize};

/// Layout of a decoded frame: row-major, top-to-bottom, no row padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 3 bytes per pixel.
    Rgb8,
    /// 4 bytes per pixel, straight (non-premultiplied) alpha.
    Rgba8,
}

impl PixelFormat {
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    #[inline]
    pub const fn has_alpha(&self) -> bool {
        matches!(self, PixelFormat::Rgba8)
    }

    /// Pick the format for a source with or without an alpha channel.
    #[inline]
    pub const fn with_alpha(has_alpha: bool) -> Self {
        if has_alpha {
            PixelFormat::Rgba8
        } else {
            PixelFormat::Rgb8
        }
    }

    /// Size in bytes of one tightly packed frame.
    #[inline]
    pub const fn frame_len(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }

    /// Check that `pixels` holds exactly one frame.
    pub fn check_frame(&self, width: u32, height: u32, pixels: &[u8]) -> MediaResult<()> {
        let expected = self.frame_len(width, height);
        if pixels.len() != expected {
            return Err(MediaError::InvalidBuffer {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(())
    }

    /// Short lowercase name, used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::Rgb8 => "rgb",
            PixelFormat::Rgba8 => "rgba",
        }
    }
}
