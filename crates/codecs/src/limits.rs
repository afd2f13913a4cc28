//! Decode limits.

use common::{MediaError, MediaResult, PixelFormat};

/// Bounds checked before any frame buffer is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum image width.
    pub max_width: u32,
    /// Maximum image height.
    pub max_height: u32,
    /// Maximum decoded size in bytes, summed over all frames.
    pub max_bytes: usize,
}

impl DecodeLimits {
    pub fn new() -> Self {
        Self {
            max_width: 16384,
            max_height: 16384,
            max_bytes: 256 * 1024 * 1024, // 256MB
        }
    }

    /// Set maximum dimensions.
    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    /// Set maximum decoded size.
    pub fn with_max_bytes(mut self, bytes: usize) -> Self {
        self.max_bytes = bytes;
        self
    }

    /// Check one frame of `width` x `height` in `format`.
    pub fn check(&self, width: u32, height: u32, format: PixelFormat) -> MediaResult<()> {
        self.check_frames(width, height, format, 1)
    }

    /// Check `count` frames of `width` x `height` in `format`.
    pub fn check_frames(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        count: usize,
    ) -> MediaResult<()> {
        if width > self.max_width || height > self.max_height {
            return Err(MediaError::DimensionsTooLarge {
                width,
                height,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }
        if width == 0 || height == 0 {
            return Err(MediaError::decode(format!("empty image: {width}x{height}")));
        }

        let required = format.frame_len(width, height).saturating_mul(count);
        if required > self.max_bytes {
            return Err(MediaError::MemoryLimitExceeded {
                required,
                limit: self.max_bytes,
            });
        }

        Ok(())
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = DecodeLimits::default();
        assert!(limits.check(16384, 4096, PixelFormat::Rgba8).is_ok());
        assert!(matches!(
            limits.check(16385, 1, PixelFormat::Rgb8),
            Err(MediaError::DimensionsTooLarge { width: 16385, .. })
        ));
        assert!(matches!(
            limits.check(16384, 16384, PixelFormat::Rgba8),
            Err(MediaError::MemoryLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_frames_accumulate() {
        let limits = DecodeLimits::new().with_max_bytes(100);
        assert!(limits.check_frames(5, 5, PixelFormat::Rgba8, 1).is_ok());
        assert!(limits.check_frames(5, 5, PixelFormat::Rgba8, 2).is_err());
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(DecodeLimits::new().check(0, 10, PixelFormat::Rgb8).is_err());
    }

    #[test]
    fn test_builders() {
        let limits = DecodeLimits::new().with_max_dimensions(64, 32).with_max_bytes(1024);
        assert_eq!(limits.max_width, 64);
        assert_eq!(limits.max_height, 32);
        assert_eq!(limits.max_bytes, 1024);
    }
}
