//! Eagerly decoded frames served through a decode context.

use common::{MediaError, MediaResult, PixelFormat};
use media::{DecodeContext, FrameToken, MediaInfo};

/// Delay used for animation frames that declare none.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// One fully composed frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedFrame {
    pub pixels: Vec<u8>,
    /// Delay before the next frame, in milliseconds.
    pub delay_ms: u32,
}

/// Decode context over frames decoded at open time.
///
/// Stills return their only frame with a zero delay. Animations loop
/// forever.
#[derive(Debug)]
pub struct FrameSequence {
    info: MediaInfo,
    frames: Vec<DecodedFrame>,
    next: usize,
    current: usize,
}

impl FrameSequence {
    /// A still image.
    pub fn still(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> MediaResult<Self> {
        format.check_frame(width, height, &pixels)?;
        Ok(Self {
            info: MediaInfo::still(width, height, format),
            frames: vec![DecodedFrame { pixels, delay_ms: 0 }],
            next: 0,
            current: 0,
        })
    }

    /// An animation. A single frame is treated as a still image and zero
    /// delays are replaced by [`DEFAULT_FRAME_DELAY_MS`].
    pub fn animation(
        width: u32,
        height: u32,
        format: PixelFormat,
        mut frames: Vec<DecodedFrame>,
    ) -> MediaResult<Self> {
        if frames.is_empty() {
            return Err(MediaError::NoFrames);
        }
        if frames.len() == 1 {
            let frame = frames.pop().ok_or(MediaError::NoFrames)?;
            return Self::still(width, height, format, frame.pixels);
        }

        for frame in &mut frames {
            format.check_frame(width, height, &frame.pixels)?;
            if frame.delay_ms == 0 {
                frame.delay_ms = DEFAULT_FRAME_DELAY_MS;
            }
        }

        let frame_count = u32::try_from(frames.len())
            .map_err(|_| MediaError::decode("too many frames"))?;
        Ok(Self {
            info: MediaInfo {
                width,
                height,
                format,
                frame_count,
            },
            frames,
            next: 0,
            current: 0,
        })
    }

    pub fn frames(&self) -> &[DecodedFrame] {
        &self.frames
    }
}

impl DecodeContext for FrameSequence {
    fn info(&self) -> MediaInfo {
        self.info
    }

    fn begin_read_frame(&mut self, _token: &FrameToken) -> MediaResult<u32> {
        let frame = self.frames.get(self.next).ok_or(MediaError::NoFrames)?;
        self.current = self.next;
        self.next = (self.next + 1) % self.frames.len();
        Ok(frame.delay_ms)
    }

    fn pixels(&self, _token: &FrameToken) -> &[u8] {
        &self.frames[self.current].pixels
    }
}
