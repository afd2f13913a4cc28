//! Decoder capability surface.
//!
//! A format backend implements [`ImageDecoder`] once per format and hands out
//! one [`DecodeContext`] per opened source. Optional capabilities are exposed
//! through accessor methods that return `None` when the backend lacks them.

use common::{MediaResult, PixelFormat};
use std::fmt;
use std::fs::File;

/// Metadata of an opened source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of every frame returned by the context.
    pub format: PixelFormat,
    /// Number of frames. `0` or `1` means a still image.
    pub frame_count: u32,
}

impl MediaInfo {
    /// Metadata of a still image.
    pub const fn still(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            frame_count: 0,
        }
    }

    /// Whether the source has more than one frame.
    pub const fn is_animated(&self) -> bool {
        self.frame_count > 1
    }

    /// Size in bytes of one frame.
    pub const fn frame_len(&self) -> usize {
        self.format.frame_len(self.width, self.height)
    }
}

/// A format backend.
pub trait ImageDecoder {
    /// Open a context over an in-memory encoded source.
    fn open_from_memory(&self, data: &[u8]) -> MediaResult<Box<dyn DecodeContext>>;

    /// File input, if the backend can read straight from an open file.
    fn file_input(&self) -> Option<&dyn FileInput> {
        None
    }

    /// Release a context opened by this decoder.
    fn close(&self, context: Box<dyn DecodeContext>);
}

/// Optional decoder capability: open from an already opened file.
pub trait FileInput {
    /// `file` is opened read-only and positioned at its start; `len` is its
    /// total length in bytes. The decoder takes ownership of the handle.
    fn open_from_file(&self, file: File, len: u64) -> MediaResult<Box<dyn DecodeContext>>;
}

/// Proof that a frame read is in progress.
///
/// Only [`FrameGuard`] holds one, so the frame entry points of
/// [`DecodeContext`] are reachable from nowhere else.
#[derive(Debug)]
pub struct FrameToken {
    _private: (),
}

/// Per-source decoder state.
///
/// Frames are read with `read_frame`, which returns a [`FrameGuard`]. The
/// pixel buffer borrows the guard, so it cannot be used after the guard has
/// ended the read.
pub trait DecodeContext {
    /// Dimensions, pixel format and frame count.
    fn info(&self) -> MediaInfo;

    /// Decode the next frame and return its delay in milliseconds.
    ///
    /// A delay of zero means no further progress is meaningful. Animated
    /// backends loop internally.
    fn begin_read_frame(&mut self, token: &FrameToken) -> MediaResult<u32>;

    /// Pixels of the frame produced by the last successful
    /// [`begin_read_frame`](DecodeContext::begin_read_frame).
    fn pixels(&self, token: &FrameToken) -> &[u8];

    /// End-of-frame notification, if the backend wants one.
    fn frame_release(&mut self) -> Option<&mut dyn FrameRelease> {
        None
    }
}

/// Optional context capability: told when the host is done with a frame.
pub trait FrameRelease {
    /// After this call the previously returned pixels must not be read.
    fn end_read_frame(&mut self);
}

impl dyn DecodeContext {
    /// Read the next frame through a guard that ends the read when dropped.
    pub fn read_frame(&mut self) -> MediaResult<FrameGuard<'_>> {
        let token = FrameToken { _private: () };
        let delay_ms = self.begin_read_frame(&token)?;
        Ok(FrameGuard {
            context: self,
            token,
            delay_ms,
        })
    }
}

/// Borrow of a decoded frame.
///
/// The pixel buffer is only reachable through the guard, and dropping the
/// guard calls the context's end-read-frame capability. Pixels cannot
/// outlive the guard:
///
/// ```compile_fail
/// fn stale(mut context: Box<dyn media::DecodeContext>) -> media::MediaResult<usize> {
///     let frame = context.read_frame()?;
///     let pixels = frame.pixels();
///     drop(frame);
///     Ok(pixels.len())
/// }
/// ```
pub struct FrameGuard<'a> {
    context: &'a mut (dyn DecodeContext + 'static),
    token: FrameToken,
    delay_ms: u32,
}

impl FrameGuard<'_> {
    /// Frame pixels, valid for the lifetime of the guard.
    pub fn pixels(&self) -> &[u8] {
        self.context.pixels(&self.token)
    }

    /// Delay until the next frame, in milliseconds.
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.context.frame_release() {
            release.end_read_frame();
        }
    }
}

impl fmt::Debug for FrameGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameGuard")
            .field("len", &self.pixels().len())
            .field("delay_ms", &self.delay_ms)
            .finish()
    }
}
