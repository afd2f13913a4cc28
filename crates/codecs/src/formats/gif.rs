//! GIF decoder.
//!
//! Every frame is composed onto a full canvas at open time so the session
//! can upload whole frames. Frame offsets and the keep, background and
//! previous disposal methods are honoured; transparent palette indices leave
//! the canvas pixel underneath unchanged.

use crate::convert;
use crate::limits::DecodeLimits;
use crate::sequence::{DecodedFrame, FrameSequence};
use common::{MediaError, MediaResult, PixelFormat, PixelRect};
use gif::DisposalMethod;
use media::{DecodeContext, FileInput, ImageDecoder};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use tracing::{debug, trace};

/// Animated and still GIF.
#[derive(Clone, Debug, Default)]
pub struct GifDecoder {
    limits: DecodeLimits,
}

impl GifDecoder {
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    /// Decode and compose all frames of a GIF stream.
    ///
    /// A stream that breaks off after at least one complete frame keeps the
    /// frames read so far.
    pub fn decode<R: Read>(&self, reader: R) -> MediaResult<FrameSequence> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options
            .read_info(reader)
            .map_err(|e| MediaError::decode(e.to_string()))?;

        let width = u32::from(decoder.width());
        let height = u32::from(decoder.height());
        self.limits.check(width, height, PixelFormat::Rgba8)?;

        let global_palette = decoder.global_palette().map(<[u8]>::to_vec);
        let mut canvas = Canvas::new(width, height);
        let mut frames: Vec<DecodedFrame> = Vec::new();

        loop {
            let frame = match decoder.read_next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(err) if !frames.is_empty() => {
                    debug!(error = %err, frames = frames.len(), "truncated gif");
                    break;
                }
                Err(err) => return Err(MediaError::decode(err.to_string())),
            };

            self.limits
                .check_frames(width, height, PixelFormat::Rgba8, frames.len() + 1)?;

            let palette = frame
                .palette
                .as_deref()
                .or(global_palette.as_deref())
                .ok_or_else(|| MediaError::decode("GIF frame without a palette"))?;
            let rect = PixelRect::new(
                u32::from(frame.left),
                u32::from(frame.top),
                u32::from(frame.width),
                u32::from(frame.height),
            );

            let saved =
                matches!(frame.dispose, DisposalMethod::Previous).then(|| canvas.pixels.clone());
            canvas.draw(rect, &frame.buffer, palette, frame.transparent);
            frames.push(DecodedFrame {
                pixels: canvas.pixels.clone(),
                delay_ms: u32::from(frame.delay) * 10,
            });

            match frame.dispose {
                DisposalMethod::Background => canvas.clear(rect),
                DisposalMethod::Previous => {
                    if let Some(saved) = saved {
                        canvas.pixels = saved;
                    }
                }
                DisposalMethod::Any | DisposalMethod::Keep => {}
            }
        }

        let opaque = frames.iter().all(|frame| convert::is_opaque(&frame.pixels));
        let format = PixelFormat::with_alpha(!opaque);
        if opaque {
            for frame in &mut frames {
                frame.pixels = convert::rgba_to_rgb(&frame.pixels);
            }
        }
        trace!(width, height, frames = frames.len(), format = format.name(), "decoded gif");

        FrameSequence::animation(width, height, format, frames)
    }
}

impl ImageDecoder for GifDecoder {
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

impl FileInput for GifDecoder {
    fn open_from_file(&self, file: File, _len: u64) -> MediaResult<Box<dyn DecodeContext>> {
        Ok(Box::new(self.decode(BufReader::new(file))?))
    }
}

/// RGBA composition target, initially fully transparent.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; PixelFormat::Rgba8.frame_len(width, height)],
        }
    }

    /// Paint an indexed frame. Out-of-palette indices are skipped like
    /// transparent ones.
    fn draw(&mut self, rect: PixelRect, indices: &[u8], palette: &[u8], transparent: Option<u8>) {
        let visible = rect.clip(self.width, self.height);
        let stride = rect.width as usize;

        for y in visible.y..visible.y + visible.height {
            for x in visible.x..visible.x + visible.width {
                let src = (y - rect.y) as usize * stride + (x - rect.x) as usize;
                let Some(&index) = indices.get(src) else {
                    continue;
                };
                if Some(index) == transparent {
                    continue;
                }
                let Some(rgb) = palette.get(index as usize * 3..index as usize * 3 + 3) else {
                    continue;
                };
                let dst = (y * self.width + x) as usize * 4;
                self.pixels[dst..dst + 3].copy_from_slice(rgb);
                self.pixels[dst + 3] = 255;
            }
        }
    }

    /// Restore a rectangle to transparent.
    fn clear(&mut self, rect: PixelRect) {
        let visible = rect.clip(self.width, self.height);
        for y in visible.y..visible.y + visible.height {
            let start = (y * self.width + visible.x) as usize * 4;
            let end = start + visible.width as usize * 4;
            self.pixels[start..end].fill(0);
        }
    }
}
