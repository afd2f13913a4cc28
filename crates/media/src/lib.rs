//! Image playback core.
//!
//! This crate provides:
//! - Decoder and renderer capability surfaces
//! - A format registry mapping tags to decoders
//! - Media sessions that play still and animated images against a UI clock
//! - Display placement for stretch, center and fill modes

pub mod clock;
pub mod decoder;
pub mod display;
pub mod format;
pub mod registry;
pub mod renderer;
pub mod session;

pub use clock::FrameClock;
pub use decoder::{
    DecodeContext, FileInput, FrameGuard, FrameRelease, FrameToken, ImageDecoder, MediaInfo,
};
pub use display::{DrawCommand, FillMode, UvRect};
pub use format::{file_extension, resolve_decoder};
pub use registry::Registry;
pub use renderer::{RenderContext, Renderer, TextureId};
pub use session::{MediaSession, MediaSource, SessionState};

pub use common::{MediaError, MediaResult, PixelFormat};
