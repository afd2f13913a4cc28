//! Common types shared by the media core, the codecs and the renderers.

pub mod error;
pub mod geometry;
pub mod pixel;

pub use error::{MediaError, MediaResult};
pub use geometry::{PixelRect, Point, Rect, Size};
pub use pixel::PixelFormat;
