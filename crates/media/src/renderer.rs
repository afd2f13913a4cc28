//! Renderer capability surface.

use common::{MediaResult, PixelFormat};

/// Opaque texture handle understood by the host display backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

impl TextureId {
    /// Handle that refers to no texture.
    pub const NULL: TextureId = TextureId(0);

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// A display backend. One per registry.
pub trait Renderer {
    /// Create a display resource sized for one media item.
    ///
    /// `animated` tells the backend the context will be rewritten every few
    /// frames and may be buffered accordingly.
    fn create_context(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        animated: bool,
    ) -> MediaResult<Box<dyn RenderContext>>;

    /// Release a context created by this renderer.
    fn close_context(&self, context: Box<dyn RenderContext>);
}

/// Per-media display resource.
pub trait RenderContext {
    /// Upload one tightly packed frame in the context's pixel format.
    fn write_frame(&mut self, pixels: &[u8]);

    /// Handle of the texture holding the most recent frame.
    ///
    /// Stable for still contexts; may change after each upload for animated
    /// ones.
    fn texture(&self) -> TextureId;
}
