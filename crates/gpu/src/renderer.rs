//! wgpu-backed image renderer.

use crate::context::GpuContext;
use crate::texture::GpuTexture;
use crate::{texture_slots, TextureKey};
use common::{MediaError, MediaResult, PixelFormat};
use media::{RenderContext, Renderer, TextureId};
use parking_lot::RwLock;
use slotmap::SlotMap;
use std::sync::Arc;
use tracing::{debug, trace};

type TextureTable = Arc<RwLock<SlotMap<TextureKey, GpuTexture>>>;

/// Renderer uploading frames into GPU textures.
///
/// The host resolves the [`TextureId`]s handed out by sessions with
/// [`WgpuRenderer::view`]. Clones share the same texture table.
///
/// Uploads are staged on the device queue. The host submits them once per
/// redraw, with its own render pass or with [`GpuContext::flush`].
#[derive(Clone)]
pub struct WgpuRenderer {
    context: Arc<GpuContext>,
    textures: TextureTable,
}

impl WgpuRenderer {
    pub fn new(context: Arc<GpuContext>) -> Self {
        Self {
            context,
            textures: Arc::default(),
        }
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.context
    }

    /// View of a live texture, for binding in the host's draw pass.
    pub fn view(&self, id: TextureId) -> Option<wgpu::TextureView> {
        self.textures.read().get(TextureKey::from(id)).map(GpuTexture::view)
    }

    /// Size of a live texture.
    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures
            .read()
            .get(TextureKey::from(id))
            .map(|texture| (texture.width, texture.height))
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.read().len()
    }
}

impl Renderer for WgpuRenderer {
    fn create_context(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        animated: bool,
    ) -> MediaResult<Box<dyn RenderContext>> {
        let max = self.context.max_texture_size();
        if width == 0 || height == 0 || width > max || height > max {
            return Err(MediaError::render(format!(
                "texture size {width}x{height} outside 1..={max}"
            )));
        }

        let mut table = self.textures.write();
        let slots: Vec<TextureKey> = (0..texture_slots(animated))
            .map(|_| table.insert(GpuTexture::new(&self.context, width, height)))
            .collect();
        debug!(width, height, format = format.name(), animated, "created gpu render context");

        Ok(Box::new(WgpuContext {
            context: self.context.clone(),
            textures: self.textures.clone(),
            slots,
            format,
            current: 0,
            written: false,
        }))
    }

    fn close_context(&self, context: Box<dyn RenderContext>) {
        drop(context);
    }
}

struct WgpuContext {
    context: Arc<GpuContext>,
    textures: TextureTable,
    slots: Vec<TextureKey>,
    format: PixelFormat,
    current: usize,
    written: bool,
}

impl RenderContext for WgpuContext {
    fn write_frame(&mut self, pixels: &[u8]) {
        let next = if self.written {
            (self.current + 1) % self.slots.len()
        } else {
            0
        };

        let table = self.textures.read();
        let Some(texture) = table.get(self.slots[next]) else {
            return;
        };
        let expected = self.format.frame_len(texture.width, texture.height);
        if pixels.len() != expected {
            debug!(expected, actual = pixels.len(), "ignoring mis-sized frame");
            return;
        }
        texture.upload(&self.context, self.format, pixels);

        self.current = next;
        self.written = true;
        trace!(slot = next, "uploaded frame to gpu texture");
    }

    fn texture(&self) -> TextureId {
        self.slots[self.current].into()
    }
}

impl Drop for WgpuContext {
    fn drop(&mut self) {
        let mut table = self.textures.write();
        for key in self.slots.drain(..) {
            if let Some(texture) = table.remove(key) {
                texture.texture.destroy();
            }
        }
    }
}
