//! CPU-side renderer.
//!
//! Frames are copied into a shared texture table that the host can read
//! back. Useful for headless playback and for tests.

use crate::{texture_slots, TextureKey};
use common::{MediaResult, PixelFormat};
use media::{RenderContext, Renderer, TextureId};
use parking_lot::RwLock;
use slotmap::SlotMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Contents of one texture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureSnapshot {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

#[derive(Default)]
struct TextureTable {
    textures: SlotMap<TextureKey, TextureSnapshot>,
    uploads: u64,
}

/// Renderer keeping textures in memory.
///
/// Clones share the same texture table, so a host can keep one clone for
/// inspection after installing another into a registry.
#[derive(Clone, Default)]
pub struct MemoryRenderer {
    table: Arc<RwLock<TextureTable>>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a live texture.
    pub fn snapshot(&self, id: TextureId) -> Option<TextureSnapshot> {
        self.table.read().textures.get(TextureKey::from(id)).cloned()
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.table.read().textures.len()
    }

    /// Number of frames written so far.
    pub fn upload_count(&self) -> u64 {
        self.table.read().uploads
    }
}

impl Renderer for MemoryRenderer {
    fn create_context(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        animated: bool,
    ) -> MediaResult<Box<dyn RenderContext>> {
        let blank = TextureSnapshot {
            width,
            height,
            format,
            pixels: vec![0; format.frame_len(width, height)],
        };

        let mut table = self.table.write();
        let textures: Vec<TextureKey> = (0..texture_slots(animated))
            .map(|_| table.textures.insert(blank.clone()))
            .collect();
        debug!(width, height, format = format.name(), animated, "created memory render context");

        Ok(Box::new(MemoryContext {
            table: self.table.clone(),
            textures,
            current: 0,
            written: false,
        }))
    }

    fn close_context(&self, context: Box<dyn RenderContext>) {
        drop(context);
    }
}

struct MemoryContext {
    table: Arc<RwLock<TextureTable>>,
    textures: Vec<TextureKey>,
    current: usize,
    written: bool,
}

impl RenderContext for MemoryContext {
    fn write_frame(&mut self, pixels: &[u8]) {
        let next = if self.written {
            (self.current + 1) % self.textures.len()
        } else {
            0
        };

        let mut table = self.table.write();
        let Some(texture) = table.textures.get_mut(self.textures[next]) else {
            return;
        };
        if texture.pixels.len() != pixels.len() {
            debug!(
                expected = texture.pixels.len(),
                actual = pixels.len(),
                "ignoring mis-sized frame"
            );
            return;
        }
        texture.pixels.copy_from_slice(pixels);
        table.uploads += 1;

        self.current = next;
        self.written = true;
        trace!(slot = next, "wrote frame to memory texture");
    }

    fn texture(&self) -> TextureId {
        self.textures[self.current].into()
    }
}

impl Drop for MemoryContext {
    fn drop(&mut self) {
        let mut table = self.table.write();
        for key in self.textures.drain(..) {
            table.textures.remove(key);
        }
    }
}
