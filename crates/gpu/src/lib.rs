//! Reference renderers.
//!
//! This crate provides:
//! - `WgpuRenderer`, uploading frames into wgpu textures
//! - `MemoryRenderer`, keeping frames in CPU memory for headless hosts and tests
//! - A headless `GpuContext` for device and queue creation

pub mod context;
pub mod memory;
pub mod renderer;
pub mod texture;

pub use context::{GpuContext, GpuContextBuilder, GpuError};
pub use memory::{MemoryRenderer, TextureSnapshot};
pub use renderer::WgpuRenderer;
pub use texture::GpuTexture;

use media::TextureId;
use slotmap::{new_key_type, Key, KeyData};

new_key_type! {
    /// Slot of a texture owned by a renderer.
    pub struct TextureKey;
}

impl From<TextureKey> for TextureId {
    fn from(key: TextureKey) -> Self {
        TextureId(key.data().as_ffi())
    }
}

impl From<TextureId> for TextureKey {
    fn from(id: TextureId) -> Self {
        KeyData::from_ffi(id.0).into()
    }
}

/// Number of textures backing a render context.
pub(crate) fn texture_slots(animated: bool) -> usize {
    if animated {
        2
    } else {
        1
    }
}
