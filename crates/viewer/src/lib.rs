//! Headless image player.
//!
//! This crate wires the reference decoders and renderers into a registry
//! and plays files against a simulated UI clock.

pub mod config;
pub mod playback;

pub use config::{RendererKind, ViewerConfig};
pub use playback::{play_file, save_png, Playback, PlaybackReport};

use anyhow::Result;
use gpu::{GpuContext, MemoryRenderer, TextureSnapshot, WgpuRenderer};
use media::{Registry, TextureId};
use std::sync::Arc;
use tracing::info;

/// Viewer version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The host's clone of the renderer installed into the registry.
#[derive(Clone)]
pub enum RendererHandle {
    Memory(MemoryRenderer),
    Gpu(WgpuRenderer),
}

impl RendererHandle {
    /// End a simulated redraw.
    ///
    /// GPU uploads stay staged on the queue until it is submitted.
    pub fn present(&self) {
        if let RendererHandle::Gpu(renderer) = self {
            renderer.context().flush();
        }
    }

    /// Contents of a live texture, when the renderer keeps them in memory.
    pub fn snapshot(&self, texture: TextureId) -> Option<TextureSnapshot> {
        match self {
            RendererHandle::Memory(renderer) => renderer.snapshot(texture),
            RendererHandle::Gpu(_) => None,
        }
    }
}

/// Registry populated for `config`, plus the host's handle on its renderer.
pub async fn build_registry(config: &ViewerConfig) -> Result<(Registry, RendererHandle)> {
    let mut registry = Registry::new();
    codecs::install(&mut registry, config.codecs, config.limits);

    let handle = match config.renderer {
        RendererKind::Memory => RendererHandle::Memory(MemoryRenderer::new()),
        RendererKind::Gpu => {
            let context = GpuContext::new().await?;
            info!("Using GPU adapter: {}", context.adapter_info().name);
            RendererHandle::Gpu(WgpuRenderer::new(Arc::new(context)))
        }
    };
    match &handle {
        RendererHandle::Memory(renderer) => registry.install_renderer(renderer.clone()),
        RendererHandle::Gpu(renderer) => registry.install_renderer(renderer.clone()),
    }

    Ok((registry, handle))
}
