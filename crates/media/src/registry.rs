//! Format registry.
//!
//! Maps lowercase format tags to decoders and holds the single renderer.
//! Populate it at startup, then lend it to sessions; sessions borrow the
//! registry, so it cannot be changed or dropped while any of them is alive.

use crate::decoder::ImageDecoder;
use crate::renderer::{RenderContext, Renderer, TextureId};
use common::PixelFormat;
use tracing::debug;

/// Transparent 1x1 frame shown when a session has nothing to display.
const PLACEHOLDER_PIXEL: [u8; 4] = [0, 0, 0, 0];

struct DecoderEntry {
    tag: String,
    decoder: Box<dyn ImageDecoder>,
}

/// Decoder table plus the installed renderer.
#[derive(Default)]
pub struct Registry {
    decoders: Vec<DecoderEntry>,
    renderer: Option<Box<dyn Renderer>>,
    placeholder: Option<Box<dyn RenderContext>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `decoder` for `tag`, replacing any decoder already registered
    /// under a case-insensitively equal tag. Empty tags are ignored.
    pub fn install_decoder<D>(&mut self, tag: &str, decoder: D)
    where
        D: ImageDecoder + 'static,
    {
        if tag.is_empty() {
            return;
        }

        let decoder: Box<dyn ImageDecoder> = Box::new(decoder);
        if let Some(entry) = self.entry_mut(tag) {
            debug!(tag = %entry.tag, "replacing image decoder");
            entry.decoder = decoder;
            return;
        }

        let tag = tag.to_ascii_lowercase();
        debug!(tag = %tag, "installing image decoder");
        self.decoders.push(DecoderEntry { tag, decoder });
    }

    /// Look up the decoder registered for `tag`, ignoring case.
    pub fn decoder(&self, tag: &str) -> Option<&dyn ImageDecoder> {
        if tag.is_empty() {
            return None;
        }
        self.decoders
            .iter()
            .find(|entry| entry.tag.eq_ignore_ascii_case(tag))
            .map(|entry| entry.decoder.as_ref())
    }

    /// Install the renderer.
    ///
    /// # Panics
    ///
    /// If a renderer is already installed.
    pub fn install_renderer<R>(&mut self, renderer: R)
    where
        R: Renderer + 'static,
    {
        assert!(
            self.renderer.is_none(),
            "an image renderer is already installed"
        );

        self.placeholder = match renderer.create_context(1, 1, PixelFormat::Rgba8, false) {
            Ok(mut context) => {
                context.write_frame(&PLACEHOLDER_PIXEL);
                Some(context)
            }
            Err(err) => {
                debug!(error = %err, "renderer could not create the placeholder texture");
                None
            }
        };
        self.renderer = Some(Box::new(renderer));
        debug!("installed image renderer");
    }

    /// The installed renderer.
    ///
    /// # Panics
    ///
    /// If no renderer has been installed.
    pub fn renderer(&self) -> &dyn Renderer {
        self.try_renderer().expect("no image renderer installed")
    }

    /// The installed renderer, if any.
    pub fn try_renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_deref()
    }

    /// Texture shown for media that failed to load.
    pub fn placeholder_texture(&self) -> TextureId {
        self.placeholder
            .as_ref()
            .map_or(TextureId::NULL, |context| context.texture())
    }

    /// Registered tags, in installation order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.decoders.iter().map(|entry| entry.tag.as_str())
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    fn entry_mut(&mut self, tag: &str) -> Option<&mut DecoderEntry> {
        self.decoders
            .iter_mut()
            .find(|entry| entry.tag.eq_ignore_ascii_case(tag))
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if let (Some(renderer), Some(placeholder)) = (&self.renderer, self.placeholder.take()) {
            renderer.close_context(placeholder);
        }
    }
}
