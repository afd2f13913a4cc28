//! Viewer configuration.

use codecs::{Codecs, DecodeLimits};
use std::path::PathBuf;

/// Which renderer receives the frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RendererKind {
    /// CPU textures; supports writing the last frame to disk.
    #[default]
    Memory,
    /// wgpu textures on the default adapter.
    Gpu,
}

/// Viewer configuration.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Format tag used instead of the file extension.
    pub format: Option<String>,
    /// Simulated playback time in milliseconds.
    pub duration_ms: u64,
    /// Interval between simulated redraws in milliseconds.
    pub tick_ms: u64,
    /// Renderer backend.
    pub renderer: RendererKind,
    /// Decoder families to install.
    pub codecs: Codecs,
    /// Decode limits for every installed decoder.
    pub limits: DecodeLimits,
    /// Where to write the last frame of the first file.
    pub output: Option<PathBuf>,
}

impl ViewerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the format hint.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Set playback duration and redraw interval. A zero tick is raised to
    /// one millisecond.
    pub fn with_timing(mut self, duration_ms: u64, tick_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self.tick_ms = tick_ms.max(1);
        self
    }

    /// Set the renderer backend.
    pub fn with_renderer(mut self, renderer: RendererKind) -> Self {
        self.renderer = renderer;
        self
    }

    /// Restrict the installed decoders.
    pub fn with_codecs(mut self, codecs: Codecs) -> Self {
        self.codecs = codecs;
        self
    }

    /// Limit decoded images to `size` pixels on each side.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.limits = self.limits.with_max_dimensions(size, size);
        self
    }

    /// Write the last frame to `path`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            format: None,
            duration_ms: 1000,
            tick_ms: 16,
            renderer: RendererKind::Memory,
            codecs: Codecs::all(),
            limits: DecodeLimits::default(),
            output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.duration_ms, 1000);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.renderer, RendererKind::Memory);
        assert_eq!(config.codecs, Codecs::all());
        assert_eq!(config.limits.max_width, 16384);
        assert!(config.format.is_none());
    }

    #[test]
    fn test_builders() {
        let config = ViewerConfig::new()
            .with_format("gif")
            .with_timing(500, 0)
            .with_renderer(RendererKind::Gpu)
            .with_max_size(256)
            .with_output("last.png");

        assert_eq!(config.format.as_deref(), Some("gif"));
        assert_eq!((config.duration_ms, config.tick_ms), (500, 1));
        assert_eq!(config.renderer, RendererKind::Gpu);
        assert_eq!((config.limits.max_width, config.limits.max_height), (256, 256));
        assert_eq!(config.output, Some(PathBuf::from("last.png")));
    }
}
