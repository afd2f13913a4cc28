//! Simulated playback of one file against a UI clock.

use crate::config::ViewerConfig;
use crate::RendererHandle;
use anyhow::{Context, Result};
use common::PixelFormat;
use gpu::TextureSnapshot;
use media::format::resolve_tag;
use media::{MediaSession, MediaSource, Registry, SessionState, TextureId};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happened while playing one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlaybackReport {
    pub path: PathBuf,
    /// Tag used to look up the decoder.
    pub tag: Option<String>,
    pub loaded: bool,
    pub width: u32,
    pub height: u32,
    pub format: Option<PixelFormat>,
    pub frame_count: u32,
    pub animated: bool,
    /// Frames uploaded during the simulated run.
    pub uploads: u64,
    /// Distinct texture handles returned to the simulated host.
    pub distinct_textures: usize,
    /// Session state after the last tick.
    pub state: &'static str,
}

impl PlaybackReport {
    /// One-line summary for terminal output.
    pub fn summary(&self) -> String {
        if !self.loaded {
            return format!("{}: not loaded (tag {:?})", self.path.display(), self.tag);
        }
        format!(
            "{}: {}x{} {} frames={} uploads={} textures={} state={}",
            self.path.display(),
            self.width,
            self.height,
            self.format.map_or("-", |format| format.name()),
            self.frame_count,
            self.uploads,
            self.distinct_textures,
            self.state,
        )
    }
}

/// Result of a playback run.
#[derive(Debug)]
pub struct Playback {
    pub report: PlaybackReport,
    /// Texture shown at the last tick, read back while the session was
    /// still open. `None` when nothing loaded or the renderer keeps no CPU
    /// copy.
    pub last_frame: Option<TextureSnapshot>,
}

/// Open `path` and call `texture(now)` every tick from 0 to the configured
/// duration inclusive.
pub fn play_file(
    registry: &Registry,
    renderer: &RendererHandle,
    path: &Path,
    config: &ViewerConfig,
) -> Playback {
    let hint = config.format.as_deref();
    let tag = resolve_tag(hint, Some(path)).map(str::to_string);

    let mut session = MediaSession::open(registry, MediaSource::Path(path), hint, 0);
    let mut textures = HashSet::new();
    let mut last_texture = TextureId::NULL;

    let step = usize::try_from(config.tick_ms.max(1)).unwrap_or(usize::MAX);
    for now in (0..=config.duration_ms).step_by(step) {
        last_texture = session.texture(now);
        textures.insert(last_texture);
        renderer.present();
    }
    debug!(path = %path.display(), uploads = session.uploads(), "finished playback");

    let last_frame = session
        .is_loaded()
        .then(|| renderer.snapshot(last_texture))
        .flatten();

    let report = PlaybackReport {
        path: path.to_path_buf(),
        tag,
        loaded: session.is_loaded(),
        width: session.width(),
        height: session.height(),
        format: session.format(),
        frame_count: session.frame_count(),
        animated: session.is_animated(),
        uploads: session.uploads(),
        distinct_textures: textures.len(),
        state: state_name(session.state()),
    };

    Playback { report, last_frame }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Empty => "empty",
        SessionState::Static => "static",
        SessionState::Animated => "animated",
    }
}

/// Write a frame to a PNG file.
pub fn save_png(snapshot: &TextureSnapshot, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), snapshot.width, snapshot.height);
    encoder.set_color(match snapshot.format {
        PixelFormat::Rgb8 => png::ColorType::Rgb,
        PixelFormat::Rgba8 => png::ColorType::Rgba,
    });
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&snapshot.pixels)?;
    writer.finish()?;
    Ok(())
}
