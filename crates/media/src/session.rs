//! Media session: one opened media item and its playback state machine.
//!
//! A session owns the decode context (while more frames can come) and the
//! render context (for its whole life). [`MediaSession::advance`] is a pure
//! function of the session state and the UI clock, so hosts call it on every
//! redraw; repeated calls with the same timestamp are no-ops.
//!
//! Every failure is absorbed into the empty state. A session that failed to
//! load reports a width and height of zero and shows the registry's
//! placeholder texture.

use crate::decoder::{DecodeContext, ImageDecoder};
use crate::display::{self, DrawCommand, FillMode, UvRect};
use crate::format;
use crate::registry::Registry;
use crate::renderer::{RenderContext, TextureId};
use common::{MediaResult, PixelFormat, Size};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Where the encoded media comes from.
#[derive(Clone, Copy, Debug)]
pub enum MediaSource<'a> {
    /// A file on disk. Its extension is used when no format hint is given.
    Path(&'a Path),
    /// Encoded bytes. A format hint is required to find a decoder.
    Memory(&'a [u8]),
}

impl<'a> MediaSource<'a> {
    fn path(&self) -> Option<&'a Path> {
        match self {
            MediaSource::Path(path) => Some(path),
            MediaSource::Memory(_) => None,
        }
    }
}

/// Playback state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No decode context: loading failed or playback has finished.
    Empty,
    /// A still image waiting for its only upload.
    Static,
    /// An animation with a running timer.
    Animated,
}

/// Decode half of a session, dropped as soon as no further progress is
/// possible.
struct ActiveDecode<'r> {
    decoder: &'r dyn ImageDecoder,
    context: Box<dyn DecodeContext>,
}

impl ActiveDecode<'_> {
    fn close(self) {
        self.decoder.close(self.context);
    }
}

/// One opened media item.
pub struct MediaSession<'r> {
    registry: &'r Registry,
    width: u32,
    height: u32,
    format: Option<PixelFormat>,
    frame_count: u32,
    animated: bool,
    render: Option<Box<dyn RenderContext>>,
    decode: Option<ActiveDecode<'r>>,
    next_advance: u64,
    uploads: u64,
}

impl<'r> MediaSession<'r> {
    fn empty(registry: &'r Registry) -> Self {
        Self {
            registry,
            width: 0,
            height: 0,
            format: None,
            frame_count: 0,
            animated: false,
            render: None,
            decode: None,
            next_advance: u64::MAX,
            uploads: 0,
        }
    }

    /// Open `source`, picking the decoder from `hint` or the file extension,
    /// and upload the first frame at `now`.
    pub fn open(
        registry: &'r Registry,
        source: MediaSource<'_>,
        hint: Option<&str>,
        now: u64,
    ) -> Self {
        match format::resolve_decoder(registry, hint, source.path()) {
            Some(decoder) => Self::open_with_decoder(registry, source, decoder, now),
            None => {
                debug!(?hint, path = ?source.path(), "no image decoder for source");
                Self::empty(registry)
            }
        }
    }

    /// Open `source` with an explicit decoder.
    pub fn open_with_decoder(
        registry: &'r Registry,
        source: MediaSource<'_>,
        decoder: &'r dyn ImageDecoder,
        now: u64,
    ) -> Self {
        match open_context(source, decoder) {
            Ok(context) => Self::from_decode_context(registry, decoder, context, now),
            Err(err) if err.is_data_error() => {
                debug!(error = %err, path = ?source.path(), "failed to decode image");
                Self::empty(registry)
            }
            Err(err) => {
                warn!(error = %err, path = ?source.path(), "failed to open image");
                Self::empty(registry)
            }
        }
    }

    /// Adopt a decode context opened by `decoder`.
    pub fn from_decode_context(
        registry: &'r Registry,
        decoder: &'r dyn ImageDecoder,
        context: Box<dyn DecodeContext>,
        now: u64,
    ) -> Self {
        let info = context.info();
        let animated = info.is_animated();

        let render = match registry.renderer().create_context(
            info.width,
            info.height,
            info.format,
            animated,
        ) {
            Ok(render) => render,
            Err(err) => {
                debug!(error = %err, "failed to create render context");
                decoder.close(context);
                return Self::empty(registry);
            }
        };

        debug!(
            width = info.width,
            height = info.height,
            format = info.format.name(),
            frames = info.frame_count,
            "opened image"
        );

        let mut session = Self {
            registry,
            width: info.width,
            height: info.height,
            format: Some(info.format),
            frame_count: info.frame_count,
            animated,
            render: Some(render),
            decode: Some(ActiveDecode { decoder, context }),
            next_advance: 0,
            uploads: 0,
        };
        session.advance(now);
        session
    }

    /// A still session showing caller-provided pixels.
    pub fn from_pixels(
        registry: &'r Registry,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
    ) -> Self {
        if let Err(err) = format.check_frame(width, height, pixels) {
            debug!(error = %err, "rejected pixel buffer");
            return Self::empty(registry);
        }

        let mut render = match registry
            .renderer()
            .create_context(width, height, format, false)
        {
            Ok(render) => render,
            Err(err) => {
                debug!(error = %err, "failed to create render context");
                return Self::empty(registry);
            }
        };
        render.write_frame(pixels);

        let mut session = Self::empty(registry);
        session.width = width;
        session.height = height;
        session.format = Some(format);
        session.render = Some(render);
        session.uploads = 1;
        session
    }

    /// Upload the next frame if `now` has reached the scheduled time.
    pub fn advance(&mut self, now: u64) {
        if now < self.next_advance {
            return;
        }
        let (Some(active), Some(render)) = (self.decode.as_mut(), self.render.as_mut()) else {
            return;
        };

        let outcome = match active.context.read_frame() {
            Ok(frame) => {
                render.write_frame(frame.pixels());
                Ok(frame.delay_ms())
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(delay) => {
                self.uploads += 1;
                trace!(now, delay, uploads = self.uploads, "uploaded frame");
                if delay == 0 {
                    self.finish();
                } else {
                    self.next_advance = now.saturating_add(u64::from(delay));
                }
            }
            Err(err) => {
                debug!(error = %err, "failed to read frame");
                self.finish();
            }
        }
    }

    /// Advance, then return the texture to draw.
    ///
    /// Sessions that never got a render context return the registry's
    /// placeholder.
    pub fn texture(&mut self, now: u64) -> TextureId {
        if self.render.is_none() {
            return self.registry.placeholder_texture();
        }
        self.advance(now);
        self.current_texture()
    }

    /// Texture holding the last uploaded frame, without advancing.
    pub fn current_texture(&self) -> TextureId {
        self.render
            .as_ref()
            .map_or_else(|| self.registry.placeholder_texture(), |render| render.texture())
    }

    /// Advance and describe how to draw the media into a `size` item.
    ///
    /// Returns `None` when there is nothing to draw; the host should still
    /// reserve `size`.
    pub fn display(
        &mut self,
        now: u64,
        size: Size,
        fill: FillMode,
        uv: UvRect,
    ) -> Option<DrawCommand> {
        self.render.as_ref()?;
        let texture = self.texture(now);
        let media = Size::new(self.width as f32, self.height as f32);
        let (dest, uv) = display::place(media, size, fill, uv);
        Some(DrawCommand { texture, dest, uv })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format of the uploaded frames, if loading succeeded.
    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    /// Frame count reported by the decoder.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Whether the session has something to show.
    pub fn is_loaded(&self) -> bool {
        self.render.is_some()
    }

    pub fn state(&self) -> SessionState {
        match (&self.decode, self.animated) {
            (None, _) => SessionState::Empty,
            (Some(_), false) => SessionState::Static,
            (Some(_), true) => SessionState::Animated,
        }
    }

    /// Number of frames uploaded so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Time of the next scheduled upload; `u64::MAX` once playback ended.
    pub fn next_advance(&self) -> u64 {
        self.next_advance
    }

    fn finish(&mut self) {
        if let Some(active) = self.decode.take() {
            active.close();
            debug!(uploads = self.uploads, "closed decode context");
        }
        self.next_advance = u64::MAX;
    }
}

impl Drop for MediaSession<'_> {
    fn drop(&mut self) {
        if let Some(active) = self.decode.take() {
            active.close();
        }
        if let Some(render) = self.render.take() {
            if let Some(renderer) = self.registry.try_renderer() {
                renderer.close_context(render);
            }
        }
    }
}

impl fmt::Debug for MediaSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSession")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("frame_count", &self.frame_count)
            .field("state", &self.state())
            .field("next_advance", &self.next_advance)
            .field("uploads", &self.uploads)
            .finish()
    }
}

/// Open a decode context, preferring the decoder's file input for paths.
fn open_context(
    source: MediaSource<'_>,
    decoder: &dyn ImageDecoder,
) -> MediaResult<Box<dyn DecodeContext>> {
    match source {
        MediaSource::Memory(data) => decoder.open_from_memory(data),
        MediaSource::Path(path) => {
            let mut file = File::open(path)?;
            let len = file.metadata()?.len();
            match decoder.file_input() {
                Some(input) => input.open_from_file(file, len),
                None => {
                    let mut data = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
                    file.read_to_end(&mut data)?;
                    drop(file);
                    decoder.open_from_memory(&data)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{FileInput, FrameRelease, FrameToken, MediaInfo};
    use crate::renderer::Renderer;
    use common::{MediaError, Point, Rect};
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct DecodeLog {
        opened_from_file: u32,
        opened_from_memory: u32,
        closed: u32,
        begun: u32,
        ended: u32,
        /// Reads attempted after end-read-frame without a new begin.
        stale_reads: u32,
    }

    /// Decoder returning a fixed frame script: frame `i` is filled with byte
    /// `i + 1` and carries `delays[i]`. Loops like real animated backends.
    #[derive(Clone)]
    struct ScriptedDecoder {
        width: u32,
        height: u32,
        frame_count: u32,
        delays: Vec<u32>,
        fail_reads_after: Option<u32>,
        with_file_input: bool,
        with_release: bool,
        magic: &'static [u8],
        log: Rc<RefCell<DecodeLog>>,
    }

    impl ScriptedDecoder {
        fn still() -> Self {
            Self {
                width: 2,
                height: 2,
                frame_count: 0,
                delays: vec![0],
                fail_reads_after: None,
                with_file_input: false,
                with_release: true,
                magic: b"ok",
                log: Rc::default(),
            }
        }

        fn animated(delays: &[u32]) -> Self {
            Self {
                frame_count: delays.len() as u32,
                delays: delays.to_vec(),
                ..Self::still()
            }
        }

        fn context(&self) -> ScriptedContext {
            ScriptedContext {
                decoder: self.clone(),
                position: 0,
                pixels: Vec::new(),
                reads: 0,
                open_frame: false,
            }
        }
    }

    impl ImageDecoder for ScriptedDecoder {
        fn open_from_memory(&self, data: &[u8]) -> MediaResult<Box<dyn DecodeContext>> {
            if data != self.magic {
                return Err(MediaError::decode("bad magic"));
            }
            self.log.borrow_mut().opened_from_memory += 1;
            Ok(Box::new(self.context()))
        }

        fn file_input(&self) -> Option<&dyn FileInput> {
            if self.with_file_input {
                Some(self)
            } else {
                None
            }
        }

        fn close(&self, context: Box<dyn DecodeContext>) {
            self.log.borrow_mut().closed += 1;
            drop(context);
        }
    }

    impl FileInput for ScriptedDecoder {
        fn open_from_file(&self, mut file: File, len: u64) -> MediaResult<Box<dyn DecodeContext>> {
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            assert_eq!(data.len() as u64, len);
            if data != self.magic {
                return Err(MediaError::decode("bad magic"));
            }
            self.log.borrow_mut().opened_from_file += 1;
            Ok(Box::new(self.context()))
        }
    }

    struct ScriptedContext {
        decoder: ScriptedDecoder,
        position: usize,
        pixels: Vec<u8>,
        reads: u32,
        open_frame: bool,
    }

    impl DecodeContext for ScriptedContext {
        fn info(&self) -> MediaInfo {
            MediaInfo {
                width: self.decoder.width,
                height: self.decoder.height,
                format: PixelFormat::Rgba8,
                frame_count: self.decoder.frame_count,
            }
        }

        fn begin_read_frame(&mut self, _token: &FrameToken) -> MediaResult<u32> {
            if let Some(limit) = self.decoder.fail_reads_after {
                if self.reads >= limit {
                    return Err(MediaError::decode("truncated"));
                }
            }
            self.reads += 1;
            self.decoder.log.borrow_mut().begun += 1;

            let index = self.position;
            self.position = (self.position + 1) % self.decoder.delays.len();
            self.pixels = vec![index as u8 + 1; self.info().frame_len()];
            self.open_frame = true;
            Ok(self.decoder.delays[index])
        }

        fn pixels(&self, _token: &FrameToken) -> &[u8] {
            if !self.open_frame {
                self.decoder.log.borrow_mut().stale_reads += 1;
            }
            &self.pixels
        }

        fn frame_release(&mut self) -> Option<&mut dyn FrameRelease> {
            if self.decoder.with_release {
                Some(self)
            } else {
                None
            }
        }
    }

    impl FrameRelease for ScriptedContext {
        fn end_read_frame(&mut self) {
            self.open_frame = false;
            self.decoder.log.borrow_mut().ended += 1;
        }
    }

    #[derive(Debug, Default)]
    struct RenderLog {
        created: Vec<(u32, u32, PixelFormat, bool)>,
        /// First byte of each upload, excluding the placeholder.
        uploads: Vec<u8>,
        closed: u32,
        next_texture: u64,
    }

    #[derive(Clone, Default)]
    struct TestRenderer {
        log: Rc<RefCell<RenderLog>>,
        fail_create: bool,
    }

    /// Animated contexts flip between two texture handles.
    struct TestContext {
        log: Rc<RefCell<RenderLog>>,
        textures: Vec<TextureId>,
        current: usize,
        writes: u32,
    }

    impl Renderer for TestRenderer {
        fn create_context(
            &self,
            width: u32,
            height: u32,
            format: PixelFormat,
            animated: bool,
        ) -> MediaResult<Box<dyn RenderContext>> {
            if self.fail_create && width > 1 {
                return Err(MediaError::render("out of texture memory"));
            }
            let mut log = self.log.borrow_mut();
            log.created.push((width, height, format, animated));
            let count = if animated { 2 } else { 1 };
            let textures = (0..count)
                .map(|_| {
                    log.next_texture += 1;
                    TextureId(log.next_texture)
                })
                .collect();
            Ok(Box::new(TestContext {
                log: self.log.clone(),
                textures,
                current: 0,
                writes: 0,
            }))
        }

        fn close_context(&self, _context: Box<dyn RenderContext>) {
            self.log.borrow_mut().closed += 1;
        }
    }

    impl RenderContext for TestContext {
        fn write_frame(&mut self, pixels: &[u8]) {
            if self.writes > 0 {
                self.current = (self.current + 1) % self.textures.len();
            }
            self.writes += 1;
            // The placeholder is 1x1 and all zeros.
            if pixels.len() > 4 {
                self.log.borrow_mut().uploads.push(pixels[0]);
            }
        }

        fn texture(&self) -> TextureId {
            self.textures[self.current]
        }
    }

    fn registry_with(tag: &str, decoder: ScriptedDecoder) -> (Registry, TestRenderer) {
        let renderer = TestRenderer::default();
        let mut registry = Registry::new();
        registry.install_renderer(renderer.clone());
        registry.install_decoder(tag, decoder);
        (registry, renderer)
    }

    #[test]
    fn test_still_image_uploads_once() {
        let decoder = ScriptedDecoder::still();
        let decode_log = decoder.log.clone();
        let (registry, renderer) = registry_with("x", decoder);

        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);
        assert_eq!(session.width(), 2);
        assert_eq!(session.height(), 2);
        assert_eq!(session.frame_count(), 0);
        assert!(!session.is_animated());
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.uploads(), 1);
        assert_eq!(decode_log.borrow().closed, 1);

        let texture = session.texture(0);
        for now in [1, 50, 10_000, u64::MAX] {
            assert_eq!(session.texture(now), texture);
        }
        assert_ne!(texture, registry.placeholder_texture());
        assert_eq!(session.uploads(), 1);
        assert_eq!(renderer.log.borrow().uploads, vec![1]);
        assert_eq!(
            renderer.log.borrow().created[1],
            (2, 2, PixelFormat::Rgba8, false)
        );
    }

    #[test]
    fn test_three_frame_animation_cycles() {
        let (registry, renderer) = registry_with("x", ScriptedDecoder::animated(&[100, 100, 100]));

        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);
        assert_eq!(session.state(), SessionState::Animated);
        assert_eq!(session.frame_count(), 3);
        assert_eq!(renderer.log.borrow().uploads, vec![1]);

        for now in [0, 50, 99] {
            session.advance(now);
        }
        assert_eq!(renderer.log.borrow().uploads, vec![1]);

        session.advance(100);
        session.advance(200);
        session.advance(300);
        assert_eq!(renderer.log.borrow().uploads, vec![1, 2, 3, 1]);
        assert_eq!(session.next_advance(), 400);
        assert_eq!(session.state(), SessionState::Animated);
    }

    #[test]
    fn test_loop_delays_sum_to_duration() {
        let delays = [30, 70, 20, 80];
        let (registry, renderer) = registry_with("x", ScriptedDecoder::animated(&delays));
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);

        // One tick per millisecond through two full loops.
        let total: u64 = delays.iter().map(|&d| u64::from(d)).sum();
        for now in 1..total * 2 {
            session.advance(now);
        }
        assert_eq!(session.uploads(), 8);
        assert_eq!(renderer.log.borrow().uploads, vec![1, 2, 3, 4, 1, 2, 3, 4]);
        assert_eq!(session.next_advance(), total * 2);
    }

    #[test]
    fn test_same_timestamp_is_idempotent() {
        let (registry, renderer) = registry_with("x", ScriptedDecoder::animated(&[100, 100]));
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);

        session.advance(100);
        session.advance(100);
        let _ = session.texture(100);
        assert_eq!(renderer.log.borrow().uploads, vec![1, 2]);
    }

    #[test]
    fn test_late_tick_schedules_from_now() {
        let (registry, _renderer) = registry_with("x", ScriptedDecoder::animated(&[100, 100]));
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);

        session.advance(350);
        assert_eq!(session.uploads(), 2);
        assert_eq!(session.next_advance(), 450);
    }

    #[test]
    fn test_animated_texture_changes() {
        let (registry, _renderer) = registry_with("x", ScriptedDecoder::animated(&[10, 10]));
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);

        let first = session.texture(0);
        let second = session.texture(10);
        assert_ne!(first, second);
        assert_eq!(session.texture(20), first);
    }

    #[test]
    fn test_zero_delay_ends_animation() {
        let (registry, renderer) = registry_with("x", ScriptedDecoder::animated(&[100, 0, 100]));
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);

        session.advance(100);
        assert_eq!(session.state(), SessionState::Empty);
        let texture = session.texture(200);
        session.advance(1_000);
        assert_eq!(renderer.log.borrow().uploads, vec![1, 2]);
        assert_eq!(session.texture(5_000), texture);
        assert!(session.is_loaded());
        assert_eq!(session.width(), 2);
    }

    #[test]
    fn test_read_failure_keeps_last_frame() {
        let decoder = ScriptedDecoder {
            fail_reads_after: Some(2),
            ..ScriptedDecoder::animated(&[100, 100, 100])
        };
        let decode_log = decoder.log.clone();
        let (registry, renderer) = registry_with("x", decoder);
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);

        session.advance(100);
        session.advance(200);
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(decode_log.borrow().closed, 1);
        assert_eq!(renderer.log.borrow().uploads, vec![1, 2]);
        assert_ne!(session.texture(300), registry.placeholder_texture());
    }

    #[test]
    fn test_end_read_frame_follows_each_upload() {
        let decoder = ScriptedDecoder::animated(&[10, 10, 10]);
        let decode_log = decoder.log.clone();
        let (registry, _renderer) = registry_with("x", decoder);
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);
        for now in (10..=50).step_by(10) {
            session.advance(now);
        }

        let log = decode_log.borrow();
        assert_eq!(log.begun, 6);
        assert_eq!(log.ended, 6);
        assert_eq!(log.stale_reads, 0);
    }

    #[test]
    fn test_missing_end_read_frame_is_fine() {
        let decoder = ScriptedDecoder {
            with_release: false,
            ..ScriptedDecoder::animated(&[10, 10])
        };
        let decode_log = decoder.log.clone();
        let (registry, renderer) = registry_with("x", decoder);
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);
        session.advance(10);

        assert_eq!(decode_log.borrow().ended, 0);
        assert_eq!(renderer.log.borrow().uploads, vec![1, 2]);
    }

    #[test]
    fn test_unregistered_format_is_empty() {
        let (registry, renderer) = registry_with("x", ScriptedDecoder::still());
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("y"), 0);

        assert_eq!(session.width(), 0);
        assert_eq!(session.height(), 0);
        assert_eq!(session.state(), SessionState::Empty);
        assert!(!session.is_loaded());
        assert_eq!(session.texture(0), registry.placeholder_texture());
        assert!(session.display(0, Size::new(10.0, 10.0), FillMode::Fill, UvRect::FULL).is_none());
        // Only the placeholder context exists.
        assert_eq!(renderer.log.borrow().created.len(), 1);
    }

    #[test]
    fn test_memory_without_hint_is_empty() {
        let (registry, _renderer) = registry_with("x", ScriptedDecoder::still());
        let session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), None, 0);
        assert!(!session.is_loaded());
    }

    #[test]
    fn test_corrupt_data_is_empty() {
        let (registry, _renderer) = registry_with("x", ScriptedDecoder::still());
        let mut session =
            MediaSession::open(&registry, MediaSource::Memory(b"garbage"), Some("x"), 0);
        assert_eq!((session.width(), session.height()), (0, 0));
        assert_eq!(session.texture(0), registry.placeholder_texture());
    }

    #[test]
    fn test_extension_resolves_case_insensitively() {
        let (registry, _renderer) = registry_with("jpg", ScriptedDecoder::still());
        let mut file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        file.write_all(b"ok").unwrap();

        let session = MediaSession::open(&registry, MediaSource::Path(file.path()), None, 0);
        assert!(session.is_loaded());
        assert_eq!(session.width(), 2);
    }

    #[test]
    fn test_path_prefers_file_input() {
        let decoder = ScriptedDecoder {
            with_file_input: true,
            ..ScriptedDecoder::still()
        };
        let decode_log = decoder.log.clone();
        let (registry, _renderer) = registry_with("x", decoder);
        let mut file = tempfile::Builder::new().suffix(".x").tempfile().unwrap();
        file.write_all(b"ok").unwrap();

        let session = MediaSession::open(&registry, MediaSource::Path(file.path()), None, 0);
        assert!(session.is_loaded());
        assert_eq!(decode_log.borrow().opened_from_file, 1);
        assert_eq!(decode_log.borrow().opened_from_memory, 0);
    }

    #[test]
    fn test_path_falls_back_to_memory() {
        let decoder = ScriptedDecoder::still();
        let decode_log = decoder.log.clone();
        let (registry, _renderer) = registry_with("x", decoder);
        let mut file = tempfile::Builder::new().suffix(".x").tempfile().unwrap();
        file.write_all(b"ok").unwrap();

        let session = MediaSession::open(&registry, MediaSource::Path(file.path()), None, 0);
        assert!(session.is_loaded());
        assert_eq!(decode_log.borrow().opened_from_file, 0);
        assert_eq!(decode_log.borrow().opened_from_memory, 1);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (registry, _renderer) = registry_with("x", ScriptedDecoder::still());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.x");
        let session = MediaSession::open(&registry, MediaSource::Path(&path), None, 0);
        assert!(!session.is_loaded());
    }

    #[test]
    fn test_render_failure_closes_decoder() {
        let decoder = ScriptedDecoder::animated(&[10, 10]);
        let decode_log = decoder.log.clone();
        let renderer = TestRenderer {
            fail_create: true,
            ..TestRenderer::default()
        };
        let mut registry = Registry::new();
        registry.install_renderer(renderer);
        registry.install_decoder("x", decoder);

        let session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);
        assert!(!session.is_loaded());
        assert_eq!(session.width(), 0);
        assert_eq!(decode_log.borrow().closed, 1);
    }

    #[test]
    fn test_drop_closes_both_halves() {
        let decoder = ScriptedDecoder::animated(&[10, 10]);
        let decode_log = decoder.log.clone();
        let (registry, renderer) = registry_with("x", decoder);
        {
            let _session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);
        }
        assert_eq!(decode_log.borrow().closed, 1);
        assert_eq!(renderer.log.borrow().closed, 1);
    }

    #[test]
    fn test_drop_after_finish_closes_decoder_once() {
        let decoder = ScriptedDecoder::still();
        let decode_log = decoder.log.clone();
        let (registry, renderer) = registry_with("x", decoder);
        drop(MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0));
        assert_eq!(decode_log.borrow().closed, 1);
        assert_eq!(renderer.log.borrow().closed, 1);
    }

    #[test]
    fn test_from_pixels() {
        let (registry, renderer) = registry_with("x", ScriptedDecoder::still());
        let mut session =
            MediaSession::from_pixels(&registry, 3, 1, PixelFormat::Rgb8, &[9; 9]);
        assert!(session.is_loaded());
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.uploads(), 1);
        assert_eq!(renderer.log.borrow().uploads, vec![9]);
        assert_ne!(session.texture(0), registry.placeholder_texture());

        let short = MediaSession::from_pixels(&registry, 3, 1, PixelFormat::Rgba8, &[9; 9]);
        assert!(!short.is_loaded());
    }

    #[test]
    fn test_open_with_explicit_decoder() {
        let decoder = ScriptedDecoder::animated(&[10, 10]);
        let (registry, _renderer) = registry_with("x", ScriptedDecoder::still());
        let session =
            MediaSession::open_with_decoder(&registry, MediaSource::Memory(b"ok"), &decoder, 5);
        assert_eq!(session.state(), SessionState::Animated);
        assert_eq!(session.next_advance(), 15);
    }

    #[test]
    fn test_display_places_texture() {
        let decoder = ScriptedDecoder {
            width: 200,
            height: 100,
            ..ScriptedDecoder::still()
        };
        let (registry, _renderer) = registry_with("x", decoder);
        let mut session = MediaSession::open(&registry, MediaSource::Memory(b"ok"), Some("x"), 0);

        let command = session
            .display(0, Size::new(100.0, 100.0), FillMode::Center, UvRect::FULL)
            .unwrap();
        assert_eq!(command.texture, session.current_texture());
        assert_eq!(command.dest, Rect::new(0.0, 25.0, 100.0, 50.0));

        let command = session
            .display(0, Size::new(100.0, 100.0), FillMode::Fill, UvRect::FULL)
            .unwrap();
        assert_eq!(command.uv.min, Point::new(0.25, 0.0));
    }
}
