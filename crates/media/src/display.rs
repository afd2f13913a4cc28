//! Placement of a session's texture inside a UI item.

use crate::renderer::TextureId;
use common::{Point, Rect, Size};

/// How the media is fitted into the target size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Scale both axes independently to the target.
    #[default]
    Stretch,
    /// Keep the aspect ratio, letterbox inside the target.
    Center,
    /// Keep the aspect ratio, crop to cover the target.
    Fill,
}

/// Texture coordinates of the sampled sub-rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
    pub min: Point,
    pub max: Point,
}

impl UvRect {
    /// The whole texture.
    pub const FULL: UvRect = UvRect {
        min: Point::new(0.0, 0.0),
        max: Point::new(1.0, 1.0),
    };

    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// What the host should draw for one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub texture: TextureId,
    /// Destination, relative to the item origin.
    pub dest: Rect,
    pub uv: UvRect,
}

/// Compute destination and texture coordinates for `media` texels shown in
/// a `target` sized item.
pub fn place(media: Size, target: Size, fill: FillMode, uv: UvRect) -> (Rect, UvRect) {
    let full = Rect::from_origin_size(Point::ZERO, target);
    let span_x = (uv.max.x - uv.min.x) * media.width;
    let span_y = (uv.max.y - uv.min.y) * media.height;
    let span = Size::new(span_x.abs(), span_y.abs());

    if span.is_empty() || target.is_empty() {
        return (full, uv);
    }

    match fill {
        FillMode::Stretch => (full, uv),
        FillMode::Fill => {
            let scale = (target.width / span.width).max(target.height / span.height);
            let visible = target.scale(1.0 / scale);
            let inset_x = (span.width - visible.width) / 2.0 / media.width * span_x.signum();
            let inset_y = (span.height - visible.height) / 2.0 / media.height * span_y.signum();
            let cropped = UvRect::new(
                Point::new(uv.min.x + inset_x, uv.min.y + inset_y),
                Point::new(uv.max.x - inset_x, uv.max.y - inset_y),
            );
            (full, cropped)
        }
        FillMode::Center => {
            let scale = (target.width / span.width).min(target.height / span.height);
            let drawn = span.scale(scale);
            let origin = Point::new(
                (target.width - drawn.width) / 2.0,
                (target.height - drawn.height) / 2.0,
            );
            (Rect::from_origin_size(origin, drawn), uv)
        }
    }
}
