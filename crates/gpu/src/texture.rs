//! GPU texture management.

use crate::context::GpuContext;
use common::PixelFormat;
use std::borrow::Cow;
use wgpu::{
    Extent3d, Texture, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages,
    TextureView, TextureViewDescriptor,
};

/// Format of every media texture. RGB frames are expanded on upload.
pub const MEDIA_TEXTURE_FORMAT: TextureFormat = TextureFormat::Rgba8UnormSrgb;

/// GPU texture wrapper.
pub struct GpuTexture {
    /// The wgpu texture.
    pub texture: Texture,
    /// Texture dimensions.
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    /// Create an uninitialised media texture.
    pub fn new(context: &GpuContext, width: u32, height: u32) -> Self {
        let texture = context.device.create_texture(&TextureDescriptor {
            label: Some("Media Texture"),
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: MEDIA_TEXTURE_FORMAT,
            usage: TextureUsages::TEXTURE_BINDING
                | TextureUsages::COPY_DST
                | TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        Self {
            texture,
            width,
            height,
        }
    }

    /// Replace the texture contents with one frame in `format`.
    pub fn upload(&self, context: &GpuContext, format: PixelFormat, pixels: &[u8]) {
        let data = to_rgba(format, pixels);
        context.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Create a view for sampling.
    pub fn view(&self) -> TextureView {
        self.texture.create_view(&TextureViewDescriptor::default())
    }
}

/// Frame pixels as RGBA, borrowing when no conversion is needed.
pub fn to_rgba(format: PixelFormat, pixels: &[u8]) -> Cow<'_, [u8]> {
    match format {
        PixelFormat::Rgba8 => Cow::Borrowed(pixels),
        PixelFormat::Rgb8 => Cow::Owned(
            pixels
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect(),
        ),
    }
}
