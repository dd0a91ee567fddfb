use std::path::Path;

use image::RgbaImage;

use crate::error::{Error, Result};

/// Decoded RGBA8 pixels, rows ordered bottom-up so `v = 0` samples the
/// bottom edge of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn from_rgba(image: RgbaImage) -> Self {
        let flipped = image::imageops::flip_vertical(&image);
        let (width, height) = flipped.dimensions();
        Self {
            width,
            height,
            pixels: flipped.into_raw(),
        }
    }

    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    /// Reject images the device cannot hold in one 2D texture.
    pub fn check_limits(&self, path: &Path, max_dimension: u32) -> Result<()> {
        if self.width > max_dimension || self.height > max_dimension {
            return Err(Error::TextureTooLarge {
                path: path.to_path_buf(),
                width: self.width,
                height: self.height,
                max: max_dimension,
            });
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Asset {
            kind: "texture",
            path: path.to_path_buf(),
            source,
        })?;
        let image = Self::from_bytes(&bytes, path)?;
        tracing::debug!("loaded texture {} ({}x{})", path.display(), image.width, image.height);
        Ok(image)
    }
}

/// A sampled 2D texture on the GPU
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &TextureImage, label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }

    pub fn destroy(&self) {
        self.texture.destroy();
    }
}
