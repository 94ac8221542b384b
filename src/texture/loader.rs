use std::path::Path;
use std::sync::Arc;

use super::{PixelFormat, TextureImage};
use crate::error::{FreecamError, Result};
use crate::gpu::Gpu;

/// Decode an image file, flipped vertically, as RGBA when `has_alpha` is set and RGB otherwise
pub fn decode_texture(path: &Path, has_alpha: bool) -> Result<TextureImage> {
    let img = image::open(path)
        .map_err(|source| FreecamError::TextureDecode {
            path: path.to_path_buf(),
            source,
        })?
        .flipv();

    let width = img.width();
    let height = img.height();
    let (format, pixels) = if has_alpha {
        (PixelFormat::Rgba, img.to_rgba8().into_raw())
    } else {
        (PixelFormat::Rgb, img.to_rgb8().into_raw())
    };

    Ok(TextureImage {
        width,
        height,
        format,
        pixels,
    })
}

/// A 2D texture on the GPU; deleted when dropped.
pub struct Texture<G: Gpu> {
    gpu: Arc<G>,
    raw: G::Texture,
}

impl<G: Gpu> Texture<G> {
    /// Uploads `image`. A pixel buffer that does not match its dimensions is
    /// rejected before any GPU call.
    pub fn from_image(gpu: &Arc<G>, image: &TextureImage) -> Result<Self> {
        let expected = image.width as usize * image.height as usize * image.format.channels();
        if image.pixels.len() != expected {
            return Err(FreecamError::Gpu(format!(
                "{}x{} {:?} texture needs {expected} bytes, got {}",
                image.width,
                image.height,
                image.format,
                image.pixels.len()
            )));
        }
        let raw = gpu.create_texture(image).map_err(FreecamError::Gpu)?;
        Ok(Self {
            gpu: Arc::clone(gpu),
            raw,
        })
    }

    pub fn bind(&self, unit: u32) {
        self.gpu.bind_texture(unit, Some(self.raw));
    }

    #[cfg(test)]
    pub fn raw(&self) -> G::Texture {
        self.raw
    }
}

impl<G: Gpu> Drop for Texture<G> {
    fn drop(&mut self) {
        self.gpu.delete_texture(self.raw);
    }
}

/// Decode and upload a texture. Nothing touches the GPU when decoding fails.
pub fn load_texture<G: Gpu>(gpu: &Arc<G>, path: &Path, has_alpha: bool) -> Result<Texture<G>> {
    let image = decode_texture(path, has_alpha).inspect_err(|e| {
        log::error!("{e}");
    })?;
    log::debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        image.width,
        image.height,
        image.format
    );
    // the decoded pixels are dropped once the upload returns
    Texture::from_image(gpu, &image)
}

/// Create a solid white 1x1 texture for fallbacks
pub fn white_texture<G: Gpu>(gpu: &Arc<G>) -> Result<Texture<G>> {
    let image = TextureImage {
        width: 1,
        height: 1,
        format: PixelFormat::Rgba,
        pixels: vec![255, 255, 255, 255],
    };
    Texture::from_image(gpu, &image)
}
