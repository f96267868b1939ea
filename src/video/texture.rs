//! Immutable 2D textures fed from already-decoded RGBA8 pixel buffers.
//! Decoding image containers is someone else's job; this module only uploads
//! and samples.

use crate::errors::{Error, Result};
use crate::math::Vector2;
use crate::video::device::{Device, TextureId};

/// Sets the wrap parameter for sampling beyond [0, 1].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TextureWrap {
    /// Samples at coord x + 1 map to coord x.
    Repeat,
    /// Samples at coord x + 1 map to coord 1 - x.
    Mirror,
    /// Samples at coord x + 1 map to coord 1.
    Clamp,
}

/// Specify how the texture is read whenever a pixel is sampled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TextureFilter {
    /// The texture element nearest to the center of the pixel.
    Nearest,
    /// The weighted average of the four closest texture elements.
    Linear,
}

/// Sampling configuration applied at creation. With `mipmap` set, a full
/// chain is generated after upload and minification samples across it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TextureSampling {
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub mipmap: bool,
}

impl Default for TextureSampling {
    fn default() -> Self {
        TextureSampling {
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            mipmap: true,
        }
    }
}

/// A GPU texture object populated once from a decoded RGBA8 buffer, bound to
/// a sampler unit each frame, disposed at shutdown.
#[derive(Debug)]
pub struct Texture2D {
    id: TextureId,
    dimensions: Vector2<u32>,
}

impl Texture2D {
    /// Uploads a decoded pixel buffer.
    ///
    /// `row_stride` is the byte distance between the starts of consecutive
    /// rows in `bytes`. Only tightly packed rows are accepted: anything but
    /// `width * 4` fails with [`Error::UnsupportedStride`] before any GPU
    /// object is created, rather than silently corrupting the upload.
    pub fn new<D>(
        device: &mut D,
        bytes: &[u8],
        dimensions: Vector2<u32>,
        row_stride: usize,
        sampling: &TextureSampling,
    ) -> Result<Texture2D>
    where
        D: Device + ?Sized,
    {
        let expected = dimensions.x as usize * 4;
        if row_stride != expected {
            return Err(Error::UnsupportedStride {
                expected,
                actual: row_stride,
            });
        }
        assert_eq!(bytes.len(), row_stride * dimensions.y as usize);

        let id = unsafe { device.create_texture(dimensions, bytes, sampling)? };
        Ok(Texture2D { id, dimensions })
    }

    /// Binds the texture to a sampler unit for subsequent draw calls.
    pub fn bind<D>(&self, device: &mut D, unit: u32) -> Result<()>
    where
        D: Device + ?Sized,
    {
        unsafe { device.bind_texture(unit, &self.id) }
    }

    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    /// Releases the texture object, exactly once by construction.
    pub fn dispose<D>(self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        unsafe { device.delete_texture(self.id) }
    }
}

/// Reverses the row order of a tightly packed RGBA8 buffer in place, so
/// images decoded top-to-bottom can be uploaded with the bottom-left origin
/// the sampler expects.
pub fn flip_rows(bytes: &mut [u8], dimensions: Vector2<u32>) {
    let row = dimensions.x as usize * 4;
    let height = dimensions.y as usize;
    assert_eq!(bytes.len(), row * height);

    for y in 0..height / 2 {
        let (head, tail) = bytes.split_at_mut((height - y - 1) * row);
        head[y * row..y * row + row].swap_with_slice(&mut tail[..row]);
    }
}
