//! Texture storage, sampling and file loading for materials.
//!
//! Pixels are kept in linear float RGBA so the tracer can multiply them
//! straight into light contributions.

use std::path::Path;

use prism_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur while creating or loading a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Texture is {width}x{height} but has {actual} pixels")]
    PixelCount {
        width: u32,
        height: u32,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// How a texture is read between texel centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    Nearest,
    #[default]
    Bilinear,
}

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,

    /// Linear RGBA, row-major, top row first.
    pub pixels: Vec<[f32; 4]>,

    pub filter: FilterMode,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a texture from pixel data, checking the buffer matches the size.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::PixelCount {
                width,
                height,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            filter: FilterMode::default(),
            path: path.into(),
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            filter: FilterMode::Nearest,
            path: "<solid>".to_string(),
        }
    }

    /// Load an image file, converting sRGB bytes to linear floats.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| {
                [
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                    p[3] as f32 / 255.0, // Alpha is linear
                ]
            })
            .collect();

        let texture = Self::new(width, height, pixels, path.to_string_lossy())?;
        log::debug!("Loaded texture: {} ({}x{})", texture.path, width, height);
        Ok(texture)
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Sample at `uv`, with (0, 0) at the bottom-left.
    ///
    /// Coordinates outside [0, 1] are clamped; wrapping is the material's job.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let u = uv.x.clamp(0.0, 1.0);
        let v = 1.0 - uv.y.clamp(0.0, 1.0); // Flip V for image rows

        match self.filter {
            FilterMode::Nearest => {
                let x = ((u * self.width as f32) as u32).min(self.width - 1);
                let y = ((v * self.height as f32) as u32).min(self.height - 1);
                self.texel(x, y)
            }
            FilterMode::Bilinear => {
                let x = u * (self.width - 1) as f32;
                let y = v * (self.height - 1) as f32;

                let x0 = x.floor() as u32;
                let y0 = y.floor() as u32;
                let x1 = (x0 + 1).min(self.width - 1);
                let y1 = (y0 + 1).min(self.height - 1);
                let fx = x.fract();
                let fy = y.fract();

                let top = self.texel(x0, y0).lerp(self.texel(x1, y0), fx);
                let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), fx);
                top.lerp(bottom, fy)
            }
        }
    }

    fn texel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .unwrap_or(Vec3::ZERO)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
