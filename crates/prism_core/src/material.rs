//! Surface materials.

use std::path::Path;
use std::sync::Arc;

use prism_math::{Vec2, Vec3};

use crate::texture::{Texture, TextureResult};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// How texture coordinates outside [0, 1] are folded back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Keep the fractional part: [0, 1).
    #[default]
    Repeat,
    /// Every other unit interval runs backwards.
    Mirror,
    /// Saturate to [0, 1].
    Clamp,
}

impl WrapMode {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            WrapMode::Repeat => x.rem_euclid(1.0),
            WrapMode::Mirror => {
                let m = x.rem_euclid(2.0);
                if m > 1.0 {
                    2.0 - m
                } else {
                    m
                }
            }
            WrapMode::Clamp => x.clamp(0.0, 1.0),
        }
    }

    pub fn apply_uv(self, uv: Vec2) -> Vec2 {
        Vec2::new(self.apply(uv.x), self.apply(uv.y))
    }
}

/// Appearance of a surface, shared read-only by every hit on it.
#[derive(Clone, Debug)]
pub struct Material {
    /// Flat diffuse color, also the ambient response.
    pub color: Color,

    /// Overrides `color` for diffuse lighting when present.
    pub texture: Option<Arc<Texture>>,

    /// Fraction of a mirror reflection added on top (0 = none).
    pub reflectivity: f32,

    /// Phong exponent for the specular highlight.
    pub shininess: f32,

    /// Multiplier applied to planar texture coordinates.
    pub uv_scale: Vec2,

    pub wrap: WrapMode,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::new(0.5, 0.5, 0.5), // Grey default
            texture: None,
            reflectivity: 0.0,
            shininess: 32.0,
            uv_scale: Vec2::ONE,
            wrap: WrapMode::Repeat,
        }
    }
}

impl Material {
    /// Create a new material with a flat color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Create a material whose diffuse color comes from an image file.
    ///
    /// Fails if the image cannot be read, so a scene never holds a material
    /// pointing at a missing texture.
    pub fn textured(path: impl AsRef<Path>) -> TextureResult<Self> {
        let texture = Texture::load(path)?;
        Ok(Self::default().with_texture(Arc::new(texture)))
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    pub fn with_uv(mut self, uv_scale: Vec2, wrap: WrapMode) -> Self {
        self.uv_scale = uv_scale;
        self.wrap = wrap;
        self
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Diffuse surface color at a hit.
    ///
    /// A texture, when present and the hit has coordinates, replaces the flat
    /// color entirely.
    pub fn surface_color(&self, uv: Option<Vec2>) -> Color {
        match (&self.texture, uv) {
            (Some(texture), Some(uv)) => texture.sample(self.wrap.apply_uv(uv)),
            _ => self.color,
        }
    }
}
