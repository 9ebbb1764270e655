//! Scene lights.
//!
//! Lights have no distance falloff: a point light is as bright at 100 units
//! as it is at 1.

use prism_core::Color;
use prism_math::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Uniform light from everywhere. Never shadowed.
    Ambient { color: Color, brightness: f32 },
    /// Light emitted from a single position.
    Point {
        color: Color,
        position: Vec3,
        brightness: f32,
        casts_shadows: bool,
    },
    /// Light from infinitely far away. `direction` points from the scene
    /// towards the light.
    Directional { color: Color, direction: Vec3 },
}

impl Light {
    pub fn ambient(color: Color, brightness: f32) -> Self {
        Light::Ambient { color, brightness }
    }

    /// A shadow-casting point light.
    pub fn point(position: Vec3, color: Color, brightness: f32) -> Self {
        Light::Point {
            color,
            position,
            brightness,
            casts_shadows: true,
        }
    }

    pub fn directional(direction: Vec3, color: Color) -> Self {
        Light::Directional {
            color,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Toggle shadow casting. Only point lights carry the flag.
    pub fn with_shadows(mut self, enabled: bool) -> Self {
        if let Light::Point { casts_shadows, .. } = &mut self {
            *casts_shadows = enabled;
        }
        self
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient { .. })
    }

    /// Color times brightness.
    pub fn intensity(&self) -> Color {
        match *self {
            Light::Ambient { color, brightness } => color * brightness,
            Light::Point {
                color, brightness, ..
            } => color * brightness,
            Light::Directional { color, .. } => color,
        }
    }

    /// Unit direction from `point` to the light and the distance to it.
    ///
    /// `None` for ambient lights, and for a point light sitting exactly on
    /// `point`. Directional lights are infinitely far away.
    pub fn direction_from(&self, point: Vec3) -> Option<(Vec3, f32)> {
        match *self {
            Light::Ambient { .. } => None,
            Light::Point { position, .. } => {
                let to_light = position - point;
                let distance = to_light.length();
                (distance > 0.0).then(|| (to_light / distance, distance))
            }
            Light::Directional { direction, .. } => {
                (direction != Vec3::ZERO).then_some((direction, f32::INFINITY))
            }
        }
    }

    pub fn casts_shadows(&self) -> bool {
        match *self {
            Light::Ambient { .. } => false,
            Light::Point { casts_shadows, .. } => casts_shadows,
            Light::Directional { .. } => true,
        }
    }
}
