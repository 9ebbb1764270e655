//! Prism math primitives.
//!
//! Vectors and matrices come from glam; this crate adds the ray tracing
//! types built on top of them: [`Interval`], [`Ray`], [`Aabb`] and the
//! [`Mat4Ext`] transform helpers.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Tolerance shared by the intersection tests and the shadow-ray offset.
///
/// A single global constant, not scaled per scene.
pub const EPSILON: f32 = 1e-4;

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
