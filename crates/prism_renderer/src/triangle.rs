//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::hittable::{Hittable, Intersection};
use prism_core::Material;
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3, EPSILON};

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, zero for degenerate triangles)
    normal: Vec3,
    /// Per-vertex texture coordinates
    uvs: Option<[Vec2; 3]>,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle; the normal follows the v0 -> v1 -> v2 winding.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            v1,
            v2,
            normal,
            uvs: None,
            material,
            bbox,
        }
    }

    /// Attach texture coordinates for v0, v1 and v2.
    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);

        // Ray is parallel to triangle
        if det.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t <= EPSILON || !ray_t.surrounds(t) {
            return None;
        }

        let uv = match self.uvs {
            Some([uv0, uv1, uv2]) if self.material.has_texture() => {
                let w = 1.0 - u - v;
                Some(uv0 * w + uv1 * u + uv2 * v)
            }
            _ => None,
        };

        Some(Intersection::new(ray, t, self.normal, &self.material).with_uv(uv))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
