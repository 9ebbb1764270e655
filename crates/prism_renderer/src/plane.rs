//! Infinite plane primitive.

use std::sync::Arc;

use crate::hittable::{Hittable, Intersection};
use prism_core::Material;
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3, EPSILON};

/// An infinite plane through `position`.
///
/// `tangent` fixes the texture orientation: u runs along the tangent, v along
/// `normal x tangent`.
#[derive(Debug, Clone)]
pub struct Plane {
    position: Vec3,
    normal: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
    material: Arc<Material>,
}

impl Plane {
    /// Create a plane. The tangent is projected into the plane and
    /// normalized; if it is parallel to the normal any in-plane axis is used.
    pub fn new(position: Vec3, normal: Vec3, tangent: Vec3, material: Arc<Material>) -> Self {
        let normal = normal.normalize_or_zero();
        let tangent = (tangent - normal * normal.dot(tangent)).normalize_or_zero();
        let tangent = if tangent == Vec3::ZERO {
            normal.any_orthonormal_vector()
        } else {
            tangent
        };

        Self {
            position,
            normal,
            tangent,
            bitangent: normal.cross(tangent),
            material,
        }
    }

    /// Horizontal plane at height `y`, facing up, tangent along +X.
    pub fn ground(y: f32, material: Arc<Material>) -> Self {
        Self::new(Vec3::new(0.0, y, 0.0), Vec3::Y, Vec3::X, material)
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Planar texture coordinates of `point`, scaled and wrapped by the material.
    fn uv_at(&self, point: Vec3) -> Vec2 {
        let local = point - self.position;
        let uv = Vec2::new(local.dot(self.tangent), local.dot(self.bitangent)) * self.material.uv_scale;
        self.material.wrap.apply_uv(uv)
    }
}

impl Hittable for Plane {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        let denom = ray.direction.dot(self.normal);

        // Ray is parallel to the plane
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.position - ray.origin).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let hit = Intersection::new(ray, t, self.normal, &self.material);
        let uv = self.uv_at(hit.point);
        Some(hit.with_uv(Some(uv)))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::UNIVERSE
    }
}
