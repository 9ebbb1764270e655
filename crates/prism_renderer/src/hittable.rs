//! Hittable trait and Intersection record for ray-object intersection.

use prism_core::Material;
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Record of a ray-object intersection.
///
/// Built per query and consumed straight away by the shader; it borrows the
/// material from the shape that was hit.
#[derive(Debug, Clone)]
pub struct Intersection<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Ray parameter of the hit
    pub t: f32,
    pub material: &'a Material,
    /// Whether the ray hit the outward-facing side of the surface
    pub front_face: bool,
    /// Texture coordinates, when the surface provides them
    pub uv: Option<Vec2>,
}

impl<'a> Intersection<'a> {
    /// Build a record at `ray.at(t)` from the surface's outward normal.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            point: ray.at(t),
            normal,
            t,
            material,
            front_face,
            uv: None,
        }
    }

    pub fn with_uv(mut self, uv: Option<Vec2>) -> Self {
        self.uv = uv;
        self
    }
}

/// Trait for objects that can be hit by rays.
///
/// Implemented by the fixed set of surfaces in [`crate::Shape`]. A miss is a
/// normal outcome and returns `None`.
pub trait Hittable: Send + Sync {
    /// Nearest hit with `t` strictly inside `ray_t`.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// Nearest hit over a set of objects by linear scan.
///
/// The search interval shrinks to each hit found so far, so later objects
/// only report something closer.
pub fn nearest_hit<'a, T, I>(objects: I, ray: &Ray, ray_t: Interval) -> Option<Intersection<'a>>
where
    T: Hittable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut closest: Option<Intersection<'a>> = None;

    for object in objects {
        let interval = closest
            .as_ref()
            .map_or(ray_t, |hit| ray_t.with_max(hit.t));
        if let Some(hit) = object.intersect(ray, interval) {
            closest = Some(hit);
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal_front() {
        let mat = Material::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let hit = Intersection::new(&ray, 4.0, -Vec3::Z, &mat);

        assert!(hit.front_face);
        assert_eq!(hit.normal, -Vec3::Z);
        assert_eq!(hit.point, Vec3::new(0.0, 0.0, -1.0));
        assert!(hit.uv.is_none());
    }

    #[test]
    fn test_face_normal_back_is_flipped() {
        let mat = Material::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = Intersection::new(&ray, 1.0, Vec3::Z, &mat);

        assert!(!hit.front_face);
        assert_eq!(hit.normal, -Vec3::Z);
    }
}
