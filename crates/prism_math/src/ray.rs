use crate::{Mat4, Mat4Ext, Vec3};

/// A ray in 3D space: `P(t) = origin + t * direction`.
///
/// Intersection code assumes `direction` is unit length so that `t` is a
/// Euclidean distance. Rays produced by [`Ray::transformed_by`] are the one
/// exception, see there.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` through `target`, with a unit direction.
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, (target - origin).normalize_or_zero())
    }

    /// Get the point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Move the ray into another space, e.g. world into a model's local space.
    ///
    /// The origin goes through the full (projective) transform, the direction
    /// only through the upper-left 3x3. The direction is not renormalized: for
    /// an affine `matrix`, a hit at parameter `t` on the returned ray is the
    /// same point as `t` on `self`, so local and world `t` values compare
    /// directly.
    pub fn transformed_by(&self, matrix: &Mat4) -> Ray {
        Ray::new(
            matrix.transform(self.origin),
            matrix.transform_direction(self.direction),
        )
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_towards_is_unit_length() {
        let ray = Ray::towards(Vec3::new(1.0, 1.0, 1.0), Vec3::new(4.0, 5.0, 1.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert!((ray.at(5.0) - Vec3::new(4.0, 5.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_transformed_by_translation() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Z);
        let moved = ray.transformed_by(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

        assert_eq!(moved.origin, Vec3::new(11.0, 2.0, 3.0));
        // Translation leaves directions alone
        assert_eq!(moved.direction, Vec3::Z);
    }

    #[test]
    fn test_transformed_by_scale_preserves_t() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let to_local = Mat4::from_scale(Vec3::splat(0.5));
        let local = ray.transformed_by(&to_local);

        // Direction is scaled, not renormalized
        assert!((local.direction.length() - 0.5).abs() < 1e-6);

        // The same t lands on corresponding points in both spaces
        for t in [0.0, 1.0, 4.0, 7.5] {
            let world_point = ray.at(t);
            let local_point = local.at(t);
            assert!((to_local.transform(world_point) - local_point).length() < 1e-5);
        }
    }
}
