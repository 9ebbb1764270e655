// Transform utilities for Mat4
//
// Extends glam::Mat4 with the point/direction/box transforms the tracer needs
// when moving rays between world and model space.

use crate::Aabb;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a point with an implicit w=1, dividing by the resulting w.
    ///
    /// Handles both affine and projective matrices.
    fn transform(&self, point: Vec3) -> Vec3;

    /// Apply only the upper-left 3x3 (rotation and scale, no translation).
    fn transform_direction(&self, direction: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform(&self, point: Vec3) -> Vec3 {
        self.project_point3(point)
    }

    fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.transform_vector3(direction)
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let (lo, hi) = (aabb.min(), aabb.max());

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let p = self.transform(corner);
            result_min = result_min.min(p);
            result_max = result_max.max(p);
        }

        Aabb::from_points(result_min, result_max)
    }
}
