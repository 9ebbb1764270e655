use crate::{Interval, Ray, Vec3, EPSILON};

/// `1 + 2 * gamma(3)`: relative error bound on a slab distance, where
/// `gamma(n) = n * eps / (1 - n * eps)`.
const SLAB_ROUNDING: f32 = 1.0 + 2.0 * (3.0 * f32::EPSILON) / (1.0 - 3.0 * f32::EPSILON);

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Boxes are computed once when a BVH is built and never mutated afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    ///
    /// Axes thinner than `EPSILON` are padded so axis-aligned triangles still
    /// produce a box a ray can enter.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Test if a ray intersects this AABB within `ray_t`.
    ///
    /// Slab method. A zero direction component produces an infinite inverse,
    /// which leaves that axis unbounded as intended.
    ///
    /// The far slab distance is widened by the worst-case rounding of
    /// `(slab - origin) * inv_d`. Far from the origin a thin slab otherwise
    /// collapses to `t0 == t1` and the box is missed.
    pub fn intersects(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / ray.direction[axis];
            let origin = ray.origin[axis];

            let mut t0 = (slab.min - origin) * inv_d;
            let mut t1 = (slab.max - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t1 *= SLAB_ROUNDING;

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        for axis in [&mut self.x, &mut self.y, &mut self.z] {
            if axis.size() < EPSILON {
                *axis = axis.expand(EPSILON);
            }
        }
    }

    /// Index (0=X, 1=Y, 2=Z) of the axis with the greatest extent.
    ///
    /// Ties go to the earlier axis.
    pub fn largest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size >= y_size && x_size >= z_size {
            0
        } else if y_size >= z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));

        assert_eq!(aabb.min(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(aabb.max(), Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_aabb_pads_flat_axis() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert!(aabb.z.size() > 0.0);
        assert!(aabb.z.min < 0.0 && aabb.z.max > 0.0);
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, -2.0, 3.0), Vec3::new(10.0, 4.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min(), Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(surrounding.max(), Vec3::new(10.0, 5.0, 10.0));
    }

    #[test]
    fn test_aabb_intersects_axis_ray() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(unit_box().intersects(&ray, Interval::forward()));

        let ray = Ray::new(Vec3::new(-5.0, 5.0, 0.0), Vec3::X);
        assert!(!unit_box().intersects(&ray, Interval::forward()));
    }

    #[test]
    fn test_aabb_ray_pointing_away() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!unit_box().intersects(&ray, Interval::forward()));
    }

    #[test]
    fn test_aabb_respects_interval() {
        // Box is entered at t=4; an interval ending at 3 misses it
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(!unit_box().intersects(&ray, Interval::new(0.0, 3.0)));
        assert!(unit_box().intersects(&ray, Interval::new(0.0, 4.5)));
    }

    #[test]
    fn test_aabb_negative_direction() {
        let ray = Ray::new(Vec3::new(5.0, 0.5, 0.5), -Vec3::X);
        assert!(unit_box().intersects(&ray, Interval::forward()));
    }

    #[test]
    fn test_aabb_origin_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0).normalize());
        assert!(unit_box().intersects(&ray, Interval::forward()));
    }

    #[test]
    fn test_aabb_flat_box_seen_from_far_away() {
        // y is padded to +-EPSILON, below the f32 spacing at these heights
        let flat = Aabb::from_points(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));

        for height in [10.0, 1000.0, 2000.0, 5000.0, 1.0e6] {
            let down = Ray::new(Vec3::new(0.1, height, 0.2), -Vec3::Y);
            assert!(flat.intersects(&down, Interval::forward()), "height {height}");

            let up = Ray::new(Vec3::new(0.1, -height, 0.2), Vec3::Y);
            assert!(flat.intersects(&up, Interval::forward()), "height {height}");
        }

        let beside = Ray::new(Vec3::new(3.0, 5000.0, 0.2), -Vec3::Y);
        assert!(!flat.intersects(&beside, Interval::forward()));
    }

    #[test]
    fn test_aabb_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(aabb.centroid(), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_aabb_largest_axis() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).largest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).largest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).largest_axis(), 2);
    }

    #[test]
    fn test_aabb_largest_axis_ties_prefer_earlier() {
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::splat(2.0)).largest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 3.0, 3.0)).largest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(3.0, 1.0, 3.0)).largest_axis(), 0);
    }

    #[test]
    fn test_aabb_empty_is_identity_for_surrounding() {
        let b = unit_box();
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &b), b);
    }
}
