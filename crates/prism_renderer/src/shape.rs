//! The closed set of surfaces a scene can hold.

use crate::hittable::{Hittable, Intersection};
use crate::mesh::Mesh;
use crate::plane::Plane;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use prism_math::{Aabb, Interval, Ray};

/// Any shape the tracer knows how to intersect.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Mesh(Mesh),
}

impl Shape {
    /// Build a mesh's BVH now instead of on the first ray. No-op for other shapes.
    pub fn prepare(&self) {
        if let Shape::Mesh(mesh) = self {
            mesh.build_bvh();
        }
    }
}

impl Hittable for Shape {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        match self {
            Shape::Sphere(s) => s.intersect(ray, ray_t),
            Shape::Plane(p) => p.intersect(ray, ray_t),
            Shape::Triangle(t) => t.intersect(ray, ray_t),
            Shape::Mesh(m) => m.intersect(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::Plane(p) => p.bounding_box(),
            Shape::Triangle(t) => t.bounding_box(),
            Shape::Mesh(m) => m.bounding_box(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<Mesh> for Shape {
    fn from(mesh: Mesh) -> Self {
        Shape::Mesh(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::Material;
    use prism_math::Vec3;
    use std::sync::Arc;

    #[test]
    fn test_shape_dispatch() {
        let material = Arc::new(Material::default());
        let shapes: Vec<Shape> = vec![
            Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, material.clone()).into(),
            Plane::ground(-1.0, material.clone()).into(),
            Triangle::new(
                Vec3::new(-1.0, -1.0, -3.0),
                Vec3::new(1.0, -1.0, -3.0),
                Vec3::new(0.0, 1.0, -3.0),
                material,
            )
            .into(),
        ];

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let ts: Vec<Option<f32>> = shapes
            .iter()
            .map(|s| s.intersect(&ray, Interval::forward()).map(|h| h.t))
            .collect();

        assert!((ts[0].unwrap() - 4.0).abs() < 1e-5);
        assert!(ts[1].is_none());
        assert!((ts[2].unwrap() - 3.0).abs() < 1e-5);

        assert_eq!(shapes[1].bounding_box(), Aabb::UNIVERSE);
    }

    #[test]
    fn test_prepare_builds_mesh_bvh() {
        let mesh = Mesh::from_buffers(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
            None,
            Arc::new(Material::default()),
        )
        .unwrap();
        let shape = Shape::from(mesh);

        shape.prepare();
        if let Shape::Mesh(mesh) = &shape {
            assert!(mesh.is_bvh_built());
        }
    }
}
