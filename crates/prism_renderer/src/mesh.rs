//! Triangle mesh shape with a lazily built BVH and a model transform.
//!
//! The triangles live in the mesh's local space. Rays are moved into that
//! space with the inverse model matrix, traced against the BVH, and the hit is
//! mapped back. Because [`Ray::transformed_by`] keeps the direction
//! unnormalized, the local `t` is also the world `t`.

use std::sync::{Arc, OnceLock};

use crate::bvh::BvhNode;
use crate::hittable::{Hittable, Intersection};
use crate::scene::SceneError;
use crate::triangle::Triangle;
use prism_core::{Material, MeshData, MeshError};
use prism_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec2, Vec3, Vec4};

/// A triangle mesh treated as one shape by the scene.
///
/// Cloning is cheap: triangles and the BVH are shared.
#[derive(Debug, Clone)]
pub struct Mesh {
    triangles: Arc<[Triangle]>,
    material: Arc<Material>,
    /// Local-to-world transform
    transform: Mat4,
    /// World-to-local transform (for ray transformation)
    inv_transform: Mat4,
    local_bbox: Aabb,
    world_bbox: Aabb,
    /// Built on first use, or eagerly via [`Mesh::build_bvh`]
    bvh: Arc<OnceLock<BvhNode>>,
}

impl Mesh {
    /// Create a mesh from validated geometry.
    pub fn new(data: &MeshData, material: Arc<Material>) -> Self {
        let triangles: Arc<[Triangle]> = (0..data.triangle_count())
            .map(|i| {
                let [v0, v1, v2] = data.triangle(i);
                let tri = Triangle::new(v0, v1, v2, material.clone());
                match data.triangle_uvs(i) {
                    Some(uvs) => tri.with_uvs(uvs),
                    None => tri,
                }
            })
            .collect();

        let local_bbox = data.bounds();

        Self {
            triangles,
            material,
            transform: Mat4::IDENTITY,
            inv_transform: Mat4::IDENTITY,
            local_bbox,
            world_bbox: local_bbox,
            bvh: Arc::new(OnceLock::new()),
        }
    }

    /// Build straight from vertex and index buffers.
    ///
    /// Fails if an index refers to a vertex that does not exist.
    pub fn from_buffers(
        positions: Vec<Vec3>,
        indices: Vec<[u32; 3]>,
        uvs: Option<Vec<Vec2>>,
        material: Arc<Material>,
    ) -> Result<Self, MeshError> {
        let data = MeshData::new_with_uvs(positions, indices, uvs)?;
        Ok(Self::new(&data, material))
    }

    /// Place the mesh in the world. The matrix must be affine and invertible.
    pub fn with_transform(mut self, transform: Mat4) -> Result<Self, SceneError> {
        // Bottom row must be [0, 0, 0, 1] for local `t` to equal world `t`
        if transform.row(3) != Vec4::W {
            return Err(SceneError::ProjectiveTransform);
        }
        let det = transform.determinant();
        if det.abs() < f32::EPSILON || !det.is_finite() {
            return Err(SceneError::SingularTransform);
        }

        self.transform = transform;
        self.inv_transform = transform.inverse();
        self.world_bbox = if self.triangles.is_empty() {
            Aabb::EMPTY
        } else {
            transform.transform_aabb(&self.local_bbox)
        };
        Ok(self)
    }

    /// The BVH, building it on first call.
    ///
    /// Safe to call from many threads at once; exactly one build runs.
    pub fn build_bvh(&self) -> &BvhNode {
        self.bvh.get_or_init(|| BvhNode::build(&self.triangles))
    }

    pub fn is_bvh_built(&self) -> bool {
        self.bvh.get().is_some()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}

impl Hittable for Mesh {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        // Early reject via world bbox intersection test
        if !self.world_bbox.intersects(ray, ray_t) {
            return None;
        }

        if self.transform == Mat4::IDENTITY {
            return self.build_bvh().intersect(&self.triangles, ray, ray_t);
        }

        let local_ray = ray.transformed_by(&self.inv_transform);
        let mut hit = self.build_bvh().intersect(&self.triangles, &local_ray, ray_t)?;

        // Normals transform by the inverse transpose; n.d keeps its sign, so
        // the normal still faces the world ray.
        hit.point = ray.at(hit.t);
        hit.normal = self
            .inv_transform
            .transpose()
            .transform_direction(hit.normal)
            .normalize_or_zero();
        Some(hit)
    }

    fn bounding_box(&self) -> Aabb {
        self.world_bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::nearest_hit;
    use prism_core::Texture;

    /// Unit cube centred at the origin, 12 triangles, outward winding.
    fn cube(material: Arc<Material>) -> Mesh {
        let positions = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];
        let indices = vec![
            [0, 3, 2], [0, 2, 1], // -Z
            [4, 5, 6], [4, 6, 7], // +Z
            [0, 1, 5], [0, 5, 4], // -Y
            [3, 7, 6], [3, 6, 2], // +Y
            [0, 4, 7], [0, 7, 3], // -X
            [1, 2, 6], [1, 6, 5], // +X
        ];
        Mesh::from_buffers(positions, indices, None, material).unwrap()
    }

    #[test]
    fn test_mesh_bad_index_fails() {
        let err = Mesh::from_buffers(
            vec![Vec3::ZERO, Vec3::X],
            vec![[0, 1, 2]],
            None,
            Arc::new(Material::default()),
        )
        .unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 2, .. }));
    }

    #[test]
    fn test_mesh_hit_front_face() {
        let mesh = cube(Arc::new(Material::default()));
        let ray = Ray::new(Vec3::new(0.1, 0.2, -5.0), Vec3::Z);
        let hit = mesh.intersect(&ray, Interval::forward()).unwrap();

        assert!((hit.t - 4.5).abs() < 1e-5);
        assert!(hit.front_face);
        assert!((hit.normal + Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_mesh_bvh_is_lazy_and_memoized() {
        let mesh = cube(Arc::new(Material::default()));
        assert!(!mesh.is_bvh_built());

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        mesh.intersect(&ray, Interval::forward());
        assert!(mesh.is_bvh_built());

        let first = mesh.build_bvh() as *const BvhNode;
        let second = mesh.build_bvh() as *const BvhNode;
        assert_eq!(first, second);

        // Clones share the built tree
        let clone = mesh.clone();
        assert_eq!(clone.build_bvh() as *const BvhNode, first);
    }

    #[test]
    fn test_mesh_concurrent_first_use() {
        let mesh = cube(Arc::new(Material::default()));
        let ray = Ray::new(Vec3::new(0.1, 0.2, -5.0), Vec3::Z);

        let results: Vec<f32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| mesh.intersect(&ray, Interval::forward()).map(|h| h.t)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });

        assert!(results.iter().all(|&t| (t - 4.5).abs() < 1e-5));
        assert_eq!(mesh.build_bvh().leaf_count(), 12);
    }

    #[test]
    fn test_mesh_matches_linear_scan() {
        let mesh = cube(Arc::new(Material::default()));
        let rays = [
            Ray::towards(Vec3::new(3.0, 2.0, -4.0), Vec3::ZERO),
            Ray::towards(Vec3::new(-3.0, 0.1, 0.2), Vec3::new(0.0, 0.3, 0.0)),
            Ray::towards(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.2, 0.0, -0.1)),
            Ray::new(Vec3::new(0.0, 0.1, -0.2), Vec3::X),
        ];

        for ray in rays {
            let expected = nearest_hit(mesh.triangles(), &ray, Interval::forward()).unwrap();
            let actual = mesh.intersect(&ray, Interval::forward()).unwrap();
            assert!((expected.t - actual.t).abs() < 1e-5);
        }
    }

    #[test]
    fn test_mesh_transform_translation() {
        let mesh = cube(Arc::new(Material::default()))
            .with_transform(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();

        let ray = Ray::new(Vec3::new(10.1, 0.2, -5.0), Vec3::Z);
        let hit = mesh.intersect(&ray, Interval::forward()).unwrap();
        assert!((hit.t - 4.5).abs() < 1e-5);
        assert!((hit.point - Vec3::new(10.1, 0.2, -0.5)).length() < 1e-5);

        // The untransformed position is now empty
        let ray = Ray::new(Vec3::new(0.1, 0.2, -5.0), Vec3::Z);
        assert!(mesh.intersect(&ray, Interval::forward()).is_none());
    }

    #[test]
    fn test_mesh_transform_scale_keeps_world_t() {
        let mesh = cube(Arc::new(Material::default()))
            .with_transform(Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0)))
            .unwrap();

        let ray = Ray::new(Vec3::new(-5.0, 0.1, 0.3), Vec3::X);
        let hit = mesh.intersect(&ray, Interval::forward()).unwrap();

        // Face now at x = -2
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(-2.0, 0.1, 0.3)).length() < 1e-5);
        assert!((hit.normal + Vec3::X).length() < 1e-5);
        assert!((hit.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mesh_singular_transform_rejected() {
        let result = cube(Arc::new(Material::default()))
            .with_transform(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
        assert!(matches!(result, Err(SceneError::SingularTransform)));
    }

    #[test]
    fn test_mesh_projective_transform_rejected() {
        let mut projective = Mat4::IDENTITY;
        projective.z_axis.w = 0.1;
        assert!(projective.determinant().abs() > 0.5);

        let result = cube(Arc::new(Material::default()))
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)) * projective);
        assert!(matches!(result, Err(SceneError::ProjectiveTransform)));
    }

    #[test]
    fn test_mesh_flat_quad_from_far_away() {
        let quad = Mesh::from_buffers(
            vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            None,
            Arc::new(Material::default()),
        )
        .unwrap()
        .with_transform(Mat4::from_scale(Vec3::new(20000.0, 20000.0, 1.0)))
        .unwrap();

        let ray = Ray::new(Vec3::new(100.0, 200.0, -50000.0), Vec3::Z);
        let local_ray = ray.transformed_by(&quad.inv_transform);
        let expected = nearest_hit(quad.triangles(), &local_ray, Interval::forward()).map(|h| h.t);
        let actual = quad.intersect(&ray, Interval::forward()).map(|h| h.t);

        assert!((expected.unwrap() - 50000.0).abs() < 1.0);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_mesh_uvs_flow_through() {
        let material = Arc::new(
            Material::default().with_texture(Arc::new(Texture::solid_color(Vec3::ONE))),
        );
        let mesh = Mesh::from_buffers(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
            Some(vec![Vec2::ZERO, Vec2::X, Vec2::Y]),
            material,
        )
        .unwrap();

        let ray = Ray::new(Vec3::new(0.25, 0.5, -1.0), Vec3::Z);
        let uv = mesh.intersect(&ray, Interval::forward()).unwrap().uv.unwrap();
        assert!((uv - Vec2::new(0.25, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_empty_mesh_never_hits() {
        let mesh = Mesh::from_buffers(vec![], vec![], None, Arc::new(Material::default())).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(mesh.intersect(&ray, Interval::forward()).is_none());
        assert!(matches!(mesh.build_bvh(), BvhNode::Empty));
    }
}
