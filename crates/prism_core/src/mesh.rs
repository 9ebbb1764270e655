//! Validated triangle mesh data.
//!
//! This is the hand-off type for asset importers: vertex positions, optional
//! per-vertex UVs and index triples. All indices are checked when the mesh is
//! created, so the tracer never sees a triangle pointing at a missing vertex.

use prism_math::{Aabb, Vec2, Vec3};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    #[error("Triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("Mesh has {vertex_count} vertices but {uv_count} UVs")]
    UvCountMismatch { vertex_count: usize, uv_count: usize },
}

/// Triangle geometry: positions, optional UVs and index triples.
#[derive(Clone, Debug)]
pub struct MeshData {
    positions: Vec<Vec3>,
    uvs: Option<Vec<Vec2>>,
    indices: Vec<[u32; 3]>,
    bounds: Aabb,
}

impl MeshData {
    /// Create a mesh from positions and triangle index triples.
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        Self::new_with_uvs(positions, indices, None)
    }

    /// Create a mesh with one UV per vertex.
    pub fn new_with_uvs(
        positions: Vec<Vec3>,
        indices: Vec<[u32; 3]>,
        uvs: Option<Vec<Vec2>>,
    ) -> Result<Self, MeshError> {
        let vertex_count = positions.len();

        if let Some(uvs) = &uvs {
            if uvs.len() != vertex_count {
                return Err(MeshError::UvCountMismatch {
                    vertex_count,
                    uv_count: uvs.len(),
                });
            }
        }

        for (triangle, face) in indices.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }

        let bounds = Self::compute_bounds(&positions);
        Ok(Self {
            positions,
            uvs,
            indices,
            bounds,
        })
    }

    /// Create a mesh from a flat index buffer (every 3 indices form a triangle).
    pub fn from_flat_indices(positions: Vec<Vec3>, indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }
        let triples = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Self::new(positions, triples)
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );

        Aabb::from_points(min, max)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Corner positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        self.indices[i].map(|idx| self.positions[idx as usize])
    }

    /// Corner UVs of triangle `i`, if the mesh carries UVs.
    pub fn triangle_uvs(&self, i: usize) -> Option<[Vec2; 3]> {
        let uvs = self.uvs.as_ref()?;
        Some(self.indices[i].map(|idx| uvs[idx as usize]))
    }
}
