//! Prism Core - scene data shared by the tracer and its importers.
//!
//! This crate provides:
//!
//! - **Materials**: [`Material`] with flat color, optional texture and UV wrapping
//! - **Textures**: [`Texture`] storage, nearest/bilinear sampling, image loading
//! - **Meshes**: [`MeshData`], validated vertex and index buffers
//!
//! # Example
//!
//! ```ignore
//! use prism_core::{Material, MeshData};
//!
//! let mesh = MeshData::from_flat_indices(positions, &indices)?;
//! let floor = Material::textured("textures/checker.png")?;
//! ```

pub mod material;
pub mod mesh;
pub mod texture;

// Re-export commonly used types
pub use material::{Color, Material, WrapMode};
pub use mesh::{MeshData, MeshError};
pub use texture::{FilterMode, Texture, TextureError, TextureResult};
