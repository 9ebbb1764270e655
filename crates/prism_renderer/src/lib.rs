//! Prism Renderer - CPU ray tracing core.
//!
//! Casts one ray per pixel from a [`Camera`], finds the nearest surface in a
//! [`Scene`], and runs the hit through a [`Shader`] built from ambient,
//! diffuse, specular and reflection stages, with shadow rays towards each
//! light.
//!
//! Tracing always runs against a [`SceneSnapshot`], so a frame never observes
//! edits made to the scene while it renders.
//!
//! # Example
//!
//! ```ignore
//! use prism_renderer::*;
//!
//! let mut scene = Scene::new();
//! scene.add_shape(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, material));
//! scene.add_light(Light::point(Vec3::new(2.0, 4.0, 0.0), Color::ONE, 1.0));
//! scene.add_camera(Camera::new().with_resolution(640, 480));
//!
//! let image = render(&scene.snapshot())?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod light;
mod mesh;
mod plane;
mod renderer;
mod scene;
mod shader;
mod shape;
mod sphere;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{nearest_hit, Hittable, Intersection};
pub use light::Light;
pub use mesh::Mesh;
pub use plane::Plane;
pub use renderer::{render, render_buckets, to_rgb8, ConfigError, ImageBuffer, RenderConfig, Rgb8};
pub use scene::{any_hit, intersect_shapes, Scene, SceneError, SceneSnapshot};
pub use shader::{Shader, ShaderBuilder, Stage};
pub use shape::Shape;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math and scene data types the public API is written in
pub use prism_core::{Color, FilterMode, Material, MeshData, MeshError, Texture, TextureError, WrapMode};
pub use prism_math::{Aabb, Interval, Mat4, Ray, Vec2, Vec3, EPSILON};
