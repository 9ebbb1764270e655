//! Scene ownership and the read-only snapshot used for tracing.
//!
//! A [`Scene`] is the single owner of shapes, lights and cameras. Tracing never
//! touches it directly: [`Scene::snapshot`] hands out a [`SceneSnapshot`] that
//! shares the shape and light lists through `Arc`. Mutating the scene after
//! that clones the affected list, so a frame in flight keeps seeing the data it
//! started with.

use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Camera;
use crate::hittable::{nearest_hit, Hittable, Intersection};
use crate::light::Light;
use crate::renderer::{to_rgb8, RenderConfig, Rgb8};
use crate::shader::Shader;
use crate::shape::Shape;
use prism_core::Color;
use prism_math::{Interval, Ray};

/// Errors from scene setup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("camera index {index} out of range ({count} cameras)")]
    CameraOutOfRange { index: usize, count: usize },

    #[error("scene has no active camera")]
    NoActiveCamera,

    #[error("transform is not invertible")]
    SingularTransform,

    #[error("transform is projective; only affine transforms are supported")]
    ProjectiveTransform,
}

/// Nearest hit over `shapes` with `t` inside `ray_t`.
pub fn intersect_shapes<'a>(shapes: &'a [Shape], ray: &Ray, ray_t: Interval) -> Option<Intersection<'a>> {
    nearest_hit(shapes, ray, ray_t)
}

/// True if any shape is hit with `t` inside `ray_t`. Stops at the first hit.
pub fn any_hit(shapes: &[Shape], ray: &Ray, ray_t: Interval) -> bool {
    shapes.iter().any(|shape| shape.intersect(ray, ray_t).is_some())
}

/// The mutable scene. Owns every shape, light and camera.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Arc<Vec<Shape>>,
    lights: Arc<Vec<Light>>,
    cameras: Vec<Camera>,
    active_camera: Option<usize>,
    shader: Arc<Shader>,
    config: RenderConfig,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape and return its index.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> usize {
        let shapes = Arc::make_mut(&mut self.shapes);
        shapes.push(shape.into());
        shapes.len() - 1
    }

    /// Remove the shape at `index`, shifting later shapes down.
    pub fn remove_shape(&mut self, index: usize) -> Option<Shape> {
        if index >= self.shapes.len() {
            return None;
        }
        Some(Arc::make_mut(&mut self.shapes).remove(index))
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        let lights = Arc::make_mut(&mut self.lights);
        lights.push(light);
        lights.len() - 1
    }

    pub fn remove_light(&mut self, index: usize) -> Option<Light> {
        if index >= self.lights.len() {
            return None;
        }
        Some(Arc::make_mut(&mut self.lights).remove(index))
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Edit lights between frames. Snapshots already taken are unaffected.
    pub fn lights_mut(&mut self) -> &mut Vec<Light> {
        Arc::make_mut(&mut self.lights)
    }

    /// Add a camera and return its index. The first camera becomes active.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        let index = self.cameras.len() - 1;
        if self.active_camera.is_none() {
            self.active_camera = Some(index);
        }
        index
    }

    pub fn set_active_camera(&mut self, index: usize) -> Result<(), SceneError> {
        if index >= self.cameras.len() {
            return Err(SceneError::CameraOutOfRange {
                index,
                count: self.cameras.len(),
            });
        }
        self.active_camera = Some(index);
        Ok(())
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera.and_then(|i| self.cameras.get(i))
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn set_shader(&mut self, shader: Shader) {
        self.shader = Arc::new(shader);
    }

    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Nearest hit in `[EPSILON, inf)`.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        intersect_shapes(&self.shapes, ray, Interval::forward())
    }

    /// Nearest hit with `t < max_t`.
    pub fn intersect_within(&self, ray: &Ray, max_t: f32) -> Option<Intersection<'_>> {
        intersect_shapes(&self.shapes, ray, Interval::forward().with_max(max_t))
    }

    /// Whether anything blocks `ray` before `distance`.
    pub fn occluded(&self, ray: &Ray, distance: f32) -> bool {
        any_hit(&self.shapes, ray, Interval::forward().with_max(distance))
    }

    /// Shade the nearest hit, or return the background.
    ///
    /// Takes a camera-less view of the scene on every call. Per-pixel callers
    /// should take one [`Scene::snapshot`] and use [`SceneSnapshot::trace_ray`].
    pub fn trace_ray(&self, ray: &Ray) -> Rgb8 {
        self.view(None).trace_ray(ray)
    }

    /// Build every mesh BVH up front, in parallel.
    pub fn build_acceleration(&self) {
        self.shapes.par_iter().for_each(Shape::prepare);
    }

    /// Immutable view for one trace.
    pub fn snapshot(&self) -> SceneSnapshot {
        self.view(self.active_camera().cloned())
    }

    fn view(&self, camera: Option<Camera>) -> SceneSnapshot {
        SceneSnapshot {
            shapes: Arc::clone(&self.shapes),
            lights: Arc::clone(&self.lights),
            shader: Arc::clone(&self.shader),
            camera,
            config: self.config,
        }
    }
}

/// Read-only scene state shared by every worker of a trace.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    shapes: Arc<Vec<Shape>>,
    lights: Arc<Vec<Light>>,
    shader: Arc<Shader>,
    camera: Option<Camera>,
    config: RenderConfig,
}

impl SceneSnapshot {
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The camera that was active when the snapshot was taken.
    pub fn camera(&self) -> Result<&Camera, SceneError> {
        self.camera.as_ref().ok_or(SceneError::NoActiveCamera)
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        intersect_shapes(&self.shapes, ray, Interval::forward())
    }

    pub fn intersect_within(&self, ray: &Ray, max_t: f32) -> Option<Intersection<'_>> {
        intersect_shapes(&self.shapes, ray, Interval::forward().with_max(max_t))
    }

    pub fn occluded(&self, ray: &Ray, distance: f32) -> bool {
        any_hit(&self.shapes, ray, Interval::forward().with_max(distance))
    }

    /// Linear color seen along `ray`, `depth` bounces deep.
    pub fn trace_linear(&self, ray: &Ray, depth: u32) -> Color {
        match self.intersect(ray) {
            Some(hit) => self.shader.shade_linear(&hit, ray, self, depth),
            None => self.config.background,
        }
    }

    pub fn trace_ray(&self, ray: &Ray) -> Rgb8 {
        to_rgb8(self.trace_linear(ray, 0))
    }
}
