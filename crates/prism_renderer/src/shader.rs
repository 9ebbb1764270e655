//! Shading pipeline.
//!
//! A [`Shader`] is an ordered list of stages. Each stage looks at the same hit
//! record and adds its own term; the stages never see each other's output.
//! The pipeline is fixed once [`ShaderBuilder::build`] returns.

use crate::hittable::Intersection;
use crate::light::Light;
use crate::renderer::{to_rgb8, Rgb8};
use crate::scene::SceneSnapshot;
use prism_core::Color;
use prism_math::{reflect, Ray, Vec3, EPSILON};

/// One additive term of the final color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Flat fill from ambient lights.
    Ambient,
    /// Lambertian term from point and directional lights.
    Diffuse,
    /// Phong highlight.
    Specular,
    /// Mirror bounce for reflective materials, bounded by `max_depth`.
    Reflection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    stages: Box<[Stage]>,
}

impl Default for Shader {
    /// Ambient, diffuse and specular.
    fn default() -> Self {
        ShaderBuilder::new().ambient().diffuse().specular().build()
    }
}

impl Shader {
    pub fn builder() -> ShaderBuilder {
        ShaderBuilder::new()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Sum of all stage contributions, unclamped.
    pub fn shade_linear(
        &self,
        hit: &Intersection<'_>,
        ray: &Ray,
        scene: &SceneSnapshot,
        depth: u32,
    ) -> Color {
        // Shadow rays are cast once per light and shared by diffuse and specular
        let lit = if self.uses_direct_lights() {
            visible_lights(hit, scene)
        } else {
            Vec::new()
        };

        self.stages
            .iter()
            .map(|stage| match stage {
                Stage::Ambient => ambient(hit, scene.lights()),
                Stage::Diffuse => diffuse(hit, &lit),
                Stage::Specular => specular(hit, ray, &lit),
                Stage::Reflection => reflection(hit, ray, scene, depth),
            })
            .sum()
    }

    fn uses_direct_lights(&self) -> bool {
        self.stages
            .iter()
            .any(|stage| matches!(stage, Stage::Diffuse | Stage::Specular))
    }

    pub fn shade(&self, hit: &Intersection<'_>, ray: &Ray, scene: &SceneSnapshot, depth: u32) -> Rgb8 {
        to_rgb8(self.shade_linear(hit, ray, scene, depth))
    }
}

/// Fluent construction of a [`Shader`].
#[derive(Debug, Clone, Default)]
pub struct ShaderBuilder {
    stages: Vec<Stage>,
}

impl ShaderBuilder {
    /// An empty pipeline. Shades everything black until stages are added.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ambient(self) -> Self {
        self.stage(Stage::Ambient)
    }

    pub fn diffuse(self) -> Self {
        self.stage(Stage::Diffuse)
    }

    pub fn specular(self) -> Self {
        self.stage(Stage::Specular)
    }

    pub fn reflection(self) -> Self {
        self.stage(Stage::Reflection)
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> Shader {
        Shader {
            stages: self.stages.into_boxed_slice(),
        }
    }
}

/// Hit point pushed off the surface so secondary rays don't hit it again.
fn offset_point(hit: &Intersection<'_>) -> Vec3 {
    hit.point + hit.normal * EPSILON
}

/// A point or directional light that reaches the hit.
#[derive(Debug, Clone, Copy)]
struct LitBy<'a> {
    light: &'a Light,
    /// Unit direction towards the light
    dir: Vec3,
    n_dot_l: f32,
}

/// Direction to `light` if it faces the surface and nothing blocks it.
fn visible_light<'a>(hit: &Intersection<'_>, light: &'a Light, scene: &SceneSnapshot) -> Option<LitBy<'a>> {
    let (dir, distance) = light.direction_from(hit.point)?;

    let n_dot_l = hit.normal.dot(dir);
    if n_dot_l <= 0.0 {
        return None;
    }

    if light.casts_shadows() {
        let shadow_ray = Ray::new(offset_point(hit), dir);
        if scene.occluded(&shadow_ray, distance) {
            return None;
        }
    }

    Some(LitBy { light, dir, n_dot_l })
}

/// Every non-ambient light reaching the hit, in scene order.
fn visible_lights<'a>(hit: &Intersection<'_>, scene: &'a SceneSnapshot) -> Vec<LitBy<'a>> {
    scene
        .lights()
        .iter()
        .filter(|light| !light.is_ambient())
        .filter_map(|light| visible_light(hit, light, scene))
        .collect()
}

fn ambient(hit: &Intersection<'_>, lights: &[Light]) -> Color {
    lights
        .iter()
        .filter(|light| light.is_ambient())
        .map(|light| hit.material.color * light.intensity())
        .sum()
}

fn diffuse(hit: &Intersection<'_>, lit: &[LitBy<'_>]) -> Color {
    let surface = hit.material.surface_color(hit.uv);

    lit.iter()
        .map(|l| l.light.intensity() * surface * l.n_dot_l)
        .sum()
}

fn specular(hit: &Intersection<'_>, ray: &Ray, lit: &[LitBy<'_>]) -> Color {
    let view = -ray.direction.normalize_or_zero();
    let shininess = hit.material.shininess;

    lit.iter()
        .map(|l| {
            let reflected = reflect(-l.dir, hit.normal);
            let highlight = view.dot(reflected).max(0.0).powf(shininess);
            l.light.intensity() * highlight
        })
        .sum()
}

fn reflection(hit: &Intersection<'_>, ray: &Ray, scene: &SceneSnapshot, depth: u32) -> Color {
    let reflectivity = hit.material.reflectivity;
    if reflectivity <= 0.0 || depth >= scene.config().max_depth {
        return Color::ZERO;
    }

    let bounce = Ray::new(offset_point(hit), reflect(ray.direction, hit.normal));
    scene.trace_linear(&bounce, depth + 1) * reflectivity
}
