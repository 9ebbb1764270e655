//! Simple ray tracer example.
//!
//! Renders a checkered floor, a few spheres and a rotated cube, then saves
//! the frame as PNG.
//!
//! ```text
//! cargo run --example simple_render -- [config.json] [output.png]
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use prism_renderer::{
    render_buckets, Camera, Color, FilterMode, Light, Mat4, Material, Mesh, Plane, RenderConfig,
    Scene, Shader, Sphere, Texture, Vec2, Vec3, WrapMode,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading render config {path}"))?;
            RenderConfig::from_json(&json)?
        }
        None => RenderConfig {
            background: Color::new(0.5, 0.7, 1.0),
            ..RenderConfig::default()
        },
    };
    let output = args.next().unwrap_or_else(|| "output.png".to_string());

    let start = std::time::Instant::now();
    let mut scene = build_scene()?;
    scene.set_config(config);
    scene.build_acceleration();
    log::info!("Scene built in {:?}", start.elapsed());

    let snapshot = scene.snapshot();
    let image = render_buckets(&snapshot, |result| {
        log::debug!("bucket {} done", result.bucket.index);
    })?;

    image::save_buffer(
        &output,
        image.as_bytes(),
        image.width,
        image.height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("saving {output}"))?;
    log::info!("Saved to {}", output);

    Ok(())
}

/// 8x8 black and white checker.
fn checker_texture() -> Result<Texture> {
    let size = 8;
    let pixels = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            if (x + y) % 2 == 0 {
                [0.9, 0.9, 0.9, 1.0]
            } else {
                [0.1, 0.1, 0.1, 1.0]
            }
        })
        .collect();
    Ok(Texture::new(size, size, pixels, "<checker>")?.with_filter(FilterMode::Nearest))
}

fn cube(material: Arc<Material>) -> Result<Mesh> {
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
        [0, 3, 2], [0, 2, 1],
        [4, 5, 6], [4, 6, 7],
        [0, 1, 5], [0, 5, 4],
        [3, 7, 6], [3, 6, 2],
        [0, 4, 7], [0, 7, 3],
        [1, 2, 6], [1, 6, 5],
    ];
    Ok(Mesh::from_buffers(positions, indices, None, material)?)
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();

    let floor = Material::new(Color::splat(0.5))
        .with_texture(Arc::new(checker_texture()?))
        .with_uv(Vec2::splat(0.25), WrapMode::Repeat);
    scene.add_shape(Plane::ground(0.0, Arc::new(floor)));

    let red = Arc::new(Material::new(Color::new(0.8, 0.2, 0.1)).with_shininess(64.0));
    let mirror = Arc::new(
        Material::new(Color::splat(0.1))
            .with_reflectivity(0.8)
            .with_shininess(256.0),
    );
    let blue = Arc::new(Material::new(Color::new(0.1, 0.3, 0.8)));

    scene.add_shape(Sphere::new(Vec3::new(-2.2, 1.0, 0.0), 1.0, red));
    scene.add_shape(Sphere::new(Vec3::new(0.0, 1.0, -1.0), 1.0, mirror));

    let transform = Mat4::from_translation(Vec3::new(2.2, 0.75, 0.5))
        * Mat4::from_rotation_y(35f32.to_radians())
        * Mat4::from_scale(Vec3::splat(1.5));
    scene.add_shape(cube(blue)?.with_transform(transform)?);

    scene.add_light(Light::ambient(Color::ONE, 0.15));
    scene.add_light(Light::point(Vec3::new(-4.0, 6.0, 4.0), Color::ONE, 0.9));
    scene.add_light(Light::directional(Vec3::new(1.0, 2.0, 1.0), Color::splat(0.3)));

    scene.add_camera(
        Camera::new()
            .with_resolution(800, 450)
            .with_position(Vec3::new(0.0, 2.5, 8.0), Vec3::new(0.0, 0.8, 0.0), Vec3::Y)
            .with_fov(40.0),
    );

    scene.set_shader(Shader::builder().ambient().diffuse().specular().reflection().build());

    Ok(scene)
}
