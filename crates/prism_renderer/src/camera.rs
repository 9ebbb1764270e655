//! Pinhole camera for primary ray generation.

use prism_math::{Ray, Vec3};

/// Image plane basis, derived from the camera settings.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewport {
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    width: f32,
    height: f32,
}

/// Camera for generating rays into the scene.
///
/// Built fluently; every `with_*` call keeps the cached basis current.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // Image settings
    image_width: u32,
    image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    viewport: Viewport,
}

impl Camera {
    /// 800x450 at the origin looking down -Z, 90 degree field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            viewport: Viewport {
                forward: -Vec3::Z,
                right: Vec3::X,
                up: Vec3::Y,
                width: 0.0,
                height: 0.0,
            },
        };
        camera.update();
        camera
    }

    /// Set image resolution. Zero dimensions are raised to one pixel.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self.update();
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.update();
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov.clamp(0.01, 179.0);
        self.update();
        self
    }

    pub fn width(&self) -> u32 {
        self.image_width
    }

    pub fn height(&self) -> u32 {
        self.image_height
    }

    pub fn position(&self) -> Vec3 {
        self.look_from
    }

    pub fn forward(&self) -> Vec3 {
        self.viewport.forward
    }

    pub fn fov(&self) -> f32 {
        self.vfov
    }

    fn update(&mut self) {
        let mut forward = (self.look_at - self.look_from).normalize_or_zero();
        if forward == Vec3::ZERO {
            log::warn!("Camera look_at equals look_from, facing -Z");
            forward = -Vec3::Z;
        }

        let mut right = forward.cross(self.vup).normalize_or_zero();
        if right == Vec3::ZERO {
            log::warn!("Camera up vector is parallel to the view direction");
            right = forward.any_orthonormal_vector();
        }
        let up = right.cross(forward);

        // Image plane sits at distance 1
        let height = 2.0 * (self.vfov.to_radians() / 2.0).tan();
        let width = height * (self.image_width as f32 / self.image_height as f32);

        self.viewport = Viewport {
            forward,
            right,
            up,
            width,
            height,
        };
    }

    /// Ray through the centre of pixel `(i, j)`. Row 0 is the top of the image.
    pub fn ray_for_pixel(&self, i: u32, j: u32) -> Ray {
        let vp = &self.viewport;
        let sx = (i as f32 + 0.5) / self.image_width as f32;
        let sy = (j as f32 + 0.5) / self.image_height as f32;

        let direction =
            vp.forward + vp.right * ((sx - 0.5) * vp.width) + vp.up * ((0.5 - sy) * vp.height);

        Ray::new(self.look_from, direction.normalize_or_zero())
    }

    /// One ray per pixel in row-major order. Each call starts again at (0, 0).
    pub fn generate_rays(&self) -> impl Iterator<Item = Ray> + '_ {
        (0..self.image_height)
            .flat_map(move |j| (0..self.image_width).map(move |i| self.ray_for_pixel(i, j)))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
