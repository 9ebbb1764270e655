//! Frame rendering.
//!
//! Traces one primary ray per pixel through a [`SceneSnapshot`] and writes
//! 8-bit color into an [`ImageBuffer`]. Rows are independent, so with
//! `parallel` on each rayon worker owns whole rows of the output.

use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
use crate::camera::Camera;
use crate::scene::{SceneError, SceneSnapshot};
use prism_core::Color;

/// Errors from loading a [`RenderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid render config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Maximum reflection bounce depth
    pub max_depth: u32,
    /// Bucket edge length in pixels for bucketed rendering
    pub bucket_size: u32,
    /// Trace rows on the rayon pool instead of the calling thread
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::ZERO,
            max_depth: 4,
            bucket_size: 64,
            parallel: true,
        }
    }
}

impl RenderConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An 8-bit RGB pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Convert a linear color to 8-bit, truncating each `c * 255` and clamping to
/// `[0, 255]`. No gamma is applied.
pub fn to_rgb8(color: Color) -> Rgb8 {
    // `as u8` saturates and maps NaN to 0
    let channel = |c: f32| (c * 255.0) as u8;
    Rgb8::new(channel(color.x), channel(color.y), channel(color.z))
}

/// Render output, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb8::BLACK; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Set the pixel at (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgb8) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.pixels[index] = color;
        }
    }

    /// Tightly packed RGB bytes, for texture upload or saving.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let row_len = bucket.width as usize;
        if row_len == 0 || bucket.x >= self.width {
            return;
        }

        for (local_y, row) in result.pixels.chunks_exact(row_len).enumerate() {
            let y = bucket.y + local_y as u32;
            if y >= self.height {
                break;
            }
            let start = self.index(bucket.x, y);
            let len = row_len.min((self.width - bucket.x) as usize);
            self.pixels[start..start + len].copy_from_slice(&row[..len]);
        }
    }
}

fn render_row(snapshot: &SceneSnapshot, camera: &Camera, y: u32, row: &mut [Rgb8]) {
    for (x, pixel) in row.iter_mut().enumerate() {
        let ray = camera.ray_for_pixel(x as u32, y);
        *pixel = snapshot.trace_ray(&ray);
    }
}

/// Render the snapshot's active camera.
pub fn render(snapshot: &SceneSnapshot) -> Result<ImageBuffer, SceneError> {
    let camera = snapshot.camera()?;
    let (width, height) = (camera.width(), camera.height());
    let mut image = ImageBuffer::new(width, height);
    if image.pixels.is_empty() {
        return Ok(image);
    }

    let start = Instant::now();
    let row_len = width as usize;

    if snapshot.config().parallel {
        image
            .pixels
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| render_row(snapshot, camera, y as u32, row));
    } else {
        image
            .pixels
            .chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| render_row(snapshot, camera, y as u32, row));
    }

    log::info!(
        "Rendered {}x{} frame ({} shapes, {} lights) in {:.2?}",
        width,
        height,
        snapshot.shapes().len(),
        snapshot.lights().len(),
        start.elapsed()
    );

    Ok(image)
}

/// Render bucket by bucket, centre first.
///
/// Produces the same image as [`render`]. `on_bucket` sees each bucket as it
/// completes, in completion order.
pub fn render_buckets<F>(snapshot: &SceneSnapshot, on_bucket: F) -> Result<ImageBuffer, SceneError>
where
    F: Fn(&BucketResult) + Sync,
{
    let camera = snapshot.camera()?;
    let (width, height) = (camera.width(), camera.height());
    let buckets = generate_buckets(width, height, snapshot.config().bucket_size);
    let start = Instant::now();

    let trace = |bucket: &Bucket| -> Result<BucketResult, SceneError> {
        let result = render_bucket(bucket, snapshot)?;
        on_bucket(&result);
        Ok(result)
    };
    let results: Vec<BucketResult> = if snapshot.config().parallel {
        buckets.par_iter().map(trace).collect::<Result<_, _>>()?
    } else {
        buckets.iter().map(trace).collect::<Result<_, _>>()?
    };

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!(
        "Rendered {}x{} frame in {} buckets in {:.2?}",
        width,
        height,
        results.len(),
        start.elapsed()
    );

    Ok(image)
}
