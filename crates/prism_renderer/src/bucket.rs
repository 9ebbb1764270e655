//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be traced independently
//! and in parallel, centre outwards.

use crate::renderer::Rgb8;
use crate::scene::{SceneError, SceneSnapshot};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Edge buckets are cropped to the image. A `bucket_size` of zero is treated
/// as one.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for y in (0..height).step_by(size as usize) {
        for x in (0..width).step_by(size as usize) {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
        }
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image center. Ties keep grid order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Rgb8>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Rgb8>) -> Self {
        Self { bucket, pixels }
    }
}

/// Trace every pixel of `bucket` with the snapshot's camera.
pub fn render_bucket(bucket: &Bucket, snapshot: &SceneSnapshot) -> Result<BucketResult, SceneError> {
    let camera = snapshot.camera()?;
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let ray = camera.ray_for_pixel(bucket.x + local_x, bucket.y + local_y);
            pixels.push(snapshot.trace_ray(&ray));
        }
    }

    Ok(BucketResult::new(*bucket, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{to_rgb8, ImageBuffer, RenderConfig};
    use crate::{Camera, Scene};
    use prism_core::Color;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!((first.x, first.y), (64, 64));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(generate_buckets(0, 10, 4).is_empty());
        assert_eq!(generate_buckets(3, 2, 0).len(), 6);
    }

    #[test]
    fn test_render_bucket_and_write_back() {
        let mut scene = Scene::new();
        scene.set_config(RenderConfig {
            background: Color::new(1.0, 0.0, 0.0),
            ..RenderConfig::default()
        });
        let snapshot = scene.snapshot();

        let bucket = Bucket::new(2, 1, 3, 2, 0);
        assert_eq!(render_bucket(&bucket, &snapshot), Err(SceneError::NoActiveCamera));

        scene.add_camera(Camera::new().with_resolution(6, 4));
        let snapshot = scene.snapshot();
        let result = render_bucket(&bucket, &snapshot).unwrap();
        assert_eq!(result.pixels.len(), 6);

        let mut image = ImageBuffer::new(6, 4);
        image.write_bucket(&result);

        let red = to_rgb8(Color::new(1.0, 0.0, 0.0));
        for y in 0..4 {
            for x in 0..6 {
                let inside = (2..5).contains(&x) && (1..3).contains(&y);
                let expected = if inside { red } else { Rgb8::BLACK };
                assert_eq!(image.get(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }
}
