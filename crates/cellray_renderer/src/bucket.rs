//! Bucket-based tile rendering.
//!
//! Divides the image into rectangular buckets that are rendered
//! independently by the worker threads.

use cellray_core::Colour;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Exclusive pixel ranges `[x_min, x_max) × [y_min, y_max)`.
    pub fn x_range(&self) -> std::ops::Range<u32> {
        self.x..self.x + self.width
    }

    pub fn y_range(&self) -> std::ops::Range<u32> {
        self.y..self.y + self.height
    }
}

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Split an image into `block_width × block_height` buckets, sorted in
/// spiral order from the centre.
///
/// The last column and row are clipped to the image, so buckets never
/// overlap and cover every pixel exactly once. Zero block sizes are treated
/// as 1.
pub fn generate_buckets(
    width: u32,
    height: u32,
    block_width: u32,
    block_height: u32,
) -> Vec<Bucket> {
    let block_width = block_width.max(1);
    let block_height = block_height.max(1);

    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        let bh = block_height.min(height - y);
        while x < width {
            let bw = block_width.min(width - x);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bw;
        }
        y += bh;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
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

/// Render every pixel of a bucket, row by row.
pub fn render_bucket(bucket: &Bucket, mut shade: impl FnMut(u32, u32) -> Colour) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for y in bucket.y_range() {
        for x in bucket.x_range() {
            pixels.push(shade(x, y));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Colour>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Colour>) -> Self {
        Self { bucket, pixels }
    }
}
