use crop_core::BoundingBox;
use image::{GrayImage, ImageBuffer, Luma};

/// Single-channel `f32` image, the buffer type `imageproc` filters operate on
pub type ScalarImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Converts a map dimension to the `u32` the `image` crate expects.
///
/// # Panics
/// Panics if `v` does not fit in `u32`. Frames are checked for this in
/// [`crate::response::validate_frame`] before any map is allocated.
pub(crate) fn image_dim(v: usize) -> u32 {
    u32::try_from(v).unwrap_or_else(|_| panic!("dimension {} exceeds u32::MAX", v))
}

/// Row-major grid of `f32` scores, one per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMap {
    image: ScalarImage,
}

/// Raw Harris scores
pub type ResponseMap = ScalarMap;
/// Scores rescaled to [0, 1]
pub type NormalizedMap = ScalarMap;
/// Normalized scores after Gaussian aggregation
pub type SmoothedMap = ScalarMap;

impl ScalarMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: ScalarImage::new(image_dim(width), image_dim(height)),
        }
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            image: ScalarImage::from_pixel(image_dim(width), image_dim(height), Luma([value])),
        }
    }

    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width * height, "map data does not match {}x{}", width, height);
        let image = ScalarImage::from_raw(image_dim(width), image_dim(height), data)
            .unwrap_or_else(|| unreachable!("length checked above"));
        Self { image }
    }

    pub fn from_image(image: ScalarImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.image.as_raw()[y * self.width() + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let w = self.width();
        self.as_mut_slice()[y * w + x] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        self.image.as_raw()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.image
    }

    pub fn row(&self, y: usize) -> &[f32] {
        let w = self.width();
        &self.as_slice()[y * w..(y + 1) * w]
    }

    pub fn as_image(&self) -> &ScalarImage {
        &self.image
    }

    pub fn into_image(self) -> ScalarImage {
        self.image
    }

    /// Global `(min, max)`, or `None` for an empty map
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.as_slice().iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Arithmetic mean accumulated in `f64`; zero for an empty map
    pub fn mean(&self) -> f64 {
        let data = self.as_slice();
        if data.is_empty() {
            return 0.0;
        }
        data.iter().map(|&v| v as f64).sum::<f64>() / data.len() as f64
    }

    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|v| v.is_finite())
    }
}

/// Binary foreground/background mask
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    pub const FOREGROUND: u8 = 255;
    pub const BACKGROUND: u8 = 0;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: GrayImage::new(image_dim(width), image_dim(height)),
        }
    }

    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.image.get_pixel(x as u32, y as u32)[0] == Self::FOREGROUND
    }

    pub fn set_foreground(&mut self, x: usize, y: usize, on: bool) {
        let value = if on { Self::FOREGROUND } else { Self::BACKGROUND };
        self.image.put_pixel(x as u32, y as u32, Luma([value]));
    }

    pub fn foreground_count(&self) -> usize {
        self.image.as_raw().iter().filter(|&&v| v == Self::FOREGROUND).count()
    }

    /// Backing 8-bit image (255 = foreground)
    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }
}

/// Maximal connected set of foreground pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectedRegion {
    /// Label assigned by the region labeller, starting at 1
    pub label: u32,
    /// Number of foreground pixels in the region
    pub area: usize,
    pub bounds: BoundingBox,
}
