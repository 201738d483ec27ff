#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label attached to every proposal unless configured otherwise
pub const DEFAULT_LABEL: &str = "ball";

/// Row-major 8-bit image with interleaved channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Single-channel intensity frame
    pub fn gray(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self::new(width, height, 1, data)
    }

    /// Three-channel frame in R, G, B order
    pub fn rgb(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self::new(width, height, 3, data)
    }

    /// Frame filled with a single value in every channel
    pub fn filled(width: usize, height: usize, channels: usize, value: u8) -> Self {
        Self::new(width, height, channels, vec![value; width * height * channels])
    }

    /// Number of bytes a well-formed frame of this shape holds, or `None`
    /// when the shape is too large to address
    pub fn expected_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.channels)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy out the sub-image covered by `bounds`.
    ///
    /// Returns `None` when the box is empty or reaches outside the frame.
    pub fn crop(&self, bounds: &BoundingBox) -> Option<Frame> {
        if bounds.width == 0 || bounds.height == 0 || !bounds.fits_within(self.width, self.height) {
            return None;
        }
        let row_len = bounds.width * self.channels;
        let mut data = Vec::with_capacity(row_len * bounds.height);
        for y in bounds.y..bounds.y + bounds.height {
            let start = (y * self.width + bounds.x) * self.channels;
            data.extend_from_slice(self.data.get(start..start + row_len)?);
        }
        Some(Frame::new(bounds.width, bounds.height, self.channels, data))
    }
}

/// Minimal axis-aligned rectangle around a region, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box spanning the inclusive corners `(x0, y0)` and `(x1, y1)`
    pub fn from_corners(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1)
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x + self.width <= width && self.y + self.height <= height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Area shared with `other`, zero when disjoint
    pub fn intersection_area(&self, other: &BoundingBox) -> usize {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        x1.saturating_sub(x0) * y1.saturating_sub(y0)
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.intersection_area(other) > 0
    }
}

/// A proposal as handed to downstream consumers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabeledDetection {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(rename = "attributes"))]
    pub bounds: BoundingBox,
}

impl LabeledDetection {
    pub fn new(label: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bounds,
        }
    }
}

/// Pixel adjacency used when grouping foreground pixels into regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Connectivity {
    Four,
    #[default]
    Eight,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CropConfig {
    /// Side of the structure-tensor window
    pub block_size: usize,
    /// Sobel aperture (3, 5 or 7)
    pub aperture_size: usize,
    /// Harris sensitivity constant
    pub k: f32,
    pub blur_kernel_size: usize,
    pub blur_sigma: f32,
    /// Cutoff is `mean(smoothed) * threshold_factor`
    pub threshold_factor: f32,
    pub connectivity: Connectivity,
    pub label: String,
    /// Size of the global rayon pool, passed to [`init_thread_pool`] by the
    /// caller. Detectors only validate it; they run on whatever pool is current.
    pub n_threads: usize,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            block_size: 9,
            aperture_size: 3,
            k: 0.04,
            blur_kernel_size: 31,
            blur_sigma: 5.0,
            threshold_factor: 1.01,
            connectivity: Connectivity::Eight,
            label: DEFAULT_LABEL.to_string(),
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
