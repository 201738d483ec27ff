use crate::convolution::gaussian_kernel_1d;
use crate::error::{CropError, CropResult};
use crate::types::{NormalizedMap, SmoothedMap};
use imageproc::filter::separable_filter_equal;

/// Gaussian low-pass that merges nearby strong responses into blobs.
///
/// The kernel is applied with `imageproc`'s separable filter, which clamps
/// samples outside the map to the nearest edge pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    kernel: Vec<f32>,
    sigma: f32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            kernel: gaussian_kernel_1d(15, 5.0),
            sigma: 5.0,
        }
    }
}

impl Aggregator {
    pub fn new(kernel_size: usize, sigma: f32) -> CropResult<Self> {
        if kernel_size == 0 || kernel_size % 2 == 0 {
            return Err(CropError::InvalidKernelSize(kernel_size));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(CropError::InvalidSigma(sigma));
        }
        Ok(Self {
            kernel: gaussian_kernel_1d(kernel_size / 2, sigma),
            sigma,
        })
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel.len()
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn smooth(&self, normalized: &NormalizedMap) -> SmoothedMap {
        SmoothedMap::from_image(separable_filter_equal(normalized.as_image(), &self.kernel))
    }
}
