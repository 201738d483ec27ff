use crate::error::{CropError, CropResult};
use crate::types::{Mask, SmoothedMap};
use log::debug;

/// Adaptive cutoff relative to the mean smoothed response.
///
/// A pixel is foreground when its value is strictly greater than
/// `mean * factor`, so an all-zero map yields an all-background mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSegmenter {
    factor: f32,
}

impl Default for ThresholdSegmenter {
    fn default() -> Self {
        Self { factor: 1.01 }
    }
}

impl ThresholdSegmenter {
    pub fn new(factor: f32) -> CropResult<Self> {
        if !(factor.is_finite() && factor >= 0.0) {
            return Err(CropError::InvalidThresholdFactor(factor));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn cutoff(&self, smoothed: &SmoothedMap) -> f32 {
        (smoothed.mean() * self.factor as f64) as f32
    }

    pub fn segment(&self, smoothed: &SmoothedMap) -> Mask {
        let cutoff = self.cutoff(smoothed);
        let mut mask = Mask::new(smoothed.width(), smoothed.height());
        for y in 0..smoothed.height() {
            for (x, &v) in smoothed.row(y).iter().enumerate() {
                if v > cutoff {
                    mask.set_foreground(x, y, true);
                }
            }
        }
        debug!(
            "ThresholdSegmenter: cutoff {:.4e}, {} foreground pixels",
            cutoff,
            mask.foreground_count()
        );
        mask
    }
}
