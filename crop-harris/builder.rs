use crate::config::DetectorConfig;
use crate::detector::HarrisCropper;
use crate::error::CropResult;
use crop_core::{Connectivity, CropConfig};

/// Fluent builder for a [`HarrisCropper`]
#[derive(Debug, Clone)]
pub struct DetectorBuilder {
    config: CropConfig,
}

impl Default for DetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: CropConfig::default(),
        }
    }

    /// Set the structure-tensor window side (odd)
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Set the Sobel aperture (3, 5 or 7)
    pub fn aperture_size(mut self, aperture_size: usize) -> Self {
        self.config.aperture_size = aperture_size;
        self
    }

    /// Set the Harris sensitivity constant
    pub fn sensitivity(mut self, k: f32) -> Self {
        self.config.k = k;
        self
    }

    /// Set the Gaussian kernel side and standard deviation
    pub fn blur(mut self, kernel_size: usize, sigma: f32) -> Self {
        self.config.blur_kernel_size = kernel_size;
        self.config.blur_sigma = sigma;
        self
    }

    /// Set the multiple of the mean response used as cutoff
    pub fn threshold_factor(mut self, factor: f32) -> Self {
        self.config.threshold_factor = factor;
        self
    }

    pub fn connectivity(mut self, connectivity: Connectivity) -> Self {
        self.config.connectivity = connectivity;
        self
    }

    /// Set the label attached to every proposal
    pub fn label(mut self, label: &str) -> Self {
        self.config.label = label.to_string();
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Apply the fine preset
    pub fn preset_fine(mut self) -> Self {
        self.config = DetectorConfig::fine_preset().core;
        self
    }

    /// Apply the coarse preset
    pub fn preset_coarse(mut self) -> Self {
        self.config = DetectorConfig::coarse_preset().core;
        self
    }

    /// Build the `HarrisCropper`
    pub fn build(self) -> CropResult<HarrisCropper> {
        HarrisCropper::new(self.config)
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self { config: config.core }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        DetectorConfig {
            core: self.config,
            ..DetectorConfig::new()
        }
    }
}
