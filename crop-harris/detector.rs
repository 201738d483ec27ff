use crate::aggregate::Aggregator;
use crate::error::{CropError, CropResult};
use crate::labeler::ResultLabeler;
use crate::normalize::Normalizer;
use crate::regions::RegionExtractor;
use crate::response::{intensity_image, validate_frame, ResponseMapBuilder};
use crate::threshold::ThresholdSegmenter;
use crate::types::{ConnectedRegion, Mask, NormalizedMap, ResponseMap, SmoothedMap};
use crop_core::{BoundingBox, CropConfig, Frame, LabeledDetection};
use log::debug;
use rayon::prelude::*;

/// Every intermediate product of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineTrace {
    pub response: ResponseMap,
    pub normalized: NormalizedMap,
    pub smoothed: SmoothedMap,
    pub cutoff: f32,
    pub mask: Mask,
    pub regions: Vec<ConnectedRegion>,
}

/// Harris response -> normalize -> blur -> threshold -> regions -> labels.
///
/// Holds only immutable parameters, so one instance can serve any number of
/// frames, from any number of threads.
#[derive(Debug, Clone)]
pub struct HarrisCropper {
    cfg: CropConfig,
    response: ResponseMapBuilder,
    aggregator: Aggregator,
    segmenter: ThresholdSegmenter,
    extractor: RegionExtractor,
    labeler: ResultLabeler,
}

impl HarrisCropper {
    /// Creates a new pipeline with validation.
    ///
    /// `n_threads` must be at least 1 so the configuration can size a pool
    /// with [`crop_core::init_thread_pool`]; the pipeline itself does not read
    /// it and runs on the current rayon pool.
    pub fn new(cfg: CropConfig) -> CropResult<Self> {
        if cfg.n_threads == 0 {
            return Err(CropError::InvalidThreadCount(cfg.n_threads));
        }
        let response = ResponseMapBuilder::new(cfg.block_size, cfg.aperture_size, cfg.k)?;
        let aggregator = Aggregator::new(cfg.blur_kernel_size, cfg.blur_sigma)?;
        let segmenter = ThresholdSegmenter::new(cfg.threshold_factor)?;
        let extractor = RegionExtractor::new(cfg.connectivity);
        let labeler = ResultLabeler::new(cfg.label.clone())?;

        Ok(Self {
            cfg,
            response,
            aggregator,
            segmenter,
            extractor,
            labeler,
        })
    }

    /// Run every stage and keep the intermediates
    pub fn trace(&self, frame: &Frame) -> CropResult<PipelineTrace> {
        validate_frame(frame)?;

        let response = self.response.build_from_gray(&intensity_image(frame));
        let normalized = Normalizer::normalize(&response);
        let smoothed = self.aggregator.smooth(&normalized);
        let cutoff = self.segmenter.cutoff(&smoothed);
        let mask = self.segmenter.segment(&smoothed);
        let regions = self.extractor.extract(&mask);

        Ok(PipelineTrace {
            response,
            normalized,
            smoothed,
            cutoff,
            mask,
            regions,
        })
    }

    /// Connected regions of the thresholded, smoothed response
    pub fn regions(&self, frame: &Frame) -> CropResult<Vec<ConnectedRegion>> {
        let trace = self.trace(frame)?;
        debug!(
            "HarrisCropper: {}x{} frame -> {} regions",
            frame.width,
            frame.height,
            trace.regions.len()
        );
        Ok(trace.regions)
    }

    /// Bounding boxes of interesting regions, unlabelled
    pub fn propose_regions(&self, frame: &Frame) -> CropResult<Vec<BoundingBox>> {
        Ok(self.regions(frame)?.into_iter().map(|r| r.bounds).collect())
    }

    /// Labelled proposals for one frame
    pub fn detect(&self, frame: &Frame) -> CropResult<Vec<LabeledDetection>> {
        let regions = self.regions(frame)?;
        Ok(self.labeler.label(&regions))
    }

    /// Sub-images under each proposal, in proposal order
    pub fn crop_regions(&self, frame: &Frame) -> CropResult<Vec<Frame>> {
        Ok(self
            .propose_regions(frame)?
            .iter()
            .filter_map(|b| frame.crop(b))
            .collect())
    }

    /// Detect on independent frames in parallel; results keep input order
    pub fn detect_batch(&self, frames: &[Frame]) -> Vec<CropResult<Vec<LabeledDetection>>> {
        frames.par_iter().map(|frame| self.detect(frame)).collect()
    }

    /// Get pipeline configuration
    pub fn config(&self) -> &CropConfig {
        &self.cfg
    }
}
