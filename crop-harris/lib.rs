//! Region proposals from Harris corner strength.
//!
//! A frame goes through six stages, each a small type of its own:
//!
//! 1. [`ResponseMapBuilder`] – luma conversion and Harris response
//! 2. [`Normalizer`] – min-max rescale to [0, 1]
//! 3. [`Aggregator`] – Gaussian blur that merges nearby responses
//! 4. [`ThresholdSegmenter`] – foreground where the blur exceeds `mean * factor`
//! 5. [`RegionExtractor`] – connected components and their bounding boxes
//! 6. [`ResultLabeler`] – one [`LabeledDetection`] per box
//!
//! [`HarrisCropper`] chains them; [`DetectorBuilder`] and [`DetectorConfig`]
//! configure it.

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod convolution;
pub mod detector;
pub mod error;
pub mod labeler;
pub mod normalize;
pub mod regions;
pub mod response;
pub mod threshold;
pub mod types;

pub use aggregate::Aggregator;
pub use builder::DetectorBuilder;
pub use config::DetectorConfig;
pub use detector::{HarrisCropper, PipelineTrace};
pub use error::{CropError, CropResult};
pub use labeler::ResultLabeler;
pub use normalize::Normalizer;
pub use regions::RegionExtractor;
pub use response::{intensity_image, intensity_map, validate_frame, ResponseMapBuilder};
pub use threshold::ThresholdSegmenter;
pub use types::{ConnectedRegion, Mask, NormalizedMap, ResponseMap, ScalarMap, SmoothedMap};

pub use crop_core::{BoundingBox, Connectivity, CropConfig, Frame, LabeledDetection};

/// Labelled proposals for `frame` with the default parameters
pub fn detect(frame: &Frame) -> CropResult<Vec<LabeledDetection>> {
    HarrisCropper::new(CropConfig::default())?.detect(frame)
}
