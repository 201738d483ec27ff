//! Glue for running region proposals over a stream of frames.
//!
//! A run wires three named modules together: a proposal function, a frame
//! source and, optionally, an annotation provider. [`Registry`] resolves
//! the names and [`Session`] drives the loop.

pub mod annotations;
pub mod args;
pub mod registry;
pub mod session;
pub mod sources;

pub use annotations::{AnnotationProvider, JsonAnnotations};
pub use args::CliArgs;
pub use registry::{ModuleKind, ProposalFunction, Registry};
pub use session::{FrameReport, RunSummary, Session};
pub use sources::{DirectorySource, FrameList, FrameSource, ImageFileSource};

pub use crop_core::{self, BoundingBox, Frame, LabeledDetection};
pub use crop_harris::{self, CropError, DetectorConfig, HarrisCropper};

#[derive(Debug)]
pub enum CliError {
    Crop(CropError),
    Image(image::ImageError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Toml(toml::de::Error),
    ThreadPool(rayon::ThreadPoolBuildError),
    UnknownModule { kind: ModuleKind, name: String },
    InvalidArguments(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Crop(e) => write!(f, "Detection error: {}", e),
            CliError::Image(e) => write!(f, "Image error: {}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Json(e) => write!(f, "JSON error: {}", e),
            CliError::Toml(e) => write!(f, "TOML error: {}", e),
            CliError::ThreadPool(e) => write!(f, "Thread pool error: {}", e),
            CliError::UnknownModule { kind, name } => {
                write!(f, "Could not find {} module: {}", kind, name)
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<CropError> for CliError {
    fn from(err: CropError) -> Self {
        CliError::Crop(err)
    }
}

impl From<image::ImageError> for CliError {
    fn from(err: image::ImageError) -> Self {
        CliError::Image(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Toml(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for CliError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        CliError::ThreadPool(err)
    }
}

pub type CliResult<T> = Result<T, CliError>;
