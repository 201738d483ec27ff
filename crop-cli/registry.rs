use crate::annotations::{AnnotationProvider, JsonAnnotations};
use crate::sources::{DirectorySource, FrameSource, ImageFileSource};
use crate::{CliError, CliResult};
use crop_core::{Frame, LabeledDetection};
use crop_harris::{DetectorConfig, HarrisCropper};
use log::info;
use std::path::Path;

/// A vision function under test: frame in, labelled proposals out
pub trait ProposalFunction: Send + Sync {
    fn propose(&self, frame: &Frame) -> CliResult<Vec<LabeledDetection>>;
}

impl ProposalFunction for HarrisCropper {
    fn propose(&self, frame: &Frame) -> CliResult<Vec<LabeledDetection>> {
        Ok(self.detect(frame)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Function,
    Input,
    Annotations,
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleKind::Function => write!(f, "function"),
            ModuleKind::Input => write!(f, "input"),
            ModuleKind::Annotations => write!(f, "annotations"),
        }
    }
}

/// Static table of the modules a run can be assembled from
pub struct Registry;

impl Registry {
    pub const FUNCTIONS: &'static [&'static str] = &["harris_crop"];
    pub const INPUTS: &'static [&'static str] = &["images", "directory"];
    pub const ANNOTATIONS: &'static [&'static str] = &["json"];

    /// `harris_crop [config.json|config.toml]`
    pub fn function(name: &str, args: &[String]) -> CliResult<Box<dyn ProposalFunction>> {
        match name {
            "harris_crop" => {
                let config = match args {
                    [] => DetectorConfig::new(),
                    [path] => load_config(Path::new(path))?,
                    _ => return Err(too_many_args(name, 1, args.len())),
                };
                info!("harris_crop: {}", config.summary());
                Ok(Box::new(config.build()?))
            }
            other => Err(unknown(ModuleKind::Function, other)),
        }
    }

    /// `images <path>...` or `directory <dir>`
    pub fn input(name: &str, args: &[String]) -> CliResult<Box<dyn FrameSource>> {
        match name {
            "images" => {
                if args.is_empty() {
                    return Err(CliError::InvalidArguments(
                        "images: expected at least one image path".to_string(),
                    ));
                }
                Ok(Box::new(ImageFileSource::new(args.iter())))
            }
            "directory" => match args {
                [dir] => Ok(Box::new(DirectorySource::new(dir)?)),
                _ => Err(CliError::InvalidArguments(format!(
                    "directory: expected exactly one directory, got {}",
                    args.len()
                ))),
            },
            other => Err(unknown(ModuleKind::Input, other)),
        }
    }

    /// `json <annotations.json>`
    pub fn annotations(name: &str, args: &[String]) -> CliResult<Box<dyn AnnotationProvider>> {
        match name {
            "json" => match args {
                [path] => Ok(Box::new(JsonAnnotations::load(path)?)),
                _ => Err(CliError::InvalidArguments(format!(
                    "json: expected exactly one annotation file, got {}",
                    args.len()
                ))),
            },
            other => Err(unknown(ModuleKind::Annotations, other)),
        }
    }
}

/// Read a detector configuration, choosing the format by extension
pub fn load_config(path: &Path) -> CliResult<DetectorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: DetectorConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => {
            return Err(CliError::InvalidArguments(format!(
                "config file must end in .json or .toml: {}",
                path.display()
            )));
        }
    };
    config.validate()?;
    Ok(config)
}

fn unknown(kind: ModuleKind, name: &str) -> CliError {
    CliError::UnknownModule {
        kind,
        name: name.to_string(),
    }
}

fn too_many_args(name: &str, max: usize, got: usize) -> CliError {
    CliError::InvalidArguments(format!("{}: expected at most {} arguments, got {}", name, max, got))
}
