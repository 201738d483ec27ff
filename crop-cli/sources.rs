use crate::{CliError, CliResult};
use crop_core::Frame;
use image::{DynamicImage, ImageFormat, ImageReader};
use log::debug;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Produces frames together with a descriptor naming each one.
///
/// `None` marks the end of the stream; an `Err` item is a frame that could
/// not be produced.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<CliResult<(Frame, String)>>;
}

/// Convert a decoded image into a gray or RGB frame, dropping alpha
pub fn frame_from_image(img: DynamicImage) -> Frame {
    let (w, h) = (img.width() as usize, img.height() as usize);
    if img.color().has_color() {
        Frame::rgb(w, h, img.into_rgb8().into_raw())
    } else {
        Frame::gray(w, h, img.into_luma8().into_raw())
    }
}

/// Decode an image file into a frame
pub fn load_frame<P: AsRef<Path>>(path: P) -> CliResult<Frame> {
    let img = ImageReader::open(path.as_ref())?.decode()?;
    Ok(frame_from_image(img))
}

/// Descriptor used to look up annotations: the file name of the path
pub fn descriptor_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Frames decoded from an explicit list of image files, in the given order
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    paths: VecDeque<PathBuf>,
}

impl ImageFileSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of frames not yet produced
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageFileSource {
    fn next_frame(&mut self) -> Option<CliResult<(Frame, String)>> {
        let path = self.paths.pop_front()?;
        debug!("ImageFileSource: loading {}", path.display());
        Some(load_frame(&path).map(|frame| (frame, descriptor_for(&path))))
    }
}

/// Every image file directly inside a directory, sorted by path
#[derive(Debug, Clone)]
pub struct DirectorySource {
    files: ImageFileSource,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> CliResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CliError::InvalidArguments(format!(
                "not a directory: {}",
                dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && ImageFormat::from_path(&path).is_ok() {
                paths.push(path);
            }
        }
        paths.sort();
        debug!("DirectorySource: {} images in {}", paths.len(), dir.display());

        Ok(Self {
            files: ImageFileSource::new(paths),
        })
    }

    pub fn remaining(&self) -> usize {
        self.files.remaining()
    }
}

impl FrameSource for DirectorySource {
    fn next_frame(&mut self) -> Option<CliResult<(Frame, String)>> {
        self.files.next_frame()
    }
}

/// Frames already in memory
#[derive(Debug, Clone, Default)]
pub struct FrameList {
    frames: VecDeque<(Frame, String)>,
}

impl FrameList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, frame: Frame, descriptor: &str) -> Self {
        self.frames.push_back((frame, descriptor.to_string()));
        self
    }
}

impl FrameSource for FrameList {
    fn next_frame(&mut self) -> Option<CliResult<(Frame, String)>> {
        self.frames.pop_front().map(Ok)
    }
}
