use crate::annotations::AnnotationProvider;
use crate::registry::ProposalFunction;
use crate::sources::FrameSource;
use crate::CliResult;
use crop_core::{Frame, LabeledDetection};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use log::{debug, info};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// One output line of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub descriptor: String,
    pub proposals: Vec<LabeledDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub proposals: usize,
    /// Descriptor the run stopped at because it had no annotation
    pub missing_annotation: Option<String>,
}

/// A function, a frame source and optional ground truth, run to completion
pub struct Session {
    function: Box<dyn ProposalFunction>,
    source: Box<dyn FrameSource>,
    annotations: Option<Box<dyn AnnotationProvider>>,
    output_dir: Option<PathBuf>,
    silent: bool,
}

impl Session {
    pub fn new(function: Box<dyn ProposalFunction>, source: Box<dyn FrameSource>) -> Self {
        Self {
            function,
            source,
            annotations: None,
            output_dir: None,
            silent: false,
        }
    }

    pub fn with_annotations(mut self, annotations: Box<dyn AnnotationProvider>) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Write each frame with its proposals drawn into `dir`
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Skip the annotated images
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Process frames until the source runs dry or a frame has no annotation.
    ///
    /// Writes one JSON line per frame to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> CliResult<RunSummary> {
        let mut summary = RunSummary::default();
        let draw_dir = if self.silent { None } else { self.output_dir.clone() };
        if let Some(dir) = &draw_dir {
            std::fs::create_dir_all(dir)?;
        }

        while let Some(next) = self.source.next_frame() {
            let (frame, descriptor) = next?;
            let t0 = Instant::now();
            let proposals = self.function.propose(&frame)?;
            debug!("{}: {} proposals in {:.2?}", descriptor, proposals.len(), t0.elapsed());

            let ground_truth = match &self.annotations {
                Some(provider) => match provider.annotations(&descriptor) {
                    Some(truth) => Some(truth.len()),
                    None => {
                        writeln!(out, "Couldn't find annotation for: {}", descriptor)?;
                        writeln!(out, "End")?;
                        summary.missing_annotation = Some(descriptor);
                        break;
                    }
                },
                None => None,
            };

            summary.frames += 1;
            summary.proposals += proposals.len();

            if let Some(dir) = &draw_dir {
                let path = dir.join(annotated_name(&descriptor));
                draw_proposals(&frame, &proposals).save(&path)?;
                debug!("wrote {}", path.display());
            }

            let report = FrameReport {
                descriptor,
                proposals,
                ground_truth,
            };
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }

        info!(
            "processed {} frames, {} proposals",
            summary.frames, summary.proposals
        );
        Ok(summary)
    }
}

/// RGB copy of `frame` with a hollow rectangle around each proposal
pub fn draw_proposals(frame: &Frame, proposals: &[LabeledDetection]) -> RgbImage {
    let c = frame.channels;
    let mut canvas = RgbImage::from_fn(frame.width as u32, frame.height as u32, |x, y| {
        let i = (y as usize * frame.width + x as usize) * c;
        let px = &frame.data[i..i + c];
        if c >= 3 {
            Rgb([px[0], px[1], px[2]])
        } else {
            Rgb([px[0], px[0], px[0]])
        }
    });

    for p in proposals {
        let b = p.bounds;
        let rect = Rect::at(b.x as i32, b.y as i32).of_size(b.width as u32, b.height as u32);
        draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
    }
    canvas
}

/// `frame_01.jpg` -> `frame_01.png`; output is always PNG
fn annotated_name(descriptor: &str) -> PathBuf {
    let stem = Path::new(descriptor)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| descriptor.to_string());
    PathBuf::from(format!("{}.png", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::JsonAnnotations;
    use crate::sources::FrameList;
    use crop_core::BoundingBox;
    use crop_harris::DetectorBuilder;

    fn patch_frame() -> Frame {
        let mut data = vec![20u8; 100 * 100];
        for y in 40..50 {
            for x in 40..50 {
                data[y * 100 + x] = if (x / 2 + y / 2) % 2 == 0 { 200 } else { 90 };
            }
        }
        Frame::gray(100, 100, data)
    }

    fn cropper() -> Box<dyn ProposalFunction> {
        Box::new(DetectorBuilder::new().threads(1).build().unwrap())
    }

    fn frames() -> Box<dyn FrameSource> {
        Box::new(
            FrameList::new()
                .push(patch_frame(), "patch.png")
                .push(Frame::filled(40, 30, 1, 0), "black.png"),
        )
    }

    fn output_lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_one_json_line_per_frame() {
        let mut out = Vec::new();
        let summary = Session::new(cropper(), frames()).run(&mut out).unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.proposals, 1);
        assert!(summary.missing_annotation.is_none());

        let lines = output_lines(out);
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["descriptor"], "patch.png");
        assert_eq!(first["proposals"][0]["label"], "ball");
        assert!(first["proposals"][0]["attributes"]["width"].as_u64().unwrap() > 0);
        assert!(first.get("ground_truth").is_none());

        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["proposals"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_ground_truth_count_reported() {
        let ann = JsonAnnotations::from_json(
            r#"{ "patch.png": [ { "label": "ball", "attributes": { "x": 40, "y": 40, "width": 10, "height": 10 } } ],
                 "black.png": [] }"#,
        )
        .unwrap();
        let mut out = Vec::new();
        let summary = Session::new(cropper(), frames())
            .with_annotations(Box::new(ann))
            .run(&mut out)
            .unwrap();
        assert_eq!(summary.frames, 2);

        let lines = output_lines(out);
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(first["ground_truth"], 1);
        assert_eq!(second["ground_truth"], 0);
    }

    #[test]
    fn test_missing_annotation_stops_run() {
        let ann = JsonAnnotations::from_json(r#"{ "patch.png": [] }"#).unwrap();
        let mut out = Vec::new();
        let summary = Session::new(cropper(), frames())
            .with_annotations(Box::new(ann))
            .run(&mut out)
            .unwrap();
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.missing_annotation.as_deref(), Some("black.png"));

        let lines = output_lines(out);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Couldn't find annotation for: black.png");
        assert_eq!(lines[2], "End");
    }

    #[test]
    fn test_output_dir_and_silent() {
        let dir = std::env::temp_dir().join(format!("crop-cli-session-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        Session::new(cropper(), frames())
            .with_output_dir(&dir)
            .silent(true)
            .run(&mut std::io::sink())
            .unwrap();
        assert!(!dir.exists());

        Session::new(cropper(), frames())
            .with_output_dir(&dir)
            .run(&mut std::io::sink())
            .unwrap();
        assert!(dir.join("patch.png").is_file());
        assert!(dir.join("black.png").is_file());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_draw_proposals_outlines_box() {
        let frame = Frame::filled(20, 20, 1, 50);
        let boxes = [LabeledDetection::new("ball", BoundingBox::new(5, 5, 6, 4))];
        let img = draw_proposals(&frame, &boxes);
        assert_eq!(img.dimensions(), (20, 20));
        assert_eq!(*img.get_pixel(5, 5), BOX_COLOR);
        assert_eq!(*img.get_pixel(10, 8), BOX_COLOR);
        assert_eq!(*img.get_pixel(7, 6), Rgb([50, 50, 50]));
        assert_eq!(*img.get_pixel(0, 0), Rgb([50, 50, 50]));
    }

    #[test]
    fn test_annotated_name() {
        assert_eq!(annotated_name("frame_01.jpg"), PathBuf::from("frame_01.png"));
        assert_eq!(annotated_name("clip"), PathBuf::from("clip.png"));
    }
}
