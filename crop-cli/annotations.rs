use crate::CliResult;
use crop_core::LabeledDetection;
use std::collections::HashMap;
use std::path::Path;

/// Ground truth for frames, looked up by descriptor.
///
/// `None` means the provider knows nothing about that frame, which is
/// different from a frame annotated with zero objects.
pub trait AnnotationProvider {
    fn annotations(&self, descriptor: &str) -> Option<Vec<LabeledDetection>>;
}

/// Annotations read from a JSON object mapping descriptors to detections:
///
/// ```json
/// { "frame_001.png": [ { "label": "ball", "attributes": { "x": 3, "y": 4, "width": 10, "height": 12 } } ] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonAnnotations {
    entries: HashMap<String, Vec<LabeledDetection>>,
}

impl JsonAnnotations {
    pub fn load<P: AsRef<Path>>(path: P) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> CliResult<Self> {
        let entries = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AnnotationProvider for JsonAnnotations {
    fn annotations(&self, descriptor: &str) -> Option<Vec<LabeledDetection>> {
        self.entries.get(descriptor).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use crop_core::BoundingBox;

    const SAMPLE: &str = r#"{
        "a.png": [
            { "label": "ball", "attributes": { "x": 3, "y": 4, "width": 10, "height": 12 } },
            { "label": "goal", "attributes": { "x": 0, "y": 0, "width": 5, "height": 5 } }
        ],
        "b.png": []
    }"#;

    #[test]
    fn test_lookup() {
        let ann = JsonAnnotations::from_json(SAMPLE).unwrap();
        assert_eq!(ann.len(), 2);

        let a = ann.annotations("a.png").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0], LabeledDetection::new("ball", BoundingBox::new(3, 4, 10, 12)));
        assert_eq!(a[1].label, "goal");
    }

    #[test]
    fn test_empty_entry_differs_from_missing() {
        let ann = JsonAnnotations::from_json(SAMPLE).unwrap();
        assert_eq!(ann.annotations("b.png"), Some(vec![]));
        assert_eq!(ann.annotations("c.png"), None);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(JsonAnnotations::from_json("[1, 2"), Err(CliError::Json(_))));
        assert!(matches!(JsonAnnotations::load("/no/such/annotations.json"), Err(CliError::Io(_))));
    }
}
