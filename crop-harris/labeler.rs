use crate::error::{CropError, CropResult};
use crate::types::ConnectedRegion;
use crop_core::{BoundingBox, LabeledDetection, DEFAULT_LABEL};

/// Tags every region with the single object class the pipeline proposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLabeler {
    label: String,
}

impl Default for ResultLabeler {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
        }
    }
}

impl ResultLabeler {
    pub fn new(label: impl Into<String>) -> CropResult<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(CropError::EmptyLabel);
        }
        Ok(Self { label })
    }

    pub fn label_name(&self) -> &str {
        &self.label
    }

    pub fn label(&self, regions: &[ConnectedRegion]) -> Vec<LabeledDetection> {
        self.label_boxes(regions.iter().map(|r| r.bounds))
    }

    pub fn label_boxes(&self, boxes: impl IntoIterator<Item = BoundingBox>) -> Vec<LabeledDetection> {
        boxes
            .into_iter()
            .map(|b| LabeledDetection::new(self.label.clone(), b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let regions = [
            ConnectedRegion { label: 2, area: 3, bounds: BoundingBox::new(5, 5, 2, 2) },
            ConnectedRegion { label: 1, area: 1, bounds: BoundingBox::new(0, 0, 1, 1) },
        ];
        let detections = ResultLabeler::default().label(&regions);
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].bounds, regions[0].bounds);
        assert_eq!(detections[1].bounds, regions[1].bounds);
        assert!(detections.iter().all(|d| d.label == "ball"));
    }

    #[test]
    fn test_custom_label() {
        let labeler = ResultLabeler::new("goal_post").unwrap();
        let detections = labeler.label_boxes([BoundingBox::new(1, 2, 3, 4)]);
        assert_eq!(detections, vec![LabeledDetection::new("goal_post", BoundingBox::new(1, 2, 3, 4))]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ResultLabeler::default().label(&[]).is_empty());
        assert_eq!(ResultLabeler::new(""), Err(CropError::EmptyLabel));
    }
}
