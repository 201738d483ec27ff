use crate::types::{ConnectedRegion, Mask};
use crop_core::{BoundingBox, Connectivity};
use image::Luma;
use imageproc::region_labelling::{self, connected_components};
use log::debug;

/// Connected-component labelling of a mask plus per-region bounding boxes.
///
/// Regions come back in raster order of each region's first pixel
/// (top-to-bottom, then left-to-right). No size filtering happens here: a
/// lone foreground pixel is a 1x1 region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionExtractor {
    pub connectivity: Connectivity,
}

/// Running extent of one label
#[derive(Clone, Copy)]
struct Extent {
    first: (usize, usize),
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    area: usize,
}

impl RegionExtractor {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    pub fn extract(&self, mask: &Mask) -> Vec<ConnectedRegion> {
        let conn = match self.connectivity {
            Connectivity::Four => region_labelling::Connectivity::Four,
            Connectivity::Eight => region_labelling::Connectivity::Eight,
        };
        let labels = connected_components(mask.as_image(), conn, Luma([Mask::BACKGROUND]));

        let mut extents: Vec<Option<Extent>> = Vec::new();
        for (x, y, pixel) in labels.enumerate_pixels() {
            let label = pixel[0] as usize;
            if label == 0 {
                continue;
            }
            if extents.len() < label {
                extents.resize(label, None);
            }
            let (x, y) = (x as usize, y as usize);
            let e = extents[label - 1].get_or_insert(Extent {
                first: (y, x),
                x0: x,
                y0: y,
                x1: x,
                y1: y,
                area: 0,
            });
            e.x0 = e.x0.min(x);
            e.x1 = e.x1.max(x);
            e.y0 = e.y0.min(y);
            e.y1 = e.y1.max(y);
            e.area += 1;
        }

        let mut found: Vec<(u32, Extent)> = extents
            .into_iter()
            .enumerate()
            .filter_map(|(i, e)| e.map(|e| (i as u32 + 1, e)))
            .collect();
        found.sort_by_key(|(_, e)| e.first);

        let regions: Vec<ConnectedRegion> = found
            .into_iter()
            .map(|(label, e)| ConnectedRegion {
                label,
                area: e.area,
                bounds: BoundingBox::from_corners(e.x0, e.y0, e.x1, e.y1),
            })
            .collect();

        debug!("RegionExtractor: {} regions ({:?} connectivity)", regions.len(), self.connectivity);
        regions
    }

    /// Bounding boxes only, in region order
    pub fn bounding_boxes(&self, mask: &Mask) -> Vec<BoundingBox> {
        self.extract(mask).into_iter().map(|r| r.bounds).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> Mask {
        let mut mask = Mask::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                mask.set_foreground(x, y, c == '#');
            }
        }
        mask
    }

    #[test]
    fn test_empty_mask() {
        let mask = Mask::new(10, 10);
        assert!(RegionExtractor::default().extract(&mask).is_empty());
    }

    #[test]
    fn test_single_pixel_region() {
        let mask = mask_from(&["....", "..#.", "...."]);
        let regions = RegionExtractor::default().extract(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounds, BoundingBox::new(2, 1, 1, 1));
        assert_eq!(regions[0].area, 1);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let rows = ["#...", ".#..", "..#.", "...."];
        let eight = RegionExtractor::new(Connectivity::Eight).extract(&mask_from(&rows));
        let four = RegionExtractor::new(Connectivity::Four).extract(&mask_from(&rows));
        assert_eq!(eight.len(), 1);
        assert_eq!(eight[0].bounds, BoundingBox::new(0, 0, 3, 3));
        assert_eq!(four.len(), 3);
    }

    #[test]
    fn test_bounding_boxes_and_order() {
        let mask = mask_from(&[
            "......##",
            ".##...##",
            ".#......",
            ".#...#..",
            ".....###",
        ]);
        let regions = RegionExtractor::default().extract(&mask);
        let boxes: Vec<_> = regions.iter().map(|r| r.bounds).collect();
        assert_eq!(
            boxes,
            vec![
                BoundingBox::new(6, 0, 2, 2),
                BoundingBox::new(1, 1, 2, 3),
                BoundingBox::new(5, 3, 3, 2),
            ]
        );
        assert_eq!(regions.iter().map(|r| r.area).collect::<Vec<_>>(), vec![4, 4, 4]);
    }

    #[test]
    fn test_concave_region_single_box() {
        let mask = mask_from(&["#...#", "#...#", "#####"]);
        let boxes = RegionExtractor::default().bounding_boxes(&mask);
        assert_eq!(boxes, vec![BoundingBox::new(0, 0, 5, 3)]);
    }

    #[test]
    fn test_repeatable() {
        let mask = mask_from(&["#.#.#", ".....", "#.#.#"]);
        let extractor = RegionExtractor::default();
        let first = extractor.extract(&mask);
        assert_eq!(first.len(), 6);
        assert_eq!(first, extractor.extract(&mask));
    }
}
