use crate::types::{NormalizedMap, ResponseMap};
use log::{debug, warn};
use rayon::prelude::*;

/// Min-max rescaling of a response map into [0, 1]
pub struct Normalizer;

impl Normalizer {
    /// `(v - min) / (max - min)` over the global extrema.
    ///
    /// A flat map (or one whose range is not finite) has no meaningful
    /// scale and comes back all zero.
    pub fn normalize(response: &ResponseMap) -> NormalizedMap {
        let (w, h) = (response.width(), response.height());
        let Some((min, max)) = response.min_max() else {
            return NormalizedMap::new(w, h);
        };

        let range = max - min;
        if !range.is_finite() {
            warn!("Normalizer: non-finite response range [{}, {}], emitting zero map", min, max);
            return NormalizedMap::new(w, h);
        }
        if range <= 0.0 {
            debug!("Normalizer: flat response at {}, emitting zero map", min);
            return NormalizedMap::new(w, h);
        }

        let mut out = NormalizedMap::new(w, h);
        out.as_mut_slice()
            .par_iter_mut()
            .zip(response.as_slice().par_iter())
            .for_each(|(dst, &v)| *dst = ((v - min) / range).clamp(0.0, 1.0));
        out
    }
}
