//! Separable convolution over [`ScalarMap`] with replicate borders.
//!
//! Every filter in the pipeline (Sobel derivatives, the structure-tensor box
//! sum and the Gaussian aggregation) goes through these two passes, so the
//! border policy is the same everywhere: samples outside the map are clamped
//! to the nearest edge pixel. A constant map is therefore left constant by any
//! kernel whose taps sum to one, and no stage can invent response at the edges.

use crate::types::ScalarMap;
use rayon::prelude::*;

/// Convolve each row with `kernel` (horizontal pass).
///
/// # Panics
/// Panics if the kernel is empty or has even length.
pub fn convolve_rows(src: &ScalarMap, kernel: &[f32]) -> ScalarMap {
    assert!(!kernel.is_empty(), "kernel must not be empty");
    assert!(kernel.len() % 2 == 1, "kernel length must be odd (got {})", kernel.len());

    let w = src.width();
    let h = src.height();
    let mut dst = ScalarMap::new(w, h);
    if w == 0 || h == 0 {
        return dst;
    }
    let half = kernel.len() / 2;

    dst.as_mut_slice()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out)| {
            let row = src.row(y);
            for (x, slot) in out.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sx = (x + ki).saturating_sub(half).min(w - 1);
                    acc += row[sx] * kv;
                }
                *slot = acc;
            }
        });
    dst
}

/// Convolve each column with `kernel` (vertical pass).
///
/// # Panics
/// Panics if the kernel is empty or has even length.
pub fn convolve_cols(src: &ScalarMap, kernel: &[f32]) -> ScalarMap {
    assert!(!kernel.is_empty(), "kernel must not be empty");
    assert!(kernel.len() % 2 == 1, "kernel length must be odd (got {})", kernel.len());

    let w = src.width();
    let h = src.height();
    let mut dst = ScalarMap::new(w, h);
    if w == 0 || h == 0 {
        return dst;
    }
    let half = kernel.len() / 2;

    dst.as_mut_slice()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out)| {
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = (y + ki).saturating_sub(half).min(h - 1);
                let row = src.row(sy);
                for (slot, &v) in out.iter_mut().zip(row) {
                    *slot += v * kv;
                }
            }
        });
    dst
}

/// Horizontal pass with `kernel_row`, then vertical pass with `kernel_col`.
pub fn convolve_separable(src: &ScalarMap, kernel_row: &[f32], kernel_col: &[f32]) -> ScalarMap {
    let intermediate = convolve_rows(src, kernel_row);
    convolve_cols(&intermediate, kernel_col)
}

/// Normalized 1D Gaussian of length `2 * half_size + 1`.
///
/// # Panics
/// Panics if `sigma` is not positive.
pub fn gaussian_kernel_1d(half_size: usize, sigma: f32) -> Vec<f32> {
    assert!(sigma > 0.0, "sigma must be positive");
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..2 * half_size + 1)
        .map(|i| {
            let x = i as f32 - half_size as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Unnormalized window sum of the given length.
pub fn box_kernel(size: usize) -> Vec<f32> {
    vec![1.0; size]
}

/// Binomial coefficients of row `n` (length `n + 1`).
fn binomial_row(n: usize) -> Vec<f32> {
    let mut row = vec![1.0f32];
    for _ in 0..n {
        let mut next = vec![1.0f32; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

/// Sobel `(derivative, smoothing)` kernel pair for an odd aperture >= 3.
///
/// The smoothing kernel is the binomial row of length `aperture`; the
/// derivative kernel is the shorter binomial row convolved with `[-1, 0, 1]`.
/// Aperture 3 gives the classic `[-1, 0, 1]` / `[1, 2, 1]` pair.
pub fn sobel_kernels(aperture: usize) -> (Vec<f32>, Vec<f32>) {
    assert!(aperture >= 3 && aperture % 2 == 1, "aperture must be odd and >= 3");
    let smooth = binomial_row(aperture - 1);
    let base = binomial_row(aperture - 3);

    let mut deriv = vec![0.0f32; aperture];
    for (i, &b) in base.iter().enumerate() {
        deriv[i] -= b;
        deriv[i + 2] += b;
    }
    (deriv, smooth)
}

/// Sobel gradients `(Ix, Iy)`; positive `Ix` points right, positive `Iy` down.
pub fn sobel_xy(src: &ScalarMap, aperture: usize) -> (ScalarMap, ScalarMap) {
    let (deriv, smooth) = sobel_kernels(aperture);
    let ix = convolve_separable(src, &deriv, &smooth);
    let iy = convolve_separable(src, &smooth, &deriv);
    (ix, iy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_kernel_properties() {
        let k = gaussian_kernel_1d(15, 5.0);
        assert_eq!(k.len(), 31);
        assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((k[0] - k[30]).abs() < 1e-7);
        assert!(k[15] > k[14]);
        assert!(k[14] > k[0]);
    }

    #[test]
    fn test_sobel_kernels() {
        let (d3, s3) = sobel_kernels(3);
        assert_eq!(d3, vec![-1.0, 0.0, 1.0]);
        assert_eq!(s3, vec![1.0, 2.0, 1.0]);

        let (d5, s5) = sobel_kernels(5);
        assert_eq!(d5, vec![-1.0, -2.0, 0.0, 2.0, 1.0]);
        assert_eq!(s5, vec![1.0, 4.0, 6.0, 4.0, 1.0]);

        let (d7, s7) = sobel_kernels(7);
        assert_eq!(d7, vec![-1.0, -4.0, -5.0, 0.0, 5.0, 4.0, 1.0]);
        assert_eq!(s7, vec![1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0]);
    }

    #[test]
    fn test_identity_kernel() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let map = ScalarMap::from_vec(4, 3, data.clone());
        let out = convolve_separable(&map, &[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(out.as_slice(), data.as_slice());
    }

    #[test]
    fn test_constant_map_unchanged() {
        let map = ScalarMap::filled(9, 7, 0.25);
        let k = gaussian_kernel_1d(15, 5.0);
        let out = convolve_separable(&map, &k, &k);
        for &v in out.as_slice() {
            assert!((v - 0.25).abs() < 1e-5, "constant map changed: {v}");
        }
    }

    #[test]
    fn test_clamp_border() {
        // x=0 replicates pixel 0: 0.25*10 + 0.5*10 + 0.25*20
        let map = ScalarMap::from_vec(3, 1, vec![10.0, 20.0, 30.0]);
        let out = convolve_rows(&map, &[0.25, 0.5, 0.25]);
        assert!((out.get(0, 0) - 12.5).abs() < 1e-6);
        assert!((out.get(2, 0) - 27.5).abs() < 1e-6);

        let col = ScalarMap::from_vec(1, 3, vec![10.0, 20.0, 30.0]);
        let out = convolve_cols(&col, &[0.25, 0.5, 0.25]);
        assert!((out.get(0, 0) - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_box_sum() {
        let mut map = ScalarMap::new(5, 5);
        map.set(2, 2, 1.0);
        let k = box_kernel(3);
        let out = convolve_separable(&map, &k, &k);
        assert_eq!(out.get(1, 1), 1.0);
        assert_eq!(out.get(3, 3), 1.0);
        assert_eq!(out.get(0, 0), 0.0);
    }

    #[test]
    fn test_sobel_on_ramp() {
        // f(x, y) = x: Ix = 2 * (1 + 2 + 1) = 8 in the interior, Iy = 0
        let data = (0..10 * 6).map(|i| (i % 10) as f32).collect();
        let map = ScalarMap::from_vec(10, 6, data);
        let (ix, iy) = sobel_xy(&map, 3);
        for y in 1..5 {
            for x in 1..9 {
                assert!((ix.get(x, y) - 8.0).abs() < 1e-4);
                assert!(iy.get(x, y).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_empty_map() {
        let map = ScalarMap::new(0, 0);
        let out = convolve_separable(&map, &[1.0], &[1.0]);
        assert_eq!(out.width(), 0);
    }

    #[test]
    #[should_panic(expected = "odd")]
    fn test_even_kernel_panics() {
        let map = ScalarMap::new(4, 4);
        convolve_rows(&map, &[0.5, 0.5]);
    }
}
