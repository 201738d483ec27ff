use crate::convolution::{box_kernel, convolve_separable, sobel_xy};
use crate::error::{CropError, CropResult};
use crate::types::{image_dim, ResponseMap, ScalarMap};
use crop_core::Frame;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use log::debug;
use rayon::prelude::*;

/// Check shape and channel layout before any stage touches the pixels
pub fn validate_frame(frame: &Frame) -> CropResult<()> {
    let size_error = CropError::InvalidImageSize {
        width: frame.width,
        height: frame.height,
    };
    if frame.is_empty() || u32::try_from(frame.width).is_err() || u32::try_from(frame.height).is_err() {
        return Err(size_error);
    }
    if !(1..=4).contains(&frame.channels) {
        return Err(CropError::UnsupportedChannels(frame.channels));
    }
    let Some(expected_len) = frame.expected_len() else {
        return Err(size_error);
    };
    if frame.data.len() != expected_len {
        return Err(CropError::InvalidImageData {
            expected_len,
            actual_len: frame.data.len(),
        });
    }
    Ok(())
}

/// Rec.601 luma, rounded to the nearest integer
#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// 8-bit intensity image of a validated frame.
///
/// Gray frames pass through unchanged; alpha channels are ignored.
///
/// # Panics
/// Panics if the frame fails [`validate_frame`].
pub fn intensity_image(frame: &Frame) -> GrayImage {
    let pixels = frame.data.chunks_exact(frame.channels);
    let data: Vec<u8> = match frame.channels {
        1 | 2 => pixels.map(|p| p[0]).collect(),
        _ => pixels.map(|p| luma(p[0], p[1], p[2])).collect(),
    };
    GrayImage::from_raw(image_dim(frame.width), image_dim(frame.height), data)
        .unwrap_or_else(|| panic!("frame data does not match {}x{}", frame.width, frame.height))
}

/// Intensity as an `f32` map
pub fn intensity_map(frame: &Frame) -> ScalarMap {
    gray_to_map(&intensity_image(frame))
}

fn gray_to_map(gray: &GrayImage) -> ScalarMap {
    let (w, h) = gray.dimensions();
    ScalarMap::from_vec(w as usize, h as usize, gray.as_raw().iter().map(|&v| v as f32).collect())
}

fn gradient_to_map(grad: &ImageBuffer<Luma<i16>, Vec<i16>>) -> ScalarMap {
    let (w, h) = grad.dimensions();
    ScalarMap::from_vec(w as usize, h as usize, grad.as_raw().iter().map(|&v| v as f32).collect())
}

/// Harris corner-strength field.
///
/// Gradients come from a Sobel operator of size `aperture_size`, scaled so
/// that the score magnitude does not depend on the window sizes. The
/// structure tensor is the plain sum of `Ix²`, `Iy²` and `Ix·Iy` over a
/// `block_size` square window, and each pixel scores `det(M) - k·trace(M)²`:
/// positive at corners and texture, negative along straight edges, zero on
/// flat areas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseMapBuilder {
    pub block_size: usize,
    pub aperture_size: usize,
    pub k: f32,
}

impl Default for ResponseMapBuilder {
    fn default() -> Self {
        Self {
            block_size: 9,
            aperture_size: 3,
            k: 0.04,
        }
    }
}

impl ResponseMapBuilder {
    pub fn new(block_size: usize, aperture_size: usize, k: f32) -> CropResult<Self> {
        if block_size == 0 || block_size % 2 == 0 {
            return Err(CropError::InvalidBlockSize(block_size));
        }
        if !matches!(aperture_size, 3 | 5 | 7) {
            return Err(CropError::InvalidApertureSize(aperture_size));
        }
        if !k.is_finite() {
            return Err(CropError::InvalidSensitivity(k));
        }
        Ok(Self {
            block_size,
            aperture_size,
            k,
        })
    }

    pub fn build(&self, frame: &Frame) -> CropResult<ResponseMap> {
        validate_frame(frame)?;
        Ok(self.build_from_gray(&intensity_image(frame)))
    }

    /// Sobel gradients `(Ix, Iy)`.
    ///
    /// Aperture 3 uses `imageproc`'s Sobel; 5 and 7 use the separable
    /// binomial kernels from [`crate::convolution`]. Both clamp at borders.
    pub fn gradients(&self, gray: &GrayImage) -> (ScalarMap, ScalarMap) {
        if self.aperture_size == 3 {
            (
                gradient_to_map(&horizontal_sobel(gray)),
                gradient_to_map(&vertical_sobel(gray)),
            )
        } else {
            sobel_xy(&gray_to_map(gray), self.aperture_size)
        }
    }

    /// Response of an already single-channel image
    pub fn build_from_gray(&self, gray: &GrayImage) -> ResponseMap {
        let (mut ix, mut iy) = self.gradients(gray);

        let scale = 1.0 / ((1u32 << (self.aperture_size - 1)) as f32 * self.block_size as f32 * 255.0);
        ix.as_mut_slice().par_iter_mut().for_each(|v| *v *= scale);
        iy.as_mut_slice().par_iter_mut().for_each(|v| *v *= scale);

        let (w, h) = (ix.width(), ix.height());
        let mut ixx = ScalarMap::new(w, h);
        let mut iyy = ScalarMap::new(w, h);
        let mut ixy = ScalarMap::new(w, h);
        for (i, (&gx, &gy)) in ix.as_slice().iter().zip(iy.as_slice()).enumerate() {
            ixx.as_mut_slice()[i] = gx * gx;
            iyy.as_mut_slice()[i] = gy * gy;
            ixy.as_mut_slice()[i] = gx * gy;
        }

        let window = box_kernel(self.block_size);
        let sxx = convolve_separable(&ixx, &window, &window);
        let syy = convolve_separable(&iyy, &window, &window);
        let sxy = convolve_separable(&ixy, &window, &window);

        let k = self.k as f64;
        let mut response = ScalarMap::new(w, h);
        response
            .as_mut_slice()
            .par_iter_mut()
            .zip(sxx.as_slice().par_iter())
            .zip(syy.as_slice().par_iter())
            .zip(sxy.as_slice().par_iter())
            .for_each(|(((r, &a), &b), &c)| {
                let (a, b, c) = (a as f64, b as f64, c as f64);
                let det = a * b - c * c;
                let trace = a + b;
                *r = (det - k * trace * trace) as f32;
            });

        if log::log_enabled!(log::Level::Debug) {
            if let Some((lo, hi)) = response.min_max() {
                debug!("ResponseMapBuilder: {}x{} response range [{:.3e}, {:.3e}]", w, h, lo, hi);
            }
        }
        response
    }
}
