//! Error diffusion dithering to a black and white image.
//!
//! The source is gamma corrected through a 256-entry lookup table, then
//! each channel is thresholded at [`THRESHOLD_HALF`]. The quantization
//! error of every sample is pushed forward into samples that have not been
//! visited yet, using one of two kernels:
//!
//! ```text
//! Floyd-Steinberg (/16)      Jarvis-Judice-Ninke (/48)
//!        X   7                        X   7   5
//!    3   5   1                3   5   7   5   3
//!                             1   3   5   3   1
//! ```
//!
//! Rows that are still receiving error are held in a [`RowWindowBuffer`]
//! with one row per kernel row and enough padding for the kernel's
//! horizontal reach. Error that lands in the padding columns is dropped.
//!
//! With serpentine scanning, odd rows are traversed right to left and the
//! kernel is mirrored so error always flows in scan direction.

use ndarray::{Array3, ArrayView3};
use tracing::{debug, trace};

use super::for_each_channel;
use super::params::{validate_gamma, DiffusionMethod, DiffusionParams};
use super::window::RowWindowBuffer;
use crate::error::FilterError;
use crate::image::{Image, SAMPLE_MAX, THRESHOLD_HALF};

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`: a neighbor `dx` columns ahead in scan
/// direction and `dy` rows below receives `error * weight / divisor`.
#[derive(Debug, Clone, Copy)]
pub struct DiffusionKernel {
    pub entries: &'static [(isize, usize, i32)],
    pub divisor: i32,
    /// Rows held in the window: current row plus rows reached by `dy`.
    pub rows: usize,
    /// Horizontal reach of the kernel, used as buffer padding.
    pub pad: usize,
}

impl DiffusionKernel {
    /// Weight of entry `index` as a fraction of the error.
    ///
    /// # Panics
    /// If `index >= entries.len()`.
    pub fn weight(&self, index: usize) -> f64 {
        self.entries[index].2 as f64 / self.divisor as f64
    }

    /// Sum of all integer weights; equals `divisor` for full propagation.
    pub fn weight_sum(&self) -> i32 {
        self.entries.iter().map(|&(_, _, w)| w).sum()
    }
}

/// Floyd-Steinberg kernel: 4 neighbors over 2 rows, 16/16 propagated.
pub const FLOYD_STEINBERG: DiffusionKernel = DiffusionKernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    rows: 2,
    pad: 1,
};

/// Jarvis-Judice-Ninke kernel: 12 neighbors over 3 rows, 48/48 propagated.
pub const JARVIS_JUDICE_NINKE: DiffusionKernel = DiffusionKernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
    rows: 3,
    pad: 2,
};

impl DiffusionMethod {
    pub fn kernel(self) -> &'static DiffusionKernel {
        match self {
            DiffusionMethod::FloydSteinberg => &FLOYD_STEINBERG,
            DiffusionMethod::JarvisJudiceNinke => &JARVIS_JUDICE_NINKE,
        }
    }
}

// ============================================================================
// Gamma
// ============================================================================

/// Build the gamma lookup table `round(255 * (i / 255)^(1 / gamma))`.
pub fn gamma_lut(gamma: f64) -> Result<[u8; 256], FilterError> {
    validate_gamma(gamma)?;
    let max = SAMPLE_MAX as f64;
    let exponent = 1.0 / gamma;

    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let corrected = max * (i as f64 / max).powf(exponent);
        *entry = corrected.round().clamp(0.0, max) as u8;
    }
    Ok(lut)
}

/// Apply the gamma lookup table to every sample of every channel.
pub fn gamma_correct(src: &Image, gamma: f64) -> Result<Image, FilterError> {
    let lut = gamma_lut(gamma)?;
    let mut dst = src.duplicate_header()?;
    for (out, &v) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
        *out = lut[v as usize];
    }
    Ok(dst)
}

// ============================================================================
// Diffusion
// ============================================================================

/// Dither one gamma-corrected plane into `out`.
pub(crate) fn diffuse_plane(
    plane: &[u8],
    width: usize,
    height: usize,
    kernel: &DiffusionKernel,
    serpentine: bool,
    out: &mut [u8],
) -> Result<(), FilterError> {
    let pad = kernel.pad;
    let mut window = RowWindowBuffer::<i32>::new(plane, width, height, kernel.rows, pad)?;

    for logical in 0..kernel.rows - 1 {
        window.load_row(logical as isize);
    }

    for y in 0..height {
        window.load_row((y + kernel.rows - 1) as isize);

        let reverse = serpentine && y % 2 == 1;
        let row_out = &mut out[y * width..(y + 1) * width];

        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let col = x + pad;

            let value = window.row_at(0)[col];
            let emitted = if (value as f64) < THRESHOLD_HALF { 0 } else { SAMPLE_MAX };
            row_out[x] = emitted;

            let error = value - emitted as i32;
            if error == 0 {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                let dx = if reverse { -dx } else { dx };
                let target = col as isize + dx;
                if target < 0 {
                    continue;
                }
                if let Some(cell) = window.row_at_mut(dy).get_mut(target as usize) {
                    let share = (error * weight) as f64 / kernel.divisor as f64;
                    *cell = (*cell as f64 + share) as i32;
                }
            }
        }
    }

    Ok(())
}

/// Dither `src` into the pre-allocated `dst`; every output sample is 0 or 255.
pub fn error_diffusion_into(
    src: &Image,
    dst: &mut Image,
    params: &DiffusionParams,
) -> Result<(), FilterError> {
    let params = params.normalized()?;
    src.same_shape(dst)?;

    debug!(
        width = src.width(),
        height = src.height(),
        channels = src.channel_count(),
        method = ?params.method,
        serpentine = params.serpentine,
        gamma = params.gamma,
        "error diffusion"
    );

    let corrected = gamma_correct(src, params.gamma)?;
    let kernel = params.method.kernel();
    let (width, height) = (src.width(), src.height());

    for_each_channel(&corrected, dst, |c, plane, out| {
        trace!(channel = c, "error diffusion channel");
        diffuse_plane(plane, width, height, kernel, params.serpentine, out)
    })
}

/// Dither `src` into a newly allocated image of the same shape.
pub fn error_diffusion(src: &Image, params: &DiffusionParams) -> Result<Image, FilterError> {
    let mut dst = src.duplicate_header()?;
    error_diffusion_into(src, &mut dst, params)?;
    Ok(dst)
}

/// Apply error diffusion dithering - u8 version.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `method` - 0 for Floyd-Steinberg, 1 for Jarvis-Judice-Ninke
/// * `serpentine` - Alternate scan direction on odd rows
/// * `gamma` - Gamma correction applied before dithering (> 0)
///
/// # Returns
/// Binary (0/255) image with same shape
pub fn error_diffusion_u8(
    input: ArrayView3<u8>,
    method: i32,
    serpentine: bool,
    gamma: f64,
) -> Result<Array3<u8>, FilterError> {
    let params = DiffusionParams::new(DiffusionMethod::from_index(method)?, serpentine, gamma);
    let image = Image::from_interleaved(input)?;
    let result = error_diffusion(&image, &params)?;
    Ok(result.to_interleaved())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Image {
        let data = (0..width * height)
            .map(|i| ((i % width) * 255 / (width - 1)) as u8)
            .collect();
        Image::from_gray(width, height, data).unwrap()
    }

    #[test]
    fn test_floyd_steinberg_weights_sum_to_one() {
        assert_eq!(FLOYD_STEINBERG.entries.len(), 4);
        assert_eq!(FLOYD_STEINBERG.weight_sum(), FLOYD_STEINBERG.divisor);
        let total: f64 = (0..4).map(|i| FLOYD_STEINBERG.weight(i)).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_jjn_weights_sum_to_one() {
        assert_eq!(JARVIS_JUDICE_NINKE.entries.len(), 12);
        assert_eq!(JARVIS_JUDICE_NINKE.weight_sum(), JARVIS_JUDICE_NINKE.divisor);
        let total: f64 = (0..12).map(|i| JARVIS_JUDICE_NINKE.weight(i)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_weight_out_of_range_panics() {
        FLOYD_STEINBERG.weight(4);
    }

    #[test]
    fn test_kernel_reach_fits_window() {
        for kernel in [&FLOYD_STEINBERG, &JARVIS_JUDICE_NINKE] {
            for &(dx, dy, _) in kernel.entries {
                assert!(dx.unsigned_abs() <= kernel.pad);
                assert!(dy < kernel.rows);
                // error only flows forward
                assert!(dy > 0 || dx > 0);
            }
        }
    }

    #[test]
    fn test_gamma_lut_boundaries() {
        for gamma in [0.1, 0.45, 1.0, 2.2, 10.0] {
            let lut = gamma_lut(gamma).unwrap();
            assert_eq!(lut[0], 0, "gamma {}", gamma);
            assert_eq!(lut[255], 255, "gamma {}", gamma);
        }
    }

    #[test]
    fn test_gamma_lut_identity_and_rounding() {
        let lut = gamma_lut(1.0).unwrap();
        assert!(lut.iter().enumerate().all(|(i, &v)| v as usize == i));

        // 255 * (64/255)^(1/2) = 127.75...
        let lut = gamma_lut(2.0).unwrap();
        assert_eq!(lut[64], 128);
    }

    #[test]
    fn test_gamma_lut_rejects_non_positive() {
        assert!(gamma_lut(0.0).is_err());
        assert!(gamma_lut(-2.2).is_err());
    }

    #[test]
    fn test_output_is_binary() {
        let image = gradient(17, 9);
        for method in [DiffusionMethod::FloydSteinberg, DiffusionMethod::JarvisJudiceNinke] {
            for serpentine in [false, true] {
                let params = DiffusionParams::new(method, serpentine, 2.2);
                let result = error_diffusion(&image, &params).unwrap();
                assert!(result.as_slice().iter().all(|&v| v == 0 || v == 255));
            }
        }
    }

    #[test]
    fn test_extremes_pass_through() {
        let black = Image::from_gray(5, 3, vec![0; 15]).unwrap();
        let white = Image::from_gray(5, 3, vec![255; 15]).unwrap();
        let params = DiffusionParams::default().with_method(DiffusionMethod::JarvisJudiceNinke);
        assert_eq!(error_diffusion(&black, &params).unwrap(), black);
        assert_eq!(error_diffusion(&white, &params).unwrap(), white);
    }

    #[test]
    fn test_floyd_steinberg_single_row() {
        // 100 -> 0, error 100; right neighbor gets 43 -> 143 -> 255, error -112;
        // next gets 100 - 49 = 51 -> 0, error 51; last gets 100 + 22 = 122 -> 0
        let image = Image::from_gray(4, 1, vec![100; 4]).unwrap();
        let result = error_diffusion(&image, &DiffusionParams::default()).unwrap();
        assert_eq!(result.channel(0), &[0, 255, 0, 0]);
    }

    #[test]
    fn test_serpentine_differs_from_raster() {
        // Row 1 traverses right to left under serpentine, so its errors are
        // mirrored and the second row dithers differently.
        let image = Image::from_gray(4, 2, vec![100, 100, 100, 100, 60, 90, 120, 150]).unwrap();

        let raster = error_diffusion(&image, &DiffusionParams::default()).unwrap();
        let serpentine =
            error_diffusion(&image, &DiffusionParams::default().with_serpentine(true)).unwrap();

        assert_eq!(raster.channel(0), &[0, 255, 0, 0, 0, 0, 255, 255]);
        assert_eq!(serpentine.channel(0), &[0, 255, 0, 0, 0, 0, 0, 255]);
        assert_eq!(&raster.channel(0)[..4], &serpentine.channel(0)[..4]);
    }

    #[test]
    fn test_mid_gray_mixes_black_and_white() {
        let image = Image::from_gray(8, 8, vec![128; 64]).unwrap();
        let params = DiffusionParams::default().with_method(DiffusionMethod::JarvisJudiceNinke);
        let result = error_diffusion(&image, &params).unwrap();
        let white = result.as_slice().iter().filter(|&&v| v == 255).count();
        assert!(white > 16 && white < 48, "white count {}", white);
    }

    #[test]
    fn test_invalid_gamma_rejected_before_output() {
        let image = gradient(4, 4);
        let mut dst = image.duplicate_header().unwrap();
        let params = DiffusionParams::default().with_gamma(0.0);
        let err = error_diffusion_into(&image, &mut dst, &params).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { name: "gamma", .. }));
        assert!(dst.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_error_diffusion_u8_rejects_method() {
        let img = Array3::<u8>::zeros((2, 2, 1));
        let err = error_diffusion_u8(img.view(), 2, false, 1.0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { name: "method", .. }));
    }
}
