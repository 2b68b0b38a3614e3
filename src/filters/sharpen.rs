//! Unsharp mask sharpening.
//!
//! The box blur is used as a low-pass image; the detail it removes is
//! amplified by `factor` and added back:
//!
//! ```text
//! out = clip(factor * (src - blurred) + src, 0, 255)
//! ```

use ndarray::{Array3, ArrayView3};
use tracing::debug;

use super::blur::box_blur;
use super::params::{BlurParams, SharpenParams};
use crate::error::FilterError;
use crate::image::{Image, SAMPLE_MAX};

/// Sharpen a single sample against its blurred value.
///
/// The unclipped result is truncated toward zero before saturating.
#[inline]
pub fn unsharp_sample(source: u8, blurred: u8, factor: f64) -> u8 {
    let detail = source as i32 - blurred as i32;
    let value = (factor * detail as f64 + source as f64) as i32;
    value.clamp(0, SAMPLE_MAX as i32) as u8
}

/// Sharpen `src` into the pre-allocated `dst`.
///
/// A blur size of 1 cannot separate any detail, so the source is copied.
pub fn sharpen_into(src: &Image, dst: &mut Image, params: &SharpenParams) -> Result<(), FilterError> {
    let params = params.normalized()?;
    src.same_shape(dst)?;

    debug!(
        width = src.width(),
        height = src.height(),
        channels = src.channel_count(),
        size = params.size,
        factor = params.factor,
        "sharpen"
    );

    if params.size == 1 {
        dst.as_mut_slice().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let blurred = box_blur(src, &BlurParams::square(params.size))?;
    for ((out, &s), &b) in dst
        .as_mut_slice()
        .iter_mut()
        .zip(src.as_slice())
        .zip(blurred.as_slice())
    {
        *out = unsharp_sample(s, b, params.factor);
    }

    Ok(())
}

/// Sharpen `src` into a newly allocated image of the same shape.
pub fn sharpen(src: &Image, params: &SharpenParams) -> Result<Image, FilterError> {
    let mut dst = src.duplicate_header()?;
    sharpen_into(src, &mut dst, params)?;
    Ok(dst)
}

/// Apply unsharp mask - u8 version.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `size` - Box blur size (forced odd, 1 = no sharpening)
/// * `factor` - Detail gain (0.0 = no change)
///
/// # Returns
/// Sharpened image with same shape
pub fn sharpen_u8(input: ArrayView3<u8>, size: usize, factor: f64) -> Result<Array3<u8>, FilterError> {
    let image = Image::from_interleaved(input)?;
    let result = sharpen(&image, &SharpenParams::new(size, factor))?;
    Ok(result.to_interleaved())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Image {
        let data = (0..49u32).map(|i| ((i * 29) % 256) as u8).collect();
        Image::from_gray(7, 7, data).unwrap()
    }

    #[test]
    fn test_size_one_passthrough() {
        let image = ramp();
        for factor in [0.0, 1.0, 5.0, -3.0] {
            let result = sharpen(&image, &SharpenParams::new(1, factor)).unwrap();
            assert_eq!(result, image);
        }
    }

    #[test]
    fn test_zero_factor_passthrough() {
        let image = ramp();
        for size in [3, 5, 9] {
            let result = sharpen(&image, &SharpenParams::new(size, 0.0)).unwrap();
            assert_eq!(result, image, "size {}", size);
        }
    }

    #[test]
    fn test_large_factor_saturates() {
        let mut data = vec![100u8; 25];
        data[12] = 200;
        data[6] = 10;
        let image = Image::from_gray(5, 5, data).unwrap();
        let result = sharpen(&image, &SharpenParams::new(3, 50.0)).unwrap();

        assert_eq!(result.get(0, 2, 2), 255);
        assert_eq!(result.get(0, 1, 1), 0);
    }

    #[test]
    fn test_unsharp_sample() {
        assert_eq!(unsharp_sample(120, 100, 1.0), 140);
        assert_eq!(unsharp_sample(80, 100, 1.0), 60);
        // 0.5 * -5 + 80 = 77.5 truncates to 77
        assert_eq!(unsharp_sample(80, 85, 0.5), 77);
        assert_eq!(unsharp_sample(250, 100, 1.0), 255);
        assert_eq!(unsharp_sample(5, 100, 1.0), 0);
    }

    #[test]
    fn test_flat_image_unchanged() {
        let image = Image::from_planes(4, 4, 3, vec![60; 48]).unwrap();
        let result = sharpen(&image, &SharpenParams::new(5, 3.0)).unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn test_edge_contrast_increases() {
        let data: Vec<u8> = (0..36).map(|i| if i % 6 < 3 { 80 } else { 160 }).collect();
        let image = Image::from_gray(6, 6, data).unwrap();
        let result = sharpen(&image, &SharpenParams::new(3, 1.0)).unwrap();
        // dark side of the edge gets darker, bright side brighter
        assert!(result.get(0, 2, 3) < 80);
        assert!(result.get(0, 3, 3) > 160);
        // far from the edge nothing changes
        assert_eq!(result.get(0, 0, 3), 80);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let image = ramp();
        assert!(sharpen(&image, &SharpenParams::new(0, 1.0)).is_err());
        assert!(sharpen(&image, &SharpenParams::new(3, f64::NAN)).is_err());
    }

    #[test]
    fn test_sharpen_u8_interleaved() {
        let mut img = Array3::<u8>::zeros((3, 3, 3));
        img.fill(50);
        img[[1, 1, 2]] = 140;

        let result = sharpen_u8(img.view(), 3, 1.0).unwrap();

        assert_eq!(result[[1, 1, 0]], 50);
        // blurred center: horizontal (50+140+50)/3 = 80, vertical (50+80+50)/3 = 60
        assert_eq!(result[[1, 1, 2]], 220);
    }
}
