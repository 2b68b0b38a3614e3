//! Separable box blur.
//!
//! Each channel is blurred horizontally, then the intermediate plane is
//! blurred vertically with the same 1-D sliding-sum routine. The only
//! difference between the two passes is the stride between consecutive
//! samples: 1 along a row, `width` down a column.
//!
//! Borders are replicated outward, so uniform regions keep their value
//! right up to the edge.

use ndarray::{Array3, ArrayView3};
use tracing::{debug, trace};

use super::for_each_channel;
use super::params::BlurParams;
use crate::error::{try_filled, FilterError};
use crate::image::Image;

/// Blur one line of `len` samples with an odd window of `window` samples.
///
/// Sample `i` of the line is read from `src[start + i * stride]` and its
/// result is written to `dst[start + i * stride]`. `padded` is scratch
/// space reused between calls; it is resized to `len + window - 1`.
///
/// The mean is truncated toward zero.
pub fn blur_line(
    src: &[u8],
    start: usize,
    len: usize,
    stride: usize,
    window: usize,
    padded: &mut Vec<i64>,
    dst: &mut [u8],
) {
    debug_assert!(window % 2 == 1, "window must be odd");
    if len == 0 {
        return;
    }
    let pad = window / 2;

    let first = src[start] as i64;
    let last = src[start + (len - 1) * stride] as i64;

    padded.clear();
    padded.extend(std::iter::repeat(first).take(pad));
    padded.extend((0..len).map(|i| src[start + i * stride] as i64));
    padded.extend(std::iter::repeat(last).take(pad));

    let mut sum: i64 = padded[..window].iter().sum();
    let divisor = window as i64;

    for i in 0..len {
        dst[start + i * stride] = (sum / divisor) as u8;
        if i + 1 < len {
            sum += padded[i + window] - padded[i];
        }
    }
}

/// Blur a single `width x height` plane into `out`.
pub(crate) fn blur_plane(
    plane: &[u8],
    width: usize,
    height: usize,
    params: &BlurParams,
    out: &mut [u8],
) -> Result<(), FilterError> {
    let mut scratch = Vec::new();
    scratch.try_reserve_exact(width.max(height) + params.width.max(params.height))?;

    // Horizontal pass
    let mut temp = try_filled(plane.len(), 0u8)?;
    if params.width == 1 {
        temp.copy_from_slice(plane);
    } else {
        for y in 0..height {
            blur_line(plane, y * width, width, 1, params.width, &mut scratch, &mut temp);
        }
    }

    // Vertical pass
    if params.height == 1 {
        out.copy_from_slice(&temp);
    } else {
        for x in 0..width {
            blur_line(&temp, x, height, width, params.height, &mut scratch, out);
        }
    }

    Ok(())
}

/// Box blur `src` into the pre-allocated `dst`.
///
/// Kernel dimensions are forced odd. A dimension of 1 copies along that
/// axis. `dst` must have the same shape as `src`.
pub fn box_blur_into(src: &Image, dst: &mut Image, params: &BlurParams) -> Result<(), FilterError> {
    let params = params.normalized()?;
    src.same_shape(dst)?;

    debug!(
        width = src.width(),
        height = src.height(),
        channels = src.channel_count(),
        kernel_width = params.width,
        kernel_height = params.height,
        "box blur"
    );

    let (width, height) = (src.width(), src.height());
    for_each_channel(src, dst, |c, plane, out| {
        trace!(channel = c, "box blur channel");
        blur_plane(plane, width, height, &params, out)
    })
}

/// Box blur `src` into a newly allocated image of the same shape.
pub fn box_blur(src: &Image, params: &BlurParams) -> Result<Image, FilterError> {
    let mut dst = src.duplicate_header()?;
    box_blur_into(src, &mut dst, params)?;
    Ok(dst)
}

/// Box blur an interleaved image - u8 version.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `kernel_width` - Horizontal kernel size (forced odd)
/// * `kernel_height` - Vertical kernel size (forced odd)
///
/// # Returns
/// Blurred image with same shape
pub fn box_blur_u8(
    input: ArrayView3<u8>,
    kernel_width: usize,
    kernel_height: usize,
) -> Result<Array3<u8>, FilterError> {
    let image = Image::from_interleaved(input)?;
    let result = box_blur(&image, &BlurParams::new(kernel_width, kernel_height))?;
    Ok(result.to_interleaved())
}
