//! Median (order-statistic) filter.
//!
//! Removes salt-and-pepper noise while preserving edges. The window is
//! `size x size` (forced odd, clamped to 9) and borders are replicated on
//! all four sides through a [`RowWindowBuffer`] holding `size` rows.
//!
//! Each output sample gathers, sorts and indexes its window from scratch.
//! At window sizes up to 9 this is fast enough that no running histogram is
//! kept.

use ndarray::{Array3, ArrayView3};
use tracing::{debug, trace};

use super::for_each_channel;
use super::params::MedianParams;
use super::window::RowWindowBuffer;
use crate::error::FilterError;
use crate::image::Image;

/// Median of the `size x size` window whose left edge is padded column `x`.
///
/// `values` is scratch space, cleared before use.
pub fn median_of_window(
    window: &RowWindowBuffer<'_, i16>,
    x: usize,
    size: usize,
    values: &mut Vec<i16>,
) -> u8 {
    values.clear();
    for offset in 0..window.rows() {
        values.extend_from_slice(&window.row_at(offset)[x..x + size]);
    }
    values.sort_unstable();
    values[(size * size) / 2] as u8
}

/// Median filter a single `width x height` plane into `out`.
pub(crate) fn median_plane(
    plane: &[u8],
    width: usize,
    height: usize,
    size: usize,
    out: &mut [u8],
) -> Result<(), FilterError> {
    let pad = size / 2;
    let mut window = RowWindowBuffer::<i16>::new(plane, width, height, size, pad)?;

    let mut values = Vec::new();
    values.try_reserve_exact(size * size)?;

    // Rows above the image are copies of row 0
    for logical in -(pad as isize)..pad as isize {
        window.load_row(logical);
    }

    for y in 0..height {
        window.load_row((y + pad) as isize);
        let row = &mut out[y * width..(y + 1) * width];
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = median_of_window(&window, x, size, &mut values);
        }
    }

    Ok(())
}

/// Median filter `src` into the pre-allocated `dst`.
///
/// The window size is forced odd and clamped to
/// [`MAX_MEDIAN_SIZE`](super::params::MAX_MEDIAN_SIZE); zero is rejected.
pub fn median_into(src: &Image, dst: &mut Image, params: &MedianParams) -> Result<(), FilterError> {
    let params = params.normalized()?;
    src.same_shape(dst)?;

    debug!(
        width = src.width(),
        height = src.height(),
        channels = src.channel_count(),
        size = params.size,
        "median filter"
    );

    let (width, height) = (src.width(), src.height());
    for_each_channel(src, dst, |c, plane, out| {
        trace!(channel = c, "median channel");
        median_plane(plane, width, height, params.size, out)
    })
}

/// Median filter `src` into a newly allocated image of the same shape.
pub fn median(src: &Image, params: &MedianParams) -> Result<Image, FilterError> {
    let mut dst = src.duplicate_header()?;
    median_into(src, &mut dst, params)?;
    Ok(dst)
}

/// Apply median filter - u8 version.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `size` - Window edge length (forced odd, clamped to 9)
///
/// # Returns
/// Median-filtered image with same shape
pub fn median_u8(input: ArrayView3<u8>, size: usize) -> Result<Array3<u8>, FilterError> {
    let image = Image::from_interleaved(input)?;
    let result = median(&image, &MedianParams::new(size))?;
    Ok(result.to_interleaved())
}
