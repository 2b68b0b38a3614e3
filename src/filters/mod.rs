//! Neighborhood filters for 8-bit images.
//!
//! ## Filters
//!
//! | Filter | Entry point | Neighborhood |
//! |--------|-------------|--------------|
//! | Box blur | [`blur::box_blur`] | `w x h` mean, separable |
//! | Median | [`median::median`] | `n x n` order statistic, n <= 9 |
//! | Error diffusion | [`dither::error_diffusion`] | Floyd-Steinberg or Jarvis-Judice-Ninke |
//! | Sharpen | [`sharpen::sharpen`] | unsharp mask over a box blur |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Border replication** - samples outside the image repeat the nearest edge sample
//! - **Row streaming** - median and error diffusion keep only a window of padded rows
//!   ([`window::RowWindowBuffer`]), never a padded copy of the whole image
//! - **Validate first** - parameters and shapes are checked before any output is written
//! - **Per-channel** - channels never influence each other; they are processed in
//!   parallel with rayon and the result is identical to a sequential run
//!
//! Every filter has an `*_into` form writing into a caller-allocated image,
//! a form returning a new image, and a `*_u8` form for interleaved
//! `(height, width, channels)` arrays.

use rayon::prelude::*;

use crate::error::FilterError;
use crate::image::Image;

pub mod blur;
pub mod dither;
pub mod median;
pub mod params;
pub mod sharpen;
pub mod window;

pub use blur::{blur_line, box_blur, box_blur_into, box_blur_u8};
pub use dither::{
    error_diffusion, error_diffusion_into, error_diffusion_u8, gamma_correct, gamma_lut,
    DiffusionKernel, FLOYD_STEINBERG, JARVIS_JUDICE_NINKE,
};
pub use median::{median, median_into, median_of_window, median_u8};
pub use params::{
    BlurParams, DiffusionMethod, DiffusionParams, MedianParams, SharpenParams, MAX_MEDIAN_SIZE,
};
pub use sharpen::{sharpen, sharpen_into, sharpen_u8};
pub use window::RowWindowBuffer;

/// Run `f(channel, source_plane, output_plane)` for every channel.
///
/// Planes are handed out in channel order; each call only sees its own
/// planes, so running them on the rayon pool cannot change the result.
pub(crate) fn for_each_channel<F>(src: &Image, dst: &mut Image, f: F) -> Result<(), FilterError>
where
    F: Fn(usize, &[u8], &mut [u8]) -> Result<(), FilterError> + Sync + Send,
{
    src.same_shape(dst)?;
    let plane = src.plane_len();

    dst.as_mut_slice()
        .par_chunks_exact_mut(plane)
        .zip(src.as_slice().par_chunks_exact(plane))
        .enumerate()
        .try_for_each(|(c, (out, input))| f(c, input, out))
}
