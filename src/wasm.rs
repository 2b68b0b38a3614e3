//! WebAssembly exports for the raster filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! passed as flat interleaved bytes (length = width * height * channels),
//! the layout of canvas `ImageData` when `channels` is 4.

use ndarray::{Array3, ArrayView3};
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::{box_blur_u8, error_diffusion_u8, median_u8, sharpen_u8};

fn view<'a>(
    data: &'a [u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<ArrayView3<'a, u8>, JsError> {
    ArrayView3::from_shape((height, width, channels), data).map_err(|_| {
        JsError::from(FilterError::ShapeMismatch {
            expected: (channels, height, width),
            actual: (1, 1, data.len()),
        })
    })
}

fn into_bytes(result: Array3<u8>) -> Vec<u8> {
    result.into_raw_vec_and_offset().0
}

// ============================================================================
// Blur
// ============================================================================

/// Box blur with a `kernel_width x kernel_height` kernel.
#[wasm_bindgen]
pub fn box_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_width: usize,
    kernel_height: usize,
) -> Result<Vec<u8>, JsError> {
    let input = view(data, width, height, channels)?;
    Ok(into_bytes(box_blur_u8(input, kernel_width, kernel_height)?))
}

// ============================================================================
// Median
// ============================================================================

/// Median filter with a `size x size` window (forced odd, clamped to 9).
#[wasm_bindgen]
pub fn median_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    size: usize,
) -> Result<Vec<u8>, JsError> {
    let input = view(data, width, height, channels)?;
    Ok(into_bytes(median_u8(input, size)?))
}

// ============================================================================
// Error Diffusion
// ============================================================================

/// Dither to black and white (method 0 = Floyd-Steinberg, 1 = Jarvis-Judice-Ninke).
#[wasm_bindgen]
pub fn error_diffusion_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    method: i32,
    serpentine: bool,
    gamma: f64,
) -> Result<Vec<u8>, JsError> {
    let input = view(data, width, height, channels)?;
    Ok(into_bytes(error_diffusion_u8(input, method, serpentine, gamma)?))
}

// ============================================================================
// Sharpen
// ============================================================================

/// Unsharp mask over a `size x size` box blur.
#[wasm_bindgen]
pub fn sharpen_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    size: usize,
    factor: f64,
) -> Result<Vec<u8>, JsError> {
    let input = view(data, width, height, channels)?;
    Ok(into_bytes(sharpen_u8(input, size, factor)?))
}
