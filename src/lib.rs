//! Raster Filters
//!
//! Streaming neighborhood filters for 8-bit images: separable box blur,
//! median filtering, error diffusion dithering and unsharp-mask sharpening,
//! with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Filters work on [`Image`], a planar raster of 8-bit samples with any
//! number of channels. Each channel is filtered on its own; filters never
//! mix channels. Interleaved `(height, width, channels)` arrays, as used by
//! numpy and canvas buffers, convert through [`Image::from_interleaved`]
//! and [`Image::to_interleaved`], and every filter has a `*_u8` variant
//! taking such an array directly.
//!
//! ## Example
//! ```
//! use raster_filters::{box_blur, BlurParams, Image};
//!
//! let image = Image::from_gray(4, 1, vec![255, 0, 255, 0])?;
//! let blurred = box_blur(&image, &BlurParams::new(3, 1))?;
//! assert_eq!(blurred.channel(0), &[170, 170, 85, 85]);
//! # Ok::<(), raster_filters::FilterError>(())
//! ```

pub mod error;
pub mod filters;
pub mod image;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::FilterError;
pub use filters::{
    box_blur, box_blur_into, error_diffusion, error_diffusion_into, median, median_into,
    sharpen, sharpen_into, BlurParams, DiffusionMethod, DiffusionParams, MedianParams,
    SharpenParams,
};
pub use image::{Image, SAMPLE_MAX, THRESHOLD_HALF};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::{box_blur_u8, error_diffusion_u8, median_u8, sharpen_u8};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    // ========================================================================
    // Blur
    // ========================================================================

    /// Box blur with a `width x height` kernel (sizes forced odd).
    #[pyfunction]
    #[pyo3(signature = (image, width=3, height=3))]
    pub fn box_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        width: usize,
        height: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = box_blur_u8(image.as_array(), width, height)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Median
    // ========================================================================

    /// Median filter with a `size x size` window (forced odd, clamped to 9).
    #[pyfunction]
    #[pyo3(signature = (image, size=3))]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        size: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = median_u8(image.as_array(), size)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Error Diffusion
    // ========================================================================

    /// Dither to black and white.
    ///
    /// `method` is 0 for Floyd-Steinberg, 1 for Jarvis-Judice-Ninke.
    #[pyfunction]
    #[pyo3(signature = (image, method=0, serpentine=false, gamma=1.0))]
    pub fn error_diffusion<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        method: i32,
        serpentine: bool,
        gamma: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = error_diffusion_u8(image.as_array(), method, serpentine, gamma)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Sharpen
    // ========================================================================

    /// Unsharp mask over a `size x size` box blur.
    #[pyfunction]
    #[pyo3(signature = (image, size=3, factor=1.0))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        size: usize,
        factor: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = sharpen_u8(image.as_array(), size, factor)?;
        Ok(result.into_pyarray(py))
    }

    #[pymodule]
    pub fn raster_filters(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(box_blur, m)?)?;
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(error_diffusion, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::raster_filters;
