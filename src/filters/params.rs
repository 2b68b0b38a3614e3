//! Filter parameters and their normalization.
//!
//! Each engine takes one of these structs. `normalized()` applies the
//! documented adjustments (odd kernel sizes, median clamp) and rejects
//! values that cannot be normalized, before any image data is touched.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Largest median window edge; larger requests are clamped to this.
pub const MAX_MEDIAN_SIZE: usize = 9;

/// Round an even kernel size up to the next odd value.
pub fn force_odd(size: usize) -> usize {
    if size % 2 == 0 {
        size + 1
    } else {
        size
    }
}

fn positive_size(name: &'static str, size: usize) -> Result<usize, FilterError> {
    if size == 0 {
        return Err(FilterError::invalid(name, "kernel size must be at least 1"));
    }
    Ok(force_odd(size))
}

// ============================================================================
// Box blur
// ============================================================================

/// Box blur kernel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlurParams {
    pub width: usize,
    pub height: usize,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            width: 3,
            height: 3,
        }
    }
}

impl BlurParams {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Square kernel.
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Both dimensions forced odd; zero is rejected.
    pub fn normalized(&self) -> Result<Self, FilterError> {
        Ok(Self {
            width: positive_size("width", self.width)?,
            height: positive_size("height", self.height)?,
        })
    }
}

// ============================================================================
// Median
// ============================================================================

/// Median window edge length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MedianParams {
    pub size: usize,
}

impl Default for MedianParams {
    fn default() -> Self {
        Self { size: 3 }
    }
}

impl MedianParams {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Size forced odd, then clamped to [`MAX_MEDIAN_SIZE`].
    pub fn normalized(&self) -> Result<Self, FilterError> {
        let size = positive_size("size", self.size)?;
        Ok(Self {
            size: size.min(MAX_MEDIAN_SIZE),
        })
    }
}

// ============================================================================
// Error diffusion
// ============================================================================

/// Error diffusion weight kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiffusionMethod {
    /// Floyd-Steinberg, 4 neighbors over 2 rows.
    #[default]
    FloydSteinberg,
    /// Jarvis-Judice-Ninke, 12 neighbors over 3 rows.
    JarvisJudiceNinke,
}

impl DiffusionMethod {
    /// Map the numeric selector: 0 is Floyd-Steinberg, 1 is Jarvis-Judice-Ninke.
    pub fn from_index(index: i32) -> Result<Self, FilterError> {
        match index {
            0 => Ok(DiffusionMethod::FloydSteinberg),
            1 => Ok(DiffusionMethod::JarvisJudiceNinke),
            other => Err(FilterError::invalid(
                "method",
                format!("expected 0 (Floyd-Steinberg) or 1 (Jarvis-Judice-Ninke), got {}", other),
            )),
        }
    }

    pub fn index(self) -> i32 {
        match self {
            DiffusionMethod::FloydSteinberg => 0,
            DiffusionMethod::JarvisJudiceNinke => 1,
        }
    }
}

impl TryFrom<i32> for DiffusionMethod {
    type Error = FilterError;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

/// Error diffusion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffusionParams {
    pub method: DiffusionMethod,
    /// Alternate scan direction on odd rows.
    pub serpentine: bool,
    /// Gamma applied through a lookup table before dithering.
    pub gamma: f64,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            method: DiffusionMethod::FloydSteinberg,
            serpentine: false,
            gamma: 1.0,
        }
    }
}

impl DiffusionParams {
    pub fn new(method: DiffusionMethod, serpentine: bool, gamma: f64) -> Self {
        Self {
            method,
            serpentine,
            gamma,
        }
    }

    pub fn with_method(mut self, method: DiffusionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_serpentine(mut self, serpentine: bool) -> Self {
        self.serpentine = serpentine;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Gamma must be finite and positive.
    pub fn normalized(&self) -> Result<Self, FilterError> {
        validate_gamma(self.gamma)?;
        Ok(*self)
    }
}

pub(crate) fn validate_gamma(gamma: f64) -> Result<(), FilterError> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(FilterError::invalid(
            "gamma",
            format!("must be a positive finite number, got {}", gamma),
        ));
    }
    Ok(())
}

// ============================================================================
// Sharpen
// ============================================================================

/// Unsharp mask settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SharpenParams {
    /// Box blur size used for the low-pass image.
    pub size: usize,
    /// Gain applied to the high-frequency detail.
    pub factor: f64,
}

impl Default for SharpenParams {
    fn default() -> Self {
        Self {
            size: 3,
            factor: 1.0,
        }
    }
}

impl SharpenParams {
    pub fn new(size: usize, factor: f64) -> Self {
        Self { size, factor }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Size forced odd; a non-finite factor is rejected.
    pub fn normalized(&self) -> Result<Self, FilterError> {
        if !self.factor.is_finite() {
            return Err(FilterError::invalid(
                "factor",
                format!("must be finite, got {}", self.factor),
            ));
        }
        Ok(Self {
            size: positive_size("size", self.size)?,
            factor: self.factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_odd() {
        assert_eq!(force_odd(1), 1);
        assert_eq!(force_odd(2), 3);
        assert_eq!(force_odd(4), 5);
        assert_eq!(force_odd(7), 7);
    }

    #[test]
    fn test_blur_params_normalize() {
        let params = BlurParams::new(2, 5).normalized().unwrap();
        assert_eq!(params, BlurParams::new(3, 5));
        assert!(BlurParams::new(0, 3).normalized().is_err());
        assert!(BlurParams::new(3, 0).normalized().is_err());
    }

    #[test]
    fn test_median_params_clamp() {
        assert_eq!(MedianParams::new(11).normalized().unwrap().size, 9);
        assert_eq!(MedianParams::new(10).normalized().unwrap().size, 9);
        assert_eq!(MedianParams::new(4).normalized().unwrap().size, 5);
        assert!(MedianParams::new(0).normalized().is_err());
    }

    #[test]
    fn test_diffusion_method_selector() {
        assert_eq!(
            DiffusionMethod::from_index(0).unwrap(),
            DiffusionMethod::FloydSteinberg
        );
        assert_eq!(
            DiffusionMethod::try_from(1).unwrap(),
            DiffusionMethod::JarvisJudiceNinke
        );
        assert!(DiffusionMethod::from_index(2).is_err());
        assert!(DiffusionMethod::from_index(-1).is_err());
        assert_eq!(DiffusionMethod::JarvisJudiceNinke.index(), 1);
    }

    #[test]
    fn test_diffusion_params_gamma() {
        assert!(DiffusionParams::default().with_gamma(2.2).normalized().is_ok());
        assert!(DiffusionParams::default().with_gamma(0.0).normalized().is_err());
        assert!(DiffusionParams::default().with_gamma(-1.0).normalized().is_err());
        assert!(DiffusionParams::default()
            .with_gamma(f64::NAN)
            .normalized()
            .is_err());
    }

    #[test]
    fn test_sharpen_params_normalize() {
        let params = SharpenParams::new(4, 2.0).normalized().unwrap();
        assert_eq!(params.size, 5);
        assert!(SharpenParams::new(0, 1.0).normalized().is_err());
        assert!(SharpenParams::new(3, f64::INFINITY).normalized().is_err());
    }
}
