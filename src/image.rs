//! Planar 8-bit image container.
//!
//! Samples live in an `Array3<u8>` of shape `(channels, height, width)` in
//! standard layout: each channel is one contiguous row-major plane of
//! `width * height` samples, so a channel's linear cursor is a plain slice
//! and moving down one row is a stride of `width`.
//!
//! Conversions to and from the interleaved `(height, width, channels)`
//! layout used by numpy and canvas buffers are axis permutations.

use ndarray::{Array3, ArrayView3, Axis};

use crate::error::{try_filled, FilterError, Shape};

/// Largest sample value.
pub const SAMPLE_MAX: u8 = 255;

/// Binarization threshold, half of [`SAMPLE_MAX`].
pub const THRESHOLD_HALF: f64 = 127.5;

/// A multi-channel raster of 8-bit samples sharing one width and height.
///
/// The backing array is always in standard layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Array3<u8>,
}

impl Image {
    /// Create a zero-filled image.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, FilterError> {
        check_dimensions(width, height, channels)?;
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                FilterError::invalid(
                    "dimensions",
                    format!("{}x{}x{} samples overflow", width, height, channels),
                )
            })?;
        let data = try_filled(len, 0u8)?;
        Self::from_planes(width, height, channels, data)
    }

    /// Wrap planar sample data (channel 0 plane first).
    pub fn from_planes(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, FilterError> {
        check_dimensions(width, height, channels)?;
        let actual = data.len();
        let data = Array3::from_shape_vec((channels, height, width), data).map_err(|_| {
            FilterError::ShapeMismatch {
                expected: (channels, height, width),
                actual: (1, 1, actual),
            }
        })?;
        Ok(Self { data })
    }

    /// Single-channel image from row-major samples.
    pub fn from_gray(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FilterError> {
        Self::from_planes(width, height, 1, data)
    }

    /// Build from an interleaved `(height, width, channels)` array.
    pub fn from_interleaved(input: ArrayView3<u8>) -> Result<Self, FilterError> {
        let (height, width, channels) = input.dim();
        check_dimensions(width, height, channels)?;

        let planar = input.permuted_axes([2, 0, 1]);
        Ok(Self {
            data: planar.as_standard_layout().into_owned(),
        })
    }

    /// Convert to an interleaved `(height, width, channels)` array.
    pub fn to_interleaved(&self) -> Array3<u8> {
        let interleaved = self.data.view().permuted_axes([1, 2, 0]);
        interleaved.as_standard_layout().into_owned()
    }

    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    pub fn channel_count(&self) -> usize {
        self.data.dim().0
    }

    /// `(channels, height, width)`
    pub fn shape(&self) -> Shape {
        self.data.dim()
    }

    /// Number of samples in one channel plane.
    pub fn plane_len(&self) -> usize {
        self.width() * self.height()
    }

    /// New zero-filled image with the same shape and channel count.
    pub fn duplicate_header(&self) -> Result<Self, FilterError> {
        let (channels, height, width) = self.shape();
        Self::new(width, height, channels)
    }

    /// Planar `(channels, height, width)` view of the samples.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// Channel planes in channel order.
    pub fn channels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.as_slice().chunks_exact(self.plane_len())
    }

    /// Samples of channel `c`.
    ///
    /// # Panics
    /// If `c >= channel_count()`.
    pub fn channel(&self, c: usize) -> &[u8] {
        self.data
            .index_axis(Axis(0), c)
            .to_slice()
            .unwrap_or_default()
    }

    /// Mutable samples of channel `c`.
    ///
    /// # Panics
    /// If `c >= channel_count()`.
    pub fn channel_mut(&mut self, c: usize) -> &mut [u8] {
        self.data
            .index_axis_mut(Axis(0), c)
            .into_slice()
            .unwrap_or_default()
    }

    /// Sample at `(x, y)` of channel `c`.
    ///
    /// # Panics
    /// If `c`, `x` or `y` is out of range.
    pub fn get(&self, c: usize, x: usize, y: usize) -> u8 {
        self.data[[c, y, x]]
    }

    /// All samples, planar.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice().unwrap_or_default()
    }

    /// All samples, planar, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.data.as_slice_mut().unwrap_or_default()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }

    /// Fail with `ShapeMismatch` unless `other` has this image's shape.
    pub fn same_shape(&self, other: &Image) -> Result<(), FilterError> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(FilterError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            })
        }
    }
}

fn check_dimensions(width: usize, height: usize, channels: usize) -> Result<(), FilterError> {
    if width == 0 || height == 0 {
        return Err(FilterError::invalid(
            "dimensions",
            format!("image must not be empty, got {}x{}", width, height),
        ));
    }
    if channels == 0 {
        return Err(FilterError::invalid("channels", "image needs at least one channel"));
    }
    Ok(())
}
