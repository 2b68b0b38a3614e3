//! Circular buffer of horizontally padded rows.
//!
//! Shared by the median filter and error diffusion. The buffer holds `R`
//! rows of `width + 2 * pad` samples. Logical row `y` lives in slot
//! `y mod R`; rows above or below the image are loaded as copies of the
//! first or last image row, and the `pad` columns on either side repeat the
//! row's border sample.
//!
//! Samples are stored in a type wider than `u8` so accumulated sums and
//! diffused error can leave the 0-255 range.

use crate::error::{try_filled, FilterError};

/// Fixed-height window of padded rows over one channel plane.
#[derive(Debug)]
pub struct RowWindowBuffer<'a, T> {
    source: &'a [u8],
    width: usize,
    height: usize,
    rows: usize,
    pad: usize,
    data: Vec<T>,
    newest: isize,
}

impl<'a, T: Copy + Default + From<u8>> RowWindowBuffer<'a, T> {
    /// Buffer of `rows` rows over a `width x height` row-major plane.
    pub fn new(
        source: &'a [u8],
        width: usize,
        height: usize,
        rows: usize,
        pad: usize,
    ) -> Result<Self, FilterError> {
        if rows == 0 {
            return Err(FilterError::invalid("rows", "window needs at least one row"));
        }
        if source.len() != width * height || width == 0 || height == 0 {
            return Err(FilterError::ShapeMismatch {
                expected: (1, height, width),
                actual: (1, 1, source.len()),
            });
        }

        let data = try_filled(rows * (width + 2 * pad), T::default())?;

        Ok(Self {
            source,
            width,
            height,
            rows,
            pad,
            data,
            newest: -1,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn pad(&self) -> usize {
        self.pad
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Row length including padding on both sides.
    pub fn padded_width(&self) -> usize {
        self.width + 2 * self.pad
    }

    /// Logical index of the oldest row still held.
    pub fn oldest(&self) -> isize {
        self.newest - (self.rows as isize - 1)
    }

    fn slot(&self, logical: isize) -> usize {
        logical.rem_euclid(self.rows as isize) as usize
    }

    /// Copy logical row `logical` into its slot, replicating edges.
    ///
    /// Indices above the image read row 0, indices below it read the last
    /// row. The loaded row becomes the newest row of the window.
    pub fn load_row(&mut self, logical: isize) {
        let source_row = logical.clamp(0, self.height as isize - 1) as usize;
        let line = &self.source[source_row * self.width..(source_row + 1) * self.width];

        let padded = self.padded_width();
        let start = self.slot(logical) * padded;
        let row = &mut self.data[start..start + padded];

        let first = T::from(line[0]);
        let last = T::from(line[self.width - 1]);
        row[..self.pad].fill(first);
        for (dst, &src) in row[self.pad..self.pad + self.width].iter_mut().zip(line) {
            *dst = T::from(src);
        }
        row[self.pad + self.width..].fill(last);

        self.newest = logical;
    }

    /// Padded row `offset` rows below the oldest one.
    ///
    /// # Panics
    /// If `offset >= rows()`.
    pub fn row_at(&self, offset: usize) -> &[T] {
        assert!(offset < self.rows, "row offset {} outside window", offset);
        let padded = self.padded_width();
        let start = self.slot(self.oldest() + offset as isize) * padded;
        &self.data[start..start + padded]
    }

    /// Mutable padded row `offset` rows below the oldest one.
    ///
    /// # Panics
    /// If `offset >= rows()`.
    pub fn row_at_mut(&mut self, offset: usize) -> &mut [T] {
        assert!(offset < self.rows, "row offset {} outside window", offset);
        let padded = self.padded_width();
        let start = self.slot(self.oldest() + offset as isize) * padded;
        &mut self.data[start..start + padded]
    }
}
