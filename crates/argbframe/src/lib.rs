#![cfg_attr(not(test), no_std)]

//! Linear ARGB8888 framebuffer primitives.
//!
//! A [`Frame`] is an exclusive borrow of a caller-owned pixel slice plus its
//! geometry. The stride (pixels per scan line) may exceed the visible width;
//! row operations cover the full stride so padding pixels stay consistent
//! with the visible area.

/// ARGB8888 colors used by the boot console.
pub mod color {
    pub const LIGHT_GRAY: u32 = 0xFFDD_DDDD;
    pub const DARK_GRAY: u32 = 0xFF22_2222;
    pub const RED: u32 = 0xFFCC_2222;
    pub const BLUE: u32 = 0xFF22_22CC;
}

/// Frame construction errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeometryError {
    /// Width or height is zero.
    ZeroDimension,
    /// Stride is smaller than the visible width.
    StrideTooSmall { width: usize, stride: usize },
    /// Pixel slice does not cover `stride * height` words.
    BufferTooSmall { needed: usize, actual: usize },
}

/// One 32-bit ARGB word per pixel, row-major with a fixed stride.
pub struct Frame<'a> {
    px: &'a mut [u32],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> Frame<'a> {
    pub fn new(
        px: &'a mut [u32],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroDimension);
        }
        if stride < width {
            return Err(GeometryError::StrideTooSmall { width, stride });
        }

        let needed = stride * height;
        if px.len() < needed {
            return Err(GeometryError::BufferTooSmall {
                needed,
                actual: px.len(),
            });
        }

        Ok(Self {
            px,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing pixels, `stride * height` words.
    pub fn pixels(&self) -> &[u32] {
        &self.px[..self.stride * self.height]
    }

    /// Writes a pixel.
    ///
    /// Returns `true` when the pixel is in bounds, `false` otherwise.
    pub fn set_pixel(&mut self, x: usize, y: usize, argb: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }

        self.px[y * self.stride + x] = argb;
        true
    }

    /// Reads a pixel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.px[y * self.stride + x])
    }

    /// Returns the visible part of scan line `y`.
    pub fn row(&self, y: usize) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }

        let start = y * self.stride;
        Some(&self.px[start..start + self.width])
    }

    /// Fills the whole frame, padding included.
    pub fn fill(&mut self, argb: u32) {
        self.px[..self.stride * self.height].fill(argb);
    }

    /// Fills `rows` scan lines starting at `y0`, padding included.
    ///
    /// Returns `false` when the range exceeds the frame.
    pub fn fill_rows(&mut self, y0: usize, rows: usize, argb: u32) -> bool {
        let Some(end) = y0.checked_add(rows) else {
            return false;
        };
        if end > self.height {
            return false;
        }

        self.px[y0 * self.stride..end * self.stride].fill(argb);
        true
    }

    /// Shifts the top `region_rows` scan lines up by `rows` with one bulk
    /// overlapping copy, then fills the vacated bottom `rows` of the region
    /// with `argb`. Scan lines below the region are untouched.
    ///
    /// Returns `false` when the request exceeds the region or the frame.
    pub fn scroll_rows_up(&mut self, region_rows: usize, rows: usize, argb: u32) -> bool {
        if rows == 0 || rows > region_rows || region_rows > self.height {
            return false;
        }

        let stride = self.stride;
        self.px.copy_within(rows * stride..region_rows * stride, 0);
        self.px[(region_rows - rows) * stride..region_rows * stride].fill(argb);
        true
    }
}
