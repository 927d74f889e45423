use image::Rgba32FImage;

use crate::foundation::error::{SheetError, SheetResult};

/// A straight-alpha RGBA pixel with each channel in `[0, 1]`.
pub type RgbaF32 = [f32; 4];

pub const TRANSPARENT: RgbaF32 = [0.0, 0.0, 0.0, 0.0];

/// A 2D RGBA f32 buffer, row-major, four channels per pixel.
///
/// Scanline 0 is the **bottom** row of the image (the float-render
/// convention); encoders that need top-down rows flip at write time. All
/// pixel access is bounds-checked so bad index arithmetic surfaces as an
/// error instead of corrupting a neighboring region.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Allocate a `width` x `height` buffer filled with transparent pixels.
    pub fn new(width: u32, height: u32) -> SheetResult<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Wrap an existing channel array; `data` length must be `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> SheetResult<Self> {
        let len = checked_len(width, height)?;
        if data.len() != len {
            return Err(SheetError::invalid_dimensions(format!(
                "pixel data length {} does not match {}x{} rgba buffer (expected {})",
                data.len(),
                width,
                height,
                len
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<f32> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> SheetResult<RgbaF32> {
        let i = self.offset(x, y)?;
        Ok([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: RgbaF32) -> SheetResult<()> {
        let i = self.offset(x, y)?;
        self.data[i..i + 4].copy_from_slice(&px);
        Ok(())
    }

    /// The full channel slice for scanline `y` (bottom row is `y = 0`).
    pub fn scanline(&self, y: u32) -> SheetResult<&[f32]> {
        let start = self.offset(0, y)?;
        let row_len = self.width as usize * 4;
        Ok(&self.data[start..start + row_len])
    }

    pub fn scanline_mut(&mut self, y: u32) -> SheetResult<&mut [f32]> {
        let start = self.offset(0, y)?;
        let row_len = self.width as usize * 4;
        Ok(&mut self.data[start..start + row_len])
    }

    pub fn fill(&mut self, px: RgbaF32) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Copy into an `image` crate buffer, preserving raw scanline order.
    pub fn to_rgba32f(&self) -> SheetResult<Rgba32FImage> {
        Rgba32FImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            SheetError::invalid_dimensions(format!(
                "{}x{} buffer does not convert to an rgba32f image",
                self.width, self.height
            ))
        })
    }

    pub fn from_rgba32f(img: Rgba32FImage) -> SheetResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, img.into_raw())
    }

    fn offset(&self, x: u32, y: u32) -> SheetResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(SheetError::invalid_dimensions(format!(
                "pixel ({x}, {y}) is outside a {}x{} buffer",
                self.width, self.height
            )));
        }
        Ok((y as usize * self.width as usize + x as usize) * 4)
    }
}

fn checked_len(width: u32, height: u32) -> SheetResult<usize> {
    if width == 0 || height == 0 {
        return Err(SheetError::invalid_dimensions(format!(
            "pixel buffer dimensions must be non-zero (got {width}x{height})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| {
            SheetError::invalid_dimensions(format!("{width}x{height} buffer size overflows"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_transparent() {
        let buf = PixelBuffer::new(3, 2).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(buf.pixel(x, y).unwrap(), TRANSPARENT);
            }
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(PixelBuffer::new(0, 4).is_err());
        assert!(PixelBuffer::new(4, 0).is_err());
    }

    #[test]
    fn out_of_bounds_access_is_an_error_not_a_panic() {
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        assert!(buf.pixel(2, 0).is_err());
        assert!(buf.pixel(0, 2).is_err());
        assert!(buf.set_pixel(5, 5, TRANSPARENT).is_err());
        assert!(buf.scanline(2).is_err());
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        let px = [0.25, 0.5, 0.75, 1.0];
        buf.set_pixel(3, 1, px).unwrap();
        assert_eq!(buf.pixel(3, 1).unwrap(), px);
        assert_eq!(buf.pixel(1, 3).unwrap(), TRANSPARENT);
    }

    #[test]
    fn from_raw_validates_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0.0; 16]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, vec![0.0; 15]).is_err());
    }

    #[test]
    fn rgba32f_roundtrip_preserves_pixels() {
        let mut buf = PixelBuffer::new(2, 3).unwrap();
        buf.set_pixel(1, 2, [0.1, 0.2, 0.3, 0.4]).unwrap();
        let img = buf.to_rgba32f().unwrap();
        let back = PixelBuffer::from_rgba32f(img).unwrap();
        assert_eq!(back, buf);
    }
}
