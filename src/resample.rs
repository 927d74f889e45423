use crate::buffer::PixelBuffer;
use crate::foundation::error::{SheetError, SheetResult};

/// Resampling policy used when fitting a rendered view into its cell.
/// Bilinear matches the quality of a scaled copy; nearest keeps hard pixel
/// edges. Both are deterministic for fixed input.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Bilinear,
}

impl ResampleFilter {
    fn as_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResampleFilter::Nearest => image::imageops::FilterType::Nearest,
            ResampleFilter::Bilinear => image::imageops::FilterType::Triangle,
        }
    }
}

/// Resample `source` to exactly `width` x `height`.
///
/// Scanline order is irrelevant to the resize and is preserved as-is.
pub fn resample_to(
    source: &PixelBuffer,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> SheetResult<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(SheetError::invalid_dimensions(format!(
            "resample target must be non-zero (got {width}x{height})"
        )));
    }
    if source.width() == width && source.height() == height {
        return Ok(source.clone());
    }

    let img = source.to_rgba32f()?;
    let resized = image::imageops::resize(&img, width, height, filter.as_image_filter());
    PixelBuffer::from_rgba32f(resized)
}
