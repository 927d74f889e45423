use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::foundation::error::{SheetError, SheetResult};

pub fn ensure_parent_dir(path: &Path) -> SheetResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SheetError::io(format!(
                    "create output directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}

/// Encode a sheet as an 8-bit RGBA PNG, overwriting any existing file.
///
/// The buffer's bottom-up scanlines are flipped to the PNG's top-down row
/// order, which places grid row 0 at the top of the written image. Channels
/// are clamped to `[0, 1]` and rounded, so identical sheets always encode to
/// identical bytes.
pub fn save_sheet_png(sheet: &PixelBuffer, path: &Path) -> SheetResult<()> {
    ensure_parent_dir(path)?;

    let width = sheet.width();
    let height = sheet.height();
    let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
    for y in (0..height).rev() {
        for v in sheet.scanline(y)? {
            bytes.push((v.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
    }

    image::save_buffer_with_format(
        path,
        &bytes,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| SheetError::io(format!("write png '{}': {e}", path.display())))?;

    tracing::info!(path = %path.display(), width, height, "wrote spritesheet");
    Ok(())
}
