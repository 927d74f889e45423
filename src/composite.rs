use crate::buffer::PixelBuffer;
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::SheetSpec;
use crate::plan::PlannedCell;
use crate::resample::{ResampleFilter, resample_to};

/// Scale one rendered view to cell size and write it into the sheet at the
/// cell's pixel origin.
///
/// The copy is a full RGBA overwrite (no blending) restricted to the cell's
/// rectangle; every pixel outside it is left untouched.
pub fn composite_cell(
    source: &PixelBuffer,
    cell: &PlannedCell,
    spec: &SheetSpec,
    destination: &mut PixelBuffer,
    filter: ResampleFilter,
) -> SheetResult<()> {
    if destination.width() != spec.sheet_width() || destination.height() != spec.sheet_height() {
        return Err(SheetError::invalid_dimensions(format!(
            "destination sheet is {}x{} but the layout needs {}x{}",
            destination.width(),
            destination.height(),
            spec.sheet_width(),
            spec.sheet_height()
        )));
    }

    let scaled = resample_to(source, spec.cell_width, spec.cell_height, filter)?;
    let (x0, y0) = spec.cell_origin(cell.row, cell.column)?;

    let x_start = x0 as usize * 4;
    let x_end = (x0 + spec.cell_width) as usize * 4;
    for y in 0..spec.cell_height {
        let src_row = scaled.scanline(y)?;
        let dst_row = destination.scanline_mut(y0 + y)?;
        dst_row[x_start..x_end].copy_from_slice(src_row);
    }

    Ok(())
}
