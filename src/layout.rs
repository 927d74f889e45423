use crate::foundation::error::{SheetError, SheetResult};

/// Grid geometry of a spritesheet: cell size and the cell -> pixel-offset
/// mapping.
///
/// Cell sizes are the floor of the requested sheet dimensions divided by the
/// grid counts, so the effective sheet may be smaller than requested when the
/// division is not exact. That truncation is intentional, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetSpec {
    pub rows: u32,
    pub columns: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl SheetSpec {
    pub fn compute(
        sheet_width_px: u32,
        sheet_height_px: u32,
        columns: u32,
        rows: u32,
    ) -> SheetResult<Self> {
        if columns == 0 || rows == 0 {
            return Err(SheetError::invalid_dimensions(format!(
                "grid shape must be at least 1x1 (got {columns} columns x {rows} rows)"
            )));
        }
        if sheet_width_px < columns || sheet_height_px < rows {
            return Err(SheetError::invalid_dimensions(format!(
                "sheet {sheet_width_px}x{sheet_height_px} px cannot fit {columns}x{rows} cells \
                 of at least one pixel each"
            )));
        }

        Ok(Self {
            rows,
            columns,
            cell_width: sheet_width_px / columns,
            cell_height: sheet_height_px / rows,
        })
    }

    /// Effective sheet width: `cell_width * columns`.
    pub fn sheet_width(&self) -> u32 {
        self.cell_width * self.columns
    }

    /// Effective sheet height: `cell_height * rows`.
    pub fn sheet_height(&self) -> u32 {
        self.cell_height * self.rows
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }

    /// Pixel origin of a cell in sheet scanline space.
    ///
    /// Row 0 maps to the maximum y-offset: rotation-major ordering fills rows
    /// from the visual top of the sheet, which is the high end of bottom-up
    /// scanline space.
    pub fn cell_origin(&self, row: u32, column: u32) -> SheetResult<(u32, u32)> {
        if row >= self.rows || column >= self.columns {
            return Err(SheetError::invalid_dimensions(format!(
                "cell ({row}, {column}) is outside a {}x{} grid",
                self.rows, self.columns
            )));
        }
        let x = column * self.cell_width;
        let y = (self.rows - 1 - row) * self.cell_height;
        Ok((x, y))
    }
}
