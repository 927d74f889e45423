use std::path::Path;

use crate::encode::ensure_parent_dir;
use crate::foundation::core::Axis;
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::SheetSpec;
use crate::plan::SequencePlan;

/// One cell of the written sheet, described in the image's own coordinate
/// space (top-left origin, matching the PNG). `uv` is
/// `[u_min, v_min, u_max, v_max]` in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CellMetadata {
    pub row: u32,
    pub column: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub uv: [f64; 4],
    pub angle_deg: f64,
    pub frame: i64,
}

/// Sidecar document written next to the sheet so consumers can address
/// cells without re-deriving the layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SheetMetadata {
    pub sheet_width: u32,
    pub sheet_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub rows: u32,
    pub columns: u32,
    pub frames_per_second: u32,
    pub rotation_axis: Axis,
    pub cells: Vec<CellMetadata>,
}

impl SheetMetadata {
    pub fn build(
        spec: &SheetSpec,
        plan: &SequencePlan,
        frames_per_second: u32,
    ) -> SheetResult<Self> {
        let sheet_width = spec.sheet_width();
        let sheet_height = spec.sheet_height();

        let mut cells = Vec::with_capacity(plan.len());
        for cell in plan.cells() {
            let (x, y_buf) = spec.cell_origin(cell.row, cell.column)?;
            // Buffer scanlines are bottom-up; the written image is top-down.
            let y = sheet_height - y_buf - spec.cell_height;
            cells.push(CellMetadata {
                row: cell.row,
                column: cell.column,
                x,
                y,
                width: spec.cell_width,
                height: spec.cell_height,
                uv: [
                    f64::from(x) / f64::from(sheet_width),
                    f64::from(y) / f64::from(sheet_height),
                    f64::from(x + spec.cell_width) / f64::from(sheet_width),
                    f64::from(y + spec.cell_height) / f64::from(sheet_height),
                ],
                angle_deg: plan.rotation_angle_deg(cell.row),
                frame: cell.request.frame.0,
            });
        }

        Ok(Self {
            sheet_width,
            sheet_height,
            cell_width: spec.cell_width,
            cell_height: spec.cell_height,
            rows: spec.rows,
            columns: spec.columns,
            frames_per_second,
            rotation_axis: plan.axis(),
            cells,
        })
    }

    pub fn write_json(&self, path: &Path) -> SheetResult<()> {
        ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::Other(anyhow::Error::new(e)))?;
        std::fs::write(path, json)
            .map_err(|e| SheetError::io(format!("write metadata '{}': {e}", path.display())))
    }
}
