use crate::foundation::core::{Axis, FrameNumber, FrameSpan};
use crate::foundation::error::{SheetError, SheetResult};

/// One view of the object: an absolute rotation offset about `axis` combined
/// with a timeline frame. The rotation is always relative to the object's
/// original orientation, never cumulative across views.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    pub angle_rad: f64,
    pub axis: Axis,
    pub frame: FrameNumber,
}

/// A render request paired with its destination grid cell.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannedCell {
    pub request: RenderRequest,
    pub row: u32,
    pub column: u32,
}

/// The ordered set of views for one sheet, rotation-major: each rotation step
/// is a row, each selected animation frame a column.
///
/// The plan is a pure description; [`SequencePlan::cells`] yields a fresh,
/// restartable iterator over it. Frame selection is computed once and shared
/// by every row.
#[derive(Clone, Debug)]
pub struct SequencePlan {
    rotation_count: u32,
    axis: Axis,
    frames: Vec<FrameNumber>,
}

impl SequencePlan {
    pub fn new(
        rotation_count: u32,
        frames_per_rotation: u32,
        axis: Axis,
        span: FrameSpan,
    ) -> SheetResult<Self> {
        if rotation_count == 0 {
            return Err(SheetError::invalid_dimensions(
                "rotation count must be at least 1",
            ));
        }
        if frames_per_rotation == 0 {
            return Err(SheetError::invalid_dimensions(
                "frames per rotation must be at least 1",
            ));
        }
        if span.len_frames() < u64::from(frames_per_rotation) {
            return Err(SheetError::insufficient_frame_range(format!(
                "animation range {}..={} holds {} frames, fewer than the {} needed per rotation",
                span.start.0,
                span.end.0,
                span.len_frames(),
                frames_per_rotation
            )));
        }

        Ok(Self {
            rotation_count,
            axis,
            frames: select_frames(span, frames_per_rotation),
        })
    }

    pub fn rotation_count(&self) -> u32 {
        self.rotation_count
    }

    pub fn frames_per_rotation(&self) -> u32 {
        self.frames.len() as u32
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The frame numbers used for every row, in column order.
    pub fn frame_numbers(&self) -> &[FrameNumber] {
        &self.frames
    }

    pub fn rotation_angle_deg(&self, rotation_index: u32) -> f64 {
        f64::from(rotation_index) * (360.0 / f64::from(self.rotation_count))
    }

    pub fn rotation_angle_rad(&self, rotation_index: u32) -> f64 {
        self.rotation_angle_deg(rotation_index).to_radians()
    }

    pub fn len(&self) -> usize {
        self.rotation_count as usize * self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `index`-th cell in render order, or `None` past the end.
    pub fn cell(&self, index: usize) -> Option<PlannedCell> {
        if index >= self.len() {
            return None;
        }
        let per_row = self.frames.len();
        let row = (index / per_row) as u32;
        let column = index % per_row;
        Some(PlannedCell {
            request: RenderRequest {
                angle_rad: self.rotation_angle_rad(row),
                axis: self.axis,
                frame: self.frames[column],
            },
            row,
            column: column as u32,
        })
    }

    pub fn cells(&self) -> Cells<'_> {
        Cells {
            plan: self,
            index: 0,
        }
    }
}

/// Evenly spaced frame selection across the inclusive span:
/// `frame(i) = round(start + i * (total - 1) / (n - 1))`, or just `start`
/// when a single frame is requested.
fn select_frames(span: FrameSpan, frames_per_rotation: u32) -> Vec<FrameNumber> {
    if frames_per_rotation == 1 {
        return vec![span.start];
    }

    let total = span.len_frames() as f64;
    let last = f64::from(frames_per_rotation - 1);
    (0..frames_per_rotation)
        .map(|i| {
            let offset = (f64::from(i) * (total - 1.0) / last).round() as i64;
            FrameNumber(span.start.0 + offset)
        })
        .collect()
}

/// Restartable iterator over a plan's cells in render order.
#[derive(Clone, Debug)]
pub struct Cells<'a> {
    plan: &'a SequencePlan,
    index: usize,
}

impl Iterator for Cells<'_> {
    type Item = PlannedCell;

    fn next(&mut self) -> Option<PlannedCell> {
        let cell = self.plan.cell(self.index)?;
        self.index += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells<'_> {}
