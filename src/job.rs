use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::artifact::{ArtifactStore, SpillMode};
use crate::buffer::PixelBuffer;
use crate::composite::composite_cell;
use crate::foundation::core::FrameNumber;
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::SheetSpec;
use crate::plan::{RenderRequest, SequencePlan};
use crate::resample::ResampleFilter;

/// Saved scene pose: the object's XYZ euler orientation (radians) and the
/// timeline frame, captured before a job and restored after it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseSnapshot {
    pub rotation_euler: [f64; 3],
    pub frame: FrameNumber,
}

/// The external view producer a job drives.
///
/// `render` is synchronous and receives the full view description as explicit
/// parameters; implementations that mutate live scene state must honor the
/// `capture`/`restore` contract so a job always leaves the scene as it found
/// it.
pub trait Renderer {
    /// Verify the inputs this renderer draws from (model, camera) are
    /// present. Called once before any rendering.
    fn prepare(&mut self) -> SheetResult<()>;

    /// Snapshot the scene state a job will disturb.
    fn capture(&mut self) -> SheetResult<PoseSnapshot>;

    /// Produce the pixels for one view.
    fn render(&mut self, request: &RenderRequest) -> SheetResult<PixelBuffer>;

    /// Put the scene back to a captured snapshot.
    fn restore(&mut self, snapshot: PoseSnapshot) -> SheetResult<()>;
}

/// Cooperative cancellation flag, checked between views (never mid-render).
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Observable job progress. `Failed` is reachable from every non-terminal
/// phase; `Finalizing` (scene restoration) runs on failure paths too.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Preparing,
    Rendering(usize),
    Finalizing,
    Done,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JobStats {
    pub cells_total: u64,
    pub cells_rendered: u64,
}

#[derive(Clone, Debug, Default)]
pub struct JobOptions {
    pub filter: ResampleFilter,
    pub spill: SpillMode,
    pub cancel: Option<CancelToken>,
}

/// Drives one spritesheet job: renders each planned view in sequence,
/// composites it into the sheet, and releases the intermediate artifact
/// before the next view begins.
///
/// The sheet and the renderer's scene state are single-writer for the
/// duration of `run`; neither is safe for concurrent external access while a
/// job is in flight.
#[derive(Debug)]
pub struct SheetJob {
    spec: SheetSpec,
    plan: SequencePlan,
    opts: JobOptions,
    phase: JobPhase,
}

impl SheetJob {
    /// The grid shape is derived from the sequence parameters, so the layout
    /// and plan must agree.
    pub fn new(spec: SheetSpec, plan: SequencePlan, opts: JobOptions) -> SheetResult<Self> {
        if spec.rows != plan.rotation_count() || spec.columns != plan.frames_per_rotation() {
            return Err(SheetError::invalid_dimensions(format!(
                "layout grid {}x{} does not match planned sequence {}x{}",
                spec.rows,
                spec.columns,
                plan.rotation_count(),
                plan.frames_per_rotation()
            )));
        }
        Ok(Self {
            spec,
            plan,
            opts,
            phase: JobPhase::Idle,
        })
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn spec(&self) -> &SheetSpec {
        &self.spec
    }

    pub fn plan(&self) -> &SequencePlan {
        &self.plan
    }

    /// Run the job to completion, returning the composited sheet.
    ///
    /// The original scene pose is restored on every exit path once it has
    /// been captured; a restore failure after a job failure is logged and the
    /// job error wins.
    #[tracing::instrument(skip(self, renderer))]
    pub fn run(&mut self, renderer: &mut dyn Renderer) -> SheetResult<(PixelBuffer, JobStats)> {
        let out = self.run_inner(renderer);
        self.phase = if out.is_ok() {
            JobPhase::Done
        } else {
            JobPhase::Failed
        };
        out
    }

    fn run_inner(&mut self, renderer: &mut dyn Renderer) -> SheetResult<(PixelBuffer, JobStats)> {
        self.phase = JobPhase::Preparing;
        renderer.prepare()?;
        let snapshot = renderer.capture()?;
        tracing::info!(
            cells = self.plan.len(),
            sheet_width = self.spec.sheet_width(),
            sheet_height = self.spec.sheet_height(),
            "starting spritesheet job"
        );

        let rendered = self.render_all(renderer);

        self.phase = JobPhase::Finalizing;
        let restored = renderer.restore(snapshot);

        match (rendered, restored) {
            (Ok(out), Ok(())) => Ok(out),
            (Ok(_), Err(e)) => Err(e),
            (Err(job_err), restore_result) => {
                if let Err(restore_err) = restore_result {
                    tracing::warn!(error = %restore_err, "scene restore failed after job error");
                }
                Err(job_err)
            }
        }
    }

    fn render_all(&mut self, renderer: &mut dyn Renderer) -> SheetResult<(PixelBuffer, JobStats)> {
        let mut sheet = PixelBuffer::new(self.spec.sheet_width(), self.spec.sheet_height())?;
        let store = ArtifactStore::new(self.opts.spill.clone());
        let mut stats = JobStats {
            cells_total: self.plan.len() as u64,
            cells_rendered: 0,
        };

        for (i, cell) in self.plan.cells().enumerate() {
            if let Some(cancel) = &self.opts.cancel {
                if cancel.is_cancelled() {
                    return Err(SheetError::cancelled(format!(
                        "job cancelled before view {i} of {}",
                        stats.cells_total
                    )));
                }
            }

            self.phase = JobPhase::Rendering(i);
            tracing::debug!(
                view = i,
                row = cell.row,
                column = cell.column,
                angle_deg = cell.request.angle_rad.to_degrees(),
                frame = cell.request.frame.0,
                "rendering view"
            );

            let rendered = renderer.render(&cell.request)?;
            let guard = store.acquire(i, rendered)?;
            let source = guard.take()?;
            composite_cell(&source, &cell, &self.spec, &mut sheet, self.opts.filter)?;
            stats.cells_rendered += 1;
        }

        debug_assert_eq!(store.outstanding(), 0, "intermediate artifact leaked");
        Ok((sheet, stats))
    }
}
