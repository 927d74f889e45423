//! rotasheet renders 360° turntable spritesheets: a fixed 8x8 grid of views
//! of a 3D object (8 rotation steps by 8 animation frames) composited into a
//! single transparent PNG plus a JSON metadata sidecar.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: [`SequencePlan`] enumerates the (rotation, frame) views in
//!    rotation-major order and maps each to a grid cell.
//! 2. **Render**: a [`Renderer`] (implemented by the embedding application)
//!    produces one [`PixelBuffer`] per view.
//! 3. **Composite**: each view is scaled to cell size and written into the
//!    sheet at its [`SheetSpec`] offset; intermediates are released through
//!    the [`ArtifactStore`] so nothing outlives its loop iteration.
//! 4. **Encode**: the finished sheet is saved as an 8-bit RGBA PNG with a
//!    [`SheetMetadata`] sidecar.
//!
//! Jobs are single-threaded and strictly sequential; the sheet and the
//! renderer's scene state are single-writer while a job runs. The scene pose
//! captured at job start is restored on every exit path, including failures.
//!
//! A deterministic [`PreviewRenderer`] ships in-crate so the CLI and tests
//! can exercise the whole pipeline without an external 3D backend.
#![forbid(unsafe_code)]

mod artifact;
mod buffer;
mod composite;
mod config;
mod encode;
mod foundation;
mod job;
mod layout;
mod metadata;
mod pipeline;
mod plan;
mod preview;
mod resample;

pub use artifact::{ArtifactGuard, ArtifactStore, SpillMode};
pub use buffer::{PixelBuffer, RgbaF32, TRANSPARENT};
pub use composite::composite_cell;
pub use config::{METADATA_FILE_NAME, SHEET_FILE_NAME, SheetJobConfig};
pub use encode::{ensure_parent_dir, save_sheet_png};
pub use foundation::core::{
    Axis, FRAMES_PER_ROTATION, FrameNumber, FrameSpan, ROTATION_COUNT,
};
pub use foundation::error::{SheetError, SheetResult};
pub use job::{
    CancelToken, JobOptions, JobPhase, JobStats, PoseSnapshot, Renderer, SheetJob,
};
pub use layout::SheetSpec;
pub use metadata::{CellMetadata, SheetMetadata};
pub use pipeline::{
    SheetOutput, render_spritesheet, render_spritesheet_to_png, render_spritesheet_with,
};
pub use plan::{Cells, PlannedCell, RenderRequest, SequencePlan};
pub use preview::PreviewRenderer;
pub use resample::{ResampleFilter, resample_to};
