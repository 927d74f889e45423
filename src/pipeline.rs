use std::path::PathBuf;

use crate::buffer::PixelBuffer;
use crate::config::SheetJobConfig;
use crate::encode::save_sheet_png;
use crate::foundation::error::SheetResult;
use crate::job::{JobOptions, JobStats, Renderer, SheetJob};
use crate::layout::SheetSpec;
use crate::metadata::SheetMetadata;

/// Paths and statistics from a completed [`render_spritesheet_to_png`] job.
#[derive(Clone, Debug)]
pub struct SheetOutput {
    pub sheet_path: PathBuf,
    pub metadata_path: PathBuf,
    pub stats: JobStats,
}

/// Validate the config, plan the sequence, and run the job.
///
/// This is the in-memory entry point; the caller owns the returned sheet.
pub fn render_spritesheet(
    config: &SheetJobConfig,
    renderer: &mut dyn Renderer,
) -> SheetResult<(PixelBuffer, SheetSpec, JobStats)> {
    let opts = JobOptions {
        filter: config.filter,
        ..JobOptions::default()
    };
    render_spritesheet_with(config, renderer, opts)
}

#[tracing::instrument(skip(config, renderer, opts))]
pub fn render_spritesheet_with(
    config: &SheetJobConfig,
    renderer: &mut dyn Renderer,
    opts: JobOptions,
) -> SheetResult<(PixelBuffer, SheetSpec, JobStats)> {
    config.validate()?;
    let spec = config.sheet_spec()?;
    let plan = config.sequence_plan()?;
    let mut job = SheetJob::new(spec, plan, opts)?;
    let (sheet, stats) = job.run(renderer)?;
    Ok((sheet, spec, stats))
}

/// Run the full pipeline and persist the results: the PNG sheet plus its
/// JSON metadata sidecar, both under the configured output directory.
///
/// Re-running with identical inputs and a deterministic renderer overwrites
/// both files with byte-identical content. Nothing is written when the job
/// fails.
pub fn render_spritesheet_to_png(
    config: &SheetJobConfig,
    renderer: &mut dyn Renderer,
) -> SheetResult<SheetOutput> {
    let (sheet, spec, stats) = render_spritesheet(config, renderer)?;

    let sheet_path = config.sheet_path();
    save_sheet_png(&sheet, &sheet_path)?;

    let plan = config.sequence_plan()?;
    let metadata = SheetMetadata::build(&spec, &plan, config.frames_per_second)?;
    let metadata_path = config.metadata_path();
    metadata.write_json(&metadata_path)?;

    Ok(SheetOutput {
        sheet_path,
        metadata_path,
        stats,
    })
}
