use std::collections::BTreeSet;
use std::path::PathBuf;

use rotasheet::{
    Axis, CancelToken, FrameNumber, JobOptions, PixelBuffer, PoseSnapshot, RenderRequest,
    Renderer, SheetError, SheetJobConfig, SheetMetadata, SheetResult, SpillMode,
    render_spritesheet, render_spritesheet_to_png, render_spritesheet_with,
};

/// Deterministic stand-in for a 3D backend: every view is a solid color
/// keyed by (rotation angle, frame), and the scene pose mutates per render
/// exactly like a live scene would.
struct SolidRenderer {
    view_size: u32,
    pose: PoseSnapshot,
    calls: usize,
    fail_on_call: Option<usize>,
}

impl SolidRenderer {
    fn new(view_size: u32) -> Self {
        Self {
            view_size,
            pose: PoseSnapshot {
                rotation_euler: [0.1, 0.2, 0.3],
                frame: FrameNumber(99),
            },
            calls: 0,
            fail_on_call: None,
        }
    }

    fn failing_on(view_size: u32, call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new(view_size)
        }
    }

    fn color_for(angle_deg: f64, frame: i64) -> [f32; 4] {
        let step = (angle_deg / 45.0).round() as i64;
        [
            (step * 30) as f32 / 255.0,
            (frame % 256) as f32 / 255.0,
            200.0 / 255.0,
            1.0,
        ]
    }
}

impl Renderer for SolidRenderer {
    fn prepare(&mut self) -> SheetResult<()> {
        Ok(())
    }

    fn capture(&mut self) -> SheetResult<PoseSnapshot> {
        Ok(self.pose)
    }

    fn render(&mut self, request: &RenderRequest) -> SheetResult<PixelBuffer> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(SheetError::render("deliberate failure for testing"));
        }

        self.pose.rotation_euler = [0.0; 3];
        self.pose.rotation_euler[request.axis.euler_index()] = request.angle_rad;
        self.pose.frame = request.frame;

        let mut view = PixelBuffer::new(self.view_size, self.view_size)?;
        view.fill(Self::color_for(request.angle_rad.to_degrees(), request.frame.0));
        Ok(view)
    }

    fn restore(&mut self, snapshot: PoseSnapshot) -> SheetResult<()> {
        self.pose = snapshot;
        Ok(())
    }
}

fn config(output_dir: PathBuf) -> SheetJobConfig {
    serde_json::from_value(serde_json::json!({
        "model": "hero",
        "camera": "cam.front",
        "output_dir": output_dir,
        "sheet_width": 1024,
        "sheet_height": 1024,
        "frames_per_second": 24,
        "rotation_axis": "Z",
        "start_frame": 1,
        "end_frame": 250,
        "turntable": true
    }))
    .unwrap()
}

fn as_u8(px: [f32; 4]) -> [u8; 4] {
    px.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[test]
fn full_job_populates_64_distinct_cells() {
    let cfg = config(PathBuf::from("unused"));
    let mut renderer = SolidRenderer::new(256);
    let (sheet, spec, stats) = render_spritesheet(&cfg, &mut renderer).unwrap();

    assert_eq!(stats.cells_total, 64);
    assert_eq!(stats.cells_rendered, 64);
    assert_eq!(sheet.width(), 1024);
    assert_eq!(sheet.height(), 1024);
    assert_eq!(spec.cell_width, 128);
    assert_eq!(spec.cell_height, 128);

    let mut colors = BTreeSet::new();
    for row in 0..8u32 {
        for column in 0..8u32 {
            let (x0, y0) = spec.cell_origin(row, column).unwrap();
            let center = sheet.pixel(x0 + 64, y0 + 64).unwrap();
            colors.insert(as_u8(center));
        }
    }
    assert_eq!(colors.len(), 64, "cells are not pairwise distinct");

    // Row 0 / column 0 is the 0° view of the first animation frame.
    let (x0, y0) = spec.cell_origin(0, 0).unwrap();
    assert_eq!(y0, 7 * 128);
    assert_eq!(
        as_u8(sheet.pixel(x0, y0).unwrap()),
        as_u8(SolidRenderer::color_for(0.0, 1))
    );

    // Row 7 / column 7 is the 315° view of the last frame.
    let (x7, y7) = spec.cell_origin(7, 7).unwrap();
    assert_eq!((x7, y7), (896, 0));
    assert_eq!(
        as_u8(sheet.pixel(x7 + 127, y7).unwrap()),
        as_u8(SolidRenderer::color_for(315.0, 250))
    );
}

#[test]
fn written_png_has_row_zero_at_the_top_and_stable_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path().to_path_buf());

    let mut renderer = SolidRenderer::new(128);
    let out = render_spritesheet_to_png(&cfg, &mut renderer).unwrap();
    assert_eq!(out.stats.cells_rendered, 64);

    let img = image::open(&out.sheet_path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (1024, 1024));
    // Top-left pixel: 0° rotation, first animation frame.
    assert_eq!(
        img.get_pixel(0, 0).0,
        as_u8(SolidRenderer::color_for(0.0, 1))
    );
    // Bottom-right pixel: 315° rotation, last animation frame.
    assert_eq!(
        img.get_pixel(1023, 1023).0,
        as_u8(SolidRenderer::color_for(315.0, 250))
    );

    let metadata: SheetMetadata =
        serde_json::from_str(&std::fs::read_to_string(&out.metadata_path).unwrap()).unwrap();
    assert_eq!(metadata.cells.len(), 64);
    assert_eq!(metadata.frames_per_second, 24);
    assert_eq!(metadata.rotation_axis, Axis::Z);
    assert_eq!(metadata.cells[0].frame, 1);
    assert_eq!(metadata.cells[63].angle_deg, 315.0);

    // Identical inputs re-encode to identical bytes.
    let first = std::fs::read(&out.sheet_path).unwrap();
    let mut renderer = SolidRenderer::new(128);
    let out2 = render_spritesheet_to_png(&cfg, &mut renderer).unwrap();
    let second = std::fs::read(&out2.sheet_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failure_mid_job_restores_the_pose_and_persists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path().to_path_buf());

    let mut renderer = SolidRenderer::failing_on(128, 5);
    let original = renderer.pose;

    let err = render_spritesheet_to_png(&cfg, &mut renderer).unwrap_err();
    assert!(matches!(err, SheetError::Render(_)));
    assert_eq!(renderer.calls, 5);
    assert_eq!(
        renderer.pose, original,
        "scene pose must be restored after a failure"
    );
    assert!(!cfg.sheet_path().exists(), "no partial sheet may be written");
    assert!(!cfg.metadata_path().exists());
}

#[test]
fn spilled_artifacts_are_removed_on_success_and_on_failure() {
    let spill_dir = tempfile::tempdir().unwrap();
    let opts = || JobOptions {
        spill: SpillMode::Disk {
            dir: Some(spill_dir.path().to_path_buf()),
        },
        ..JobOptions::default()
    };
    let cfg = config(PathBuf::from("unused"));

    let mut renderer = SolidRenderer::new(128);
    render_spritesheet_with(&cfg, &mut renderer, opts()).unwrap();
    assert_eq!(
        std::fs::read_dir(spill_dir.path()).unwrap().count(),
        0,
        "spill files leaked after a successful job"
    );

    let mut renderer = SolidRenderer::failing_on(128, 5);
    render_spritesheet_with(&cfg, &mut renderer, opts()).unwrap_err();
    assert_eq!(
        std::fs::read_dir(spill_dir.path()).unwrap().count(),
        0,
        "spill files leaked after a failed job"
    );
}

#[test]
fn cancellation_stops_before_the_next_render_and_still_restores() {
    let cfg = config(PathBuf::from("unused"));
    let cancel = CancelToken::new();
    cancel.cancel();
    let opts = JobOptions {
        cancel: Some(cancel),
        ..JobOptions::default()
    };

    let mut renderer = SolidRenderer::new(128);
    let original = renderer.pose;
    let err = render_spritesheet_with(&cfg, &mut renderer, opts).unwrap_err();
    assert!(matches!(err, SheetError::Cancelled(_)));
    assert_eq!(renderer.calls, 0, "cancellation is checked between views");
    assert_eq!(renderer.pose, original);
}

#[test]
fn unset_model_reference_fails_before_any_render() {
    let mut cfg = config(PathBuf::from("unused"));
    cfg.model = String::new();

    let mut renderer = SolidRenderer::new(128);
    let err = render_spritesheet(&cfg, &mut renderer).unwrap_err();
    assert!(matches!(err, SheetError::MissingInput(_)));
    assert_eq!(renderer.calls, 0);
}
