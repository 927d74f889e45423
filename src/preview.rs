use crate::buffer::PixelBuffer;
use crate::foundation::core::FrameNumber;
use crate::foundation::error::SheetResult;
use crate::job::{PoseSnapshot, Renderer};
use crate::plan::RenderRequest;

/// Built-in deterministic renderer for previewing a sheet layout without an
/// external 3D backend.
///
/// Each view is a flat color keyed by (angle, frame) with a brighter marker
/// bar whose position encodes the rotation, so neighboring cells are easy to
/// tell apart in the output. It maintains a scene pose the same way a real
/// backend would, which also makes it a faithful test double for the
/// capture/restore contract.
#[derive(Clone, Debug)]
pub struct PreviewRenderer {
    width: u32,
    height: u32,
    pose: PoseSnapshot,
}

impl PreviewRenderer {
    /// `width` x `height` is the per-view render resolution, typically the
    /// full sheet size so views downscale into their cells.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pose: PoseSnapshot {
                rotation_euler: [0.0; 3],
                frame: FrameNumber(0),
            },
        }
    }

    /// The scene pose as the renderer currently holds it.
    pub fn pose(&self) -> PoseSnapshot {
        self.pose
    }

    fn view_color(request: &RenderRequest) -> [f32; 4] {
        let turn = request.angle_rad.to_degrees().rem_euclid(360.0) / 360.0;
        let frame_phase = (request.frame.0 as f64 * 0.618_033_988_749_895).fract().abs();
        [
            (0.15 + 0.8 * turn) as f32,
            (0.15 + 0.8 * frame_phase) as f32,
            (0.9 - 0.6 * turn) as f32,
            1.0,
        ]
    }
}

impl Renderer for PreviewRenderer {
    fn prepare(&mut self) -> SheetResult<()> {
        Ok(())
    }

    fn capture(&mut self) -> SheetResult<PoseSnapshot> {
        Ok(self.pose)
    }

    fn render(&mut self, request: &RenderRequest) -> SheetResult<PixelBuffer> {
        // Track the pose like a live scene backend would.
        self.pose.rotation_euler = [0.0; 3];
        self.pose.rotation_euler[request.axis.euler_index()] = request.angle_rad;
        self.pose.frame = request.frame;

        let mut view = PixelBuffer::new(self.width, self.height)?;
        view.fill(Self::view_color(request));

        // Marker bar: a vertical stripe whose x position tracks the angle.
        let turn = request.angle_rad.to_degrees().rem_euclid(360.0) / 360.0;
        let bar_x = ((turn * f64::from(self.width.saturating_sub(1))).round()) as u32;
        let bar_width = (self.width / 16).max(1);
        for y in 0..self.height {
            for x in bar_x..(bar_x + bar_width).min(self.width) {
                let mut px = view.pixel(x, y)?;
                for c in &mut px[0..3] {
                    *c = (*c + 0.4).min(1.0);
                }
                view.set_pixel(x, y, px)?;
            }
        }

        Ok(view)
    }

    fn restore(&mut self, snapshot: PoseSnapshot) -> SheetResult<()> {
        self.pose = snapshot;
        Ok(())
    }
}
