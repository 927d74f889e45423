use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{
    Axis, FRAMES_PER_ROTATION, FrameNumber, FrameSpan, ROTATION_COUNT,
};
use crate::foundation::error::{SheetError, SheetResult};
use crate::layout::SheetSpec;
use crate::plan::SequencePlan;
use crate::resample::ResampleFilter;

pub const SHEET_FILE_NAME: &str = "spritesheet.png";
pub const METADATA_FILE_NAME: &str = "spritesheet.json";

/// One spritesheet job as configured by the user.
///
/// `model` and `camera` name the scene objects the external renderer draws
/// with; the crate only checks that they are set. The grid is always
/// 8 rotations by 8 frames; `turntable` must be enabled because no other
/// render mode is defined.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetJobConfig {
    pub model: String,
    pub camera: String,
    pub output_dir: PathBuf,

    #[serde(default = "default_sheet_dim")]
    pub sheet_width: u32,
    #[serde(default = "default_sheet_dim")]
    pub sheet_height: u32,

    /// Written to the metadata sidecar for consumers playing the sheet back.
    #[serde(default = "default_fps")]
    pub frames_per_second: u32,

    #[serde(default)]
    pub rotation_axis: Axis,

    #[serde(default = "default_start_frame")]
    pub start_frame: FrameNumber,
    #[serde(default = "default_end_frame")]
    pub end_frame: FrameNumber,

    /// The 360° turntable mode toggle.
    #[serde(default)]
    pub turntable: bool,

    #[serde(default)]
    pub filter: ResampleFilter,
}

fn default_sheet_dim() -> u32 {
    1024
}

fn default_fps() -> u32 {
    24
}

fn default_start_frame() -> FrameNumber {
    FrameNumber(1)
}

fn default_end_frame() -> FrameNumber {
    FrameNumber(250)
}

impl SheetJobConfig {
    pub fn validate(&self) -> SheetResult<()> {
        if self.model.trim().is_empty() {
            return Err(SheetError::missing_input("model reference is not set"));
        }
        if self.camera.trim().is_empty() {
            return Err(SheetError::missing_input("camera reference is not set"));
        }
        if self.sheet_width == 0 || self.sheet_height == 0 {
            return Err(SheetError::config(format!(
                "sheet dimensions must be at least 1x1 (got {}x{})",
                self.sheet_width, self.sheet_height
            )));
        }
        if self.frames_per_second == 0 {
            return Err(SheetError::config("frames_per_second must be at least 1"));
        }
        if self.start_frame.0 < 1 {
            return Err(SheetError::config(format!(
                "start_frame must be at least 1 (got {})",
                self.start_frame.0
            )));
        }
        if self.end_frame.0 < self.start_frame.0 {
            return Err(SheetError::config(format!(
                "end_frame {} is before start_frame {}",
                self.end_frame.0, self.start_frame.0
            )));
        }
        if !self.turntable {
            return Err(SheetError::config(
                "turntable (360°) mode must be enabled; no other render mode is supported",
            ));
        }
        Ok(())
    }

    pub fn frame_span(&self) -> SheetResult<FrameSpan> {
        FrameSpan::new(self.start_frame, self.end_frame)
    }

    pub fn sheet_spec(&self) -> SheetResult<SheetSpec> {
        SheetSpec::compute(
            self.sheet_width,
            self.sheet_height,
            FRAMES_PER_ROTATION,
            ROTATION_COUNT,
        )
    }

    pub fn sequence_plan(&self) -> SheetResult<SequencePlan> {
        SequencePlan::new(
            ROTATION_COUNT,
            FRAMES_PER_ROTATION,
            self.rotation_axis,
            self.frame_span()?,
        )
    }

    pub fn sheet_path(&self) -> PathBuf {
        self.output_dir.join(SHEET_FILE_NAME)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.output_dir.join(METADATA_FILE_NAME)
    }

    pub fn from_json_file(path: &Path) -> SheetResult<Self> {
        let file = File::open(path)
            .map_err(|e| SheetError::io(format!("open config '{}': {e}", path.display())))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| SheetError::config(format!("parse config '{}': {e}", path.display())))
    }
}
