use crate::foundation::error::{SheetError, SheetResult};

/// Grid shape of a turntable sheet: 8 rotation steps by 8 animation frames.
/// The sheet layout is derived from these, not configured independently.
pub const ROTATION_COUNT: u32 = 8;
pub const FRAMES_PER_ROTATION: u32 = 8;

/// Object-space axis the turntable rotates about.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// Component index into an XYZ euler triple.
    pub fn euler_index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// A timeline frame number (1-based in typical scene files, but any value is
/// representable).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameNumber(pub i64);

/// Inclusive animation range on the timeline: both `start` and `end` are
/// rendered frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpan {
    pub start: FrameNumber,
    pub end: FrameNumber,
}

impl FrameSpan {
    pub fn new(start: FrameNumber, end: FrameNumber) -> SheetResult<Self> {
        if end.0 < start.0 {
            return Err(SheetError::insufficient_frame_range(format!(
                "animation end frame {} is before start frame {}",
                end.0, start.0
            )));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        (self.end.0 - self.start.0) as u64 + 1
    }

    pub fn contains(self, f: FrameNumber) -> bool {
        self.start.0 <= f.0 && f.0 <= self.end.0
    }
}
