pub type SheetResult<T> = Result<T, SheetError>;

#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("insufficient frame range: {0}")]
    InsufficientFrameRange(String),

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("job cancelled: {0}")]
    Cancelled(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SheetError {
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    pub fn insufficient_frame_range(msg: impl Into<String>) -> Self {
        Self::InsufficientFrameRange(msg.into())
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }
}
