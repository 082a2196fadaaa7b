/// Result alias that carries the custom [`KaleidoError`] type.
pub type Result<T> = std::result::Result<T, KaleidoError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum KaleidoError {
    /// Startup input that cannot describe a shape or a pipeline.
    #[error("{0}")]
    InvalidConfig(String),
    /// The compute thread pool could not be created.
    #[error("could not build segment worker pool: {0}")]
    WorkerPool(String),
    /// No exclusive drawing surface could be handed to the renderer.
    #[error("could not acquire drawing surface: {0}")]
    Surface(String),
    /// The render thread went away while a frame was being committed.
    #[error("renderer is no longer running")]
    RendererDisconnected,
    /// Writing a snapshot image failed.
    #[error("could not save snapshot: {0}")]
    Snapshot(String),
    /// Generic message for conditions without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed configuration file.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl KaleidoError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<&str> for KaleidoError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for KaleidoError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<image::ImageError> for KaleidoError {
    fn from(value: image::ImageError) -> Self {
        Self::Snapshot(value.to_string())
    }
}
