use thiserror::Error;

/// Errors raised while loading or resolving a show configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Starting address {0} is outside the DMX range 1-512")]
    AddressOutOfRange(u16),

    #[error("Unknown fixture template: {0}")]
    UnknownTemplate(String),

    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse show config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by frame sources.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    Unavailable(String),

    #[error("Frame geometry mismatch: expected {expected} bytes, got {actual}")]
    Geometry { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by DMX transports.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Transport is not open")]
    NotOpen,

    #[error("Failed to open DMX device {0}: {1}")]
    OpenFailed(u32, String),

    #[error("Channel range out of bounds: start {start}, length {len}")]
    ChannelRange { start: u16, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level errors surfaced by the render engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
