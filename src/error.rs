//! Error types for DriveGuard

use thiserror::Error;

/// Errors that can occur while configuring or running the monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Monitor is already running")]
    AlreadyRunning,

    #[error("Capture device {0} could not be acquired")]
    ResourceUnavailable(u32),

    #[error("Producer thread panicked; capture resources were lost")]
    ProducerPanicked,

    #[error("Landmark set has {0} points, expected 68")]
    MalformedLandmarks(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
