//! DriveGuard - driver behavior monitoring core
//!
//! DriveGuard turns a stream of per-frame facial-geometry measurements into a
//! stable, de-bounced behavior classification through a deterministic cycle:
//! capture → landmark extraction → metric derivation → debounced
//! classification → publish → edge-triggered dispatch.
//!
//! ## Modules
//!
//! - **Metrics**: pure EAR/MAR geometry ratios from facial landmarks
//! - **Classifier**: hysteresis counters mapping noisy per-frame signals to
//!   one [`BehaviorState`]
//! - **Monitor**: producer-thread loop with a race-free start/stop lifecycle
//! - **State**: thread-safe publication of the latest frame and behavior
//! - **Message**: delimiter-based wire codec for transport collaborators
//! - **Events**: file-backed event sink invoked from the dispatched callback
//!
//! Camera acquisition, face detection, and landmark extraction are external
//! collaborators, reached only through the capability traits in [`source`].

pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod metrics;
pub mod monitor;
pub mod source;
pub mod state;
pub mod types;

pub use classifier::BehaviorClassifier;
pub use config::{DetectionConfig, MonitorConfig, NoFacePolicy};
pub use error::MonitorError;
pub use events::{BehaviorEvent, EventLogger, EventSink};
pub use message::{DataTag, FunctionTag, Message};
pub use monitor::DriverMonitor;
pub use source::{FrameSource, LandmarkProvider, SignalProbe};
pub use state::SharedStateStore;
pub use types::{
    BehaviorState, FaceRegion, FacialLandmarks, Frame, FrameMetrics, Point, SignalReadings,
};

/// DriveGuard version recorded in event logs
pub const DRIVEGUARD_VERSION: &str = env!("CARGO_PKG_VERSION");
