//! Capability traits for external collaborators
//!
//! The monitor core never touches a camera, a face detector, or a real
//! drinking/phone detector directly. Each is an injected capability, owned
//! exclusively by the producer loop once the monitor starts.

use crate::types::{FaceRegion, FacialLandmarks, Frame};

/// Source of captured frames (camera, file replay, synthetic feed)
pub trait FrameSource: Send {
    /// Acquire the device. Returns false when the device cannot be opened.
    fn open(&mut self, device_id: u32) -> bool;

    /// Read one frame. None means a transient capture failure; the cycle is
    /// skipped and the next cadence tick retries.
    fn read(&mut self) -> Option<Frame>;

    /// Release the device.
    fn close(&mut self);
}

/// Face detection and landmark extraction
pub trait LandmarkProvider: Send {
    /// Detect faces in a frame, best candidate first. Only the first region
    /// is used; the rest are discarded.
    fn detect_faces(&mut self, frame: &Frame) -> Vec<FaceRegion>;

    /// Extract the 68-point landmark set for one face region. None is
    /// treated as a no-face frame.
    fn landmarks(&mut self, frame: &Frame, region: &FaceRegion) -> Option<FacialLandmarks>;
}

/// Per-frame boolean proxy signals for behaviors without a geometric test.
///
/// Real drinking/phone detectors are out of scope for the core; any
/// implementation of this trait can be substituted without touching the
/// classifier or the loop.
pub trait SignalProbe: Send {
    fn drinking(&mut self, frame: &Frame) -> bool;

    fn phone_call(&mut self, frame: &Frame, landmarks: &FacialLandmarks) -> bool;
}

/// Probe that never triggers; useful when only geometric signals matter
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProbe;

impl SignalProbe for NullProbe {
    fn drinking(&mut self, _frame: &Frame) -> bool {
        false
    }

    fn phone_call(&mut self, _frame: &Frame, _landmarks: &FacialLandmarks) -> bool {
        false
    }
}
