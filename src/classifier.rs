//! Debounced behavior classification
//!
//! The classifier owns four per-signal counters and maps noisy per-frame
//! triggers to one stable [`BehaviorState`]. The counter policies are
//! deliberately asymmetric:
//!
//! - EAR/MAR counters increment on a triggering frame and reset hard to zero
//!   on any non-triggering frame (strict consecutive-frame debounce).
//! - Drinking/phone proxy counters increment on a trigger and decay by one
//!   (floor zero) otherwise (leaky bucket), so an intermittent detector can
//!   still accumulate evidence.
//!
//! All state is owned by the producer thread; only the derived
//! [`BehaviorState`] ever crosses a thread boundary.

use tracing::trace;

use crate::config::{DetectionConfig, NoFacePolicy};
use crate::types::{BehaviorState, FrameMetrics, SignalReadings};

/// Per-signal debounce counters, exclusively owned by the classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SignalCounters {
    eye_closed: u32,
    yawning: u32,
    drinking: u32,
    phone_calling: u32,
}

/// Stateful debounce engine mapping per-frame signals to a behavior state
#[derive(Debug, Clone)]
pub struct BehaviorClassifier {
    config: DetectionConfig,
    counters: SignalCounters,
}

impl BehaviorClassifier {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            config: config.clone(),
            counters: SignalCounters::default(),
        }
    }

    /// Classify one frame with a detected face.
    ///
    /// Every counter is updated every frame; the result is the
    /// highest-priority fired state (PhoneCalling > Drinking > EyesClosed >
    /// Yawning), or Normal when nothing fires.
    pub fn observe(&mut self, metrics: &FrameMetrics, signals: SignalReadings) -> BehaviorState {
        let eyes_closed = self.observe_eyes(metrics.avg_ear);
        let yawning = self.observe_mouth(metrics.mar);
        let drinking = self.observe_drinking(signals.drinking);
        let phone_calling = self.observe_phone(signals.phone_call);

        let state = if phone_calling {
            BehaviorState::PhoneCalling
        } else if drinking {
            BehaviorState::Drinking
        } else if eyes_closed {
            BehaviorState::EyesClosed
        } else if yawning {
            BehaviorState::Yawning
        } else {
            BehaviorState::Normal
        };
        trace!(?state, counters = ?self.counters, "classified frame");
        state
    }

    /// Classify a frame with no detected face.
    ///
    /// The frame is reported as Normal; counter handling follows the
    /// configured [`NoFacePolicy`].
    pub fn observe_no_face(&mut self) -> BehaviorState {
        if self.config.no_face_policy == NoFacePolicy::ResetCounters {
            self.counters = SignalCounters::default();
        }
        BehaviorState::Normal
    }

    /// Zero all counters (called at loop start)
    pub fn reset(&mut self) {
        self.counters = SignalCounters::default();
    }

    fn observe_eyes(&mut self, avg_ear: f64) -> bool {
        if avg_ear < self.config.ear_threshold {
            self.counters.eye_closed += 1;
        } else {
            self.counters.eye_closed = 0;
        }
        self.counters.eye_closed >= self.config.eye_closed_frames
    }

    fn observe_mouth(&mut self, mar: f64) -> bool {
        if mar > self.config.mar_threshold {
            self.counters.yawning += 1;
        } else {
            self.counters.yawning = 0;
        }
        self.counters.yawning >= self.config.yawning_frames
    }

    fn observe_drinking(&mut self, triggered: bool) -> bool {
        if triggered {
            self.counters.drinking += 1;
        } else {
            self.counters.drinking = self.counters.drinking.saturating_sub(1);
        }
        self.counters.drinking > self.config.drinking_frames
    }

    fn observe_phone(&mut self, triggered: bool) -> bool {
        if triggered {
            self.counters.phone_calling += 1;
        } else {
            self.counters.phone_calling = self.counters.phone_calling.saturating_sub(1);
        }
        self.counters.phone_calling > self.config.phone_calling_frames
    }
}
