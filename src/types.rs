//! Core types for the DriveGuard pipeline
//!
//! This module defines the data that flows through each monitoring cycle:
//! captured frames, facial landmarks, derived geometry metrics, and the
//! classified behavior state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MonitorError;

/// Number of points in the facial landmark model (dlib 68-point layout)
pub const LANDMARK_COUNT: usize = 68;

/// A 2D point in image coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// One captured RGB frame
///
/// Frames are value types: the store and the callback always receive their
/// own copy, never an alias into producer-owned memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic sequence number assigned by the frame source
    pub seq: u64,
    pub width: u32,
    pub height: u32,
    /// Packed RGB8 pixel data, `width * height * 3` bytes
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Axis-aligned face bounding box reported by the detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Immutable per-frame facial landmark set (68-point dlib layout)
///
/// Anatomical regions by index: left eye 36-41, right eye 42-47, mouth
/// corners 48/54, outer lip vertical pair 51/57, inner lip vertical pair
/// 62/66.
#[derive(Debug, Clone, PartialEq)]
pub struct FacialLandmarks {
    points: Vec<Point>,
}

impl FacialLandmarks {
    /// Build a landmark set, rejecting anything that is not exactly 68 points
    pub fn new(points: Vec<Point>) -> Result<Self, MonitorError> {
        if points.len() != LANDMARK_COUNT {
            return Err(MonitorError::MalformedLandmarks(points.len()));
        }
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    /// Left eye contour, ordered p0..p5
    pub fn left_eye(&self) -> [Point; 6] {
        self.eye(36)
    }

    /// Right eye contour, ordered p0..p5
    pub fn right_eye(&self) -> [Point; 6] {
        self.eye(42)
    }

    fn eye(&self, start: usize) -> [Point; 6] {
        [
            self.points[start],
            self.points[start + 1],
            self.points[start + 2],
            self.points[start + 3],
            self.points[start + 4],
            self.points[start + 5],
        ]
    }
}

/// Geometry ratios derived from one frame's landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub left_ear: f64,
    pub right_ear: f64,
    pub avg_ear: f64,
    pub mar: f64,
}

/// Per-frame boolean proxy signals supplied by a [`crate::source::SignalProbe`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalReadings {
    pub drinking: bool,
    pub phone_call: bool,
}

/// Classified driver behavior
///
/// Exactly one state is active per cycle. On simultaneous triggers the
/// priority order is PhoneCalling > Drinking > EyesClosed > Yawning > Normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    Normal,
    EyesClosed,
    Yawning,
    Drinking,
    PhoneCalling,
    Unknown,
}

impl BehaviorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorState::Normal => "normal",
            BehaviorState::EyesClosed => "eyes_closed",
            BehaviorState::Yawning => "yawning",
            BehaviorState::Drinking => "drinking",
            BehaviorState::PhoneCalling => "phone_calling",
            BehaviorState::Unknown => "unknown",
        }
    }

    /// Advisory message dispatched alongside the state
    pub fn alert_message(&self) -> &'static str {
        match self {
            BehaviorState::Normal => "Driving state is good, keep it up",
            BehaviorState::EyesClosed => "Warning: eyes closed detected, stay alert!",
            BehaviorState::Yawning => {
                "Warning: yawning detected, you may be at risk of fatigued driving!"
            }
            BehaviorState::Drinking => "Warning: drinking detected, drive with caution!",
            BehaviorState::PhoneCalling => {
                "Warning: phone call detected, this is dangerous distracted driving!"
            }
            BehaviorState::Unknown => "Unknown driver behavior",
        }
    }
}

impl Default for BehaviorState {
    fn default() -> Self {
        BehaviorState::Normal
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
