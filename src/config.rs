//! Monitor configuration
//!
//! Configuration is loaded from a JSON file and is fail-soft at every level:
//! a missing file, an unparseable file, or an absent key all resolve to the
//! built-in defaults rather than an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::MonitorError;

/// Top-level monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub camera: CameraConfig,
    pub detection: DetectionConfig,
    pub output: OutputConfig,
}

/// Capture device parameters
///
/// Geometry and frame rate are informational context passed through to the
/// frame source; the core does not enforce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub device_id: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

/// Classification thresholds and debounce windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// EAR below this value counts as an eyes-closed frame
    pub ear_threshold: f64,
    /// MAR above this value counts as a yawning frame
    pub mar_threshold: f64,
    /// Consecutive eyes-closed frames before EyesClosed fires
    pub eye_closed_frames: u32,
    /// Consecutive yawning frames before Yawning fires
    pub yawning_frames: u32,
    /// Leaky-bucket level the drinking counter must exceed to fire
    pub drinking_frames: u32,
    /// Leaky-bucket level the phone counter must exceed to fire
    pub phone_calling_frames: u32,
    /// What happens to debounce counters on frames with no detected face
    pub no_face_policy: NoFacePolicy,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            mar_threshold: 0.6,
            eye_closed_frames: 3,
            yawning_frames: 5,
            drinking_frames: 3,
            phone_calling_frames: 5,
            no_face_policy: NoFacePolicy::HoldCounters,
        }
    }
}

/// Counter policy for no-face-detected frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoFacePolicy {
    /// Counters carry over unchanged; a brief detector dropout does not
    /// restart an in-progress debounce window
    HoldCounters,
    /// All counters reset to zero when the face is lost
    ResetCounters,
}

impl Default for NoFacePolicy {
    fn default() -> Self {
        NoFacePolicy::HoldCounters
    }
}

/// Event and snapshot output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub events_dir: String,
    pub images_dir: String,
    pub save_images: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            events_dir: "events".to_string(),
            images_dir: "images".to_string(),
            save_images: true,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a JSON file.
    ///
    /// Missing file or malformed JSON falls back to defaults; keys absent
    /// from the file take their per-field defaults. Only I/O failures other
    /// than not-found are reported as errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        match serde_json::from_str::<MonitorConfig>(&content) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config parse failed, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = MonitorConfig::default();
        assert_eq!(config.detection.ear_threshold, 0.25);
        assert_eq!(config.detection.mar_threshold, 0.6);
        assert_eq!(config.detection.eye_closed_frames, 3);
        assert_eq!(config.detection.yawning_frames, 5);
        assert_eq!(config.detection.drinking_frames, 3);
        assert_eq!(config.detection.phone_calling_frames, 5);
        assert_eq!(config.detection.no_face_policy, NoFacePolicy::HoldCounters);
        assert_eq!(config.camera.device_id, 0);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.camera.height, 480);
        assert_eq!(config.camera.fps, 30);
        assert_eq!(config.output.events_dir, "events");
        assert!(config.output.save_images);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitorConfig::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_load_garbage_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not json").unwrap();
        let config = MonitorConfig::load(file.path()).unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"detection": {{"ear_threshold": 0.3, "no_face_policy": "reset_counters"}}}}"#
        )
        .unwrap();
        let config = MonitorConfig::load(file.path()).unwrap();
        assert_eq!(config.detection.ear_threshold, 0.3);
        assert_eq!(config.detection.no_face_policy, NoFacePolicy::ResetCounters);
        // untouched keys keep their defaults
        assert_eq!(config.detection.mar_threshold, 0.6);
        assert_eq!(config.camera.width, 640);
    }
}
