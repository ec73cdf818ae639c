//! Behavior event persistence
//!
//! The application layer logs accepted behavior transitions from inside the
//! dispatched callback. The core loop never calls into this module.
//!
//! Each event becomes one line in `events.log` and, optionally, a PNG
//! snapshot of the originating frame.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::config::OutputConfig;
use crate::error::MonitorError;
use crate::types::{BehaviorState, Frame};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Sink for accepted behavior transitions
pub trait EventSink {
    /// Record one event. Returns false when the event could not be persisted.
    fn log_event(&mut self, behavior: BehaviorState, message: &str, frame: &Frame) -> bool;
}

/// One recorded behavior event
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorEvent {
    pub behavior: BehaviorState,
    pub message: String,
    pub timestamp: String,
    /// Snapshot path when an image was saved for this event
    pub image_path: Option<PathBuf>,
}

/// File-backed event sink: an append-only log plus per-event PNG snapshots
pub struct EventLogger {
    images_dir: PathBuf,
    save_images: bool,
    log_file: File,
    events: Mutex<Vec<BehaviorEvent>>,
}

impl EventLogger {
    pub fn new(
        events_dir: impl AsRef<Path>,
        images_dir: impl AsRef<Path>,
    ) -> Result<Self, MonitorError> {
        let events_dir = events_dir.as_ref();
        let images_dir = images_dir.as_ref().to_path_buf();
        fs::create_dir_all(events_dir)?;
        fs::create_dir_all(&images_dir)?;

        let log_path = events_dir.join("events.log");
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        info!(path = %log_path.display(), "event log opened");

        Ok(Self {
            images_dir,
            save_images: true,
            log_file,
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn from_config(output: &OutputConfig) -> Result<Self, MonitorError> {
        let mut logger = Self::new(&output.events_dir, &output.images_dir)?;
        logger.save_images = output.save_images;
        Ok(logger)
    }

    pub fn set_save_images(&mut self, save_images: bool) {
        self.save_images = save_images;
    }

    /// Copy of all events recorded so far
    pub fn events(&self) -> Vec<BehaviorEvent> {
        lock(&self.events).clone()
    }

    pub fn clear_events(&self) {
        lock(&self.events).clear();
    }

    fn save_image(
        &self,
        frame: &Frame,
        prefix: &str,
        timestamp: &str,
    ) -> Result<PathBuf, MonitorError> {
        let filename = format!("{prefix}_{timestamp}.png")
            .replace(' ', "_")
            .replace(':', "-");
        let path = self.images_dir.join(filename);
        image::save_buffer(
            &path,
            &frame.pixels,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )?;
        Ok(path)
    }

    fn write_line(&mut self, event: &BehaviorEvent) -> Result<(), MonitorError> {
        let image_path = event
            .image_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        writeln!(
            self.log_file,
            "{} | {} | {} | {}",
            event.timestamp,
            event.behavior.as_str(),
            event.message,
            image_path
        )?;
        self.log_file.flush()?;
        Ok(())
    }
}

impl EventSink for EventLogger {
    fn log_event(&mut self, behavior: BehaviorState, message: &str, frame: &Frame) -> bool {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let image_path = if self.save_images && !frame.is_empty() {
            match self.save_image(frame, behavior.as_str(), &timestamp) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(error = %e, "snapshot save failed");
                    None
                }
            }
        } else {
            None
        };

        let event = BehaviorEvent {
            behavior,
            message: message.to_string(),
            timestamp,
            image_path,
        };

        if let Err(e) = self.write_line(&event) {
            warn!(error = %e, "event log write failed");
            return false;
        }
        lock(&self.events).push(event);
        true
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame() -> Frame {
        Frame {
            seq: 1,
            width: 4,
            height: 4,
            pixels: vec![128; 4 * 4 * 3],
        }
    }

    #[test]
    fn test_log_event_appends_line_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let events_dir = dir.path().join("events");
        let images_dir = dir.path().join("images");
        let mut logger = EventLogger::new(&events_dir, &images_dir).unwrap();

        let ok = logger.log_event(
            BehaviorState::EyesClosed,
            BehaviorState::EyesClosed.alert_message(),
            &frame(),
        );
        assert!(ok);

        let log = fs::read_to_string(events_dir.join("events.log")).unwrap();
        assert!(log.contains("eyes_closed"));
        assert!(log.contains("stay alert"));

        let events = logger.events();
        assert_eq!(events.len(), 1);
        let image_path = events[0].image_path.as_ref().unwrap();
        assert!(image_path.exists());
        assert!(image_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("eyes_closed_"));
        // filename carries no characters that need escaping
        assert!(!image_path.file_name().unwrap().to_string_lossy().contains(':'));
    }

    #[test]
    fn test_snapshots_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger =
            EventLogger::new(dir.path().join("events"), dir.path().join("images")).unwrap();
        logger.set_save_images(false);

        assert!(logger.log_event(BehaviorState::Yawning, "msg", &frame()));
        assert_eq!(logger.events()[0].image_path, None);
    }

    #[test]
    fn test_empty_frame_skips_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger =
            EventLogger::new(dir.path().join("events"), dir.path().join("images")).unwrap();

        assert!(logger.log_event(BehaviorState::Drinking, "msg", &Frame::default()));
        assert_eq!(logger.events()[0].image_path, None);
    }

    #[test]
    fn test_clear_events() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger =
            EventLogger::new(dir.path().join("events"), dir.path().join("images")).unwrap();
        logger.log_event(BehaviorState::Normal, "msg", &frame());
        assert_eq!(logger.events().len(), 1);
        logger.clear_events();
        assert!(logger.events().is_empty());
    }

    #[test]
    fn test_from_config_honors_save_images() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            events_dir: dir.path().join("ev").display().to_string(),
            images_dir: dir.path().join("im").display().to_string(),
            save_images: false,
        };
        let mut logger = EventLogger::from_config(&output).unwrap();
        logger.log_event(BehaviorState::PhoneCalling, "msg", &frame());
        assert_eq!(logger.events()[0].image_path, None);
    }
}
