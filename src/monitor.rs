//! Producer loop and lifecycle
//!
//! [`DriverMonitor`] owns the capture device, the landmark provider, the
//! signal probe, and all classification state. A single producer thread runs
//! the cycle: acquire frame → detect face → extract metrics → classify →
//! publish → dispatch. Reader threads only ever touch the
//! [`SharedStateStore`].
//!
//! Lifecycle: Idle → Running on `start`, Running → Idle on `stop`. `stop`
//! sets a cooperative cancellation flag and joins the producer, so after it
//! returns no further publish or callback can occur. Cancellation is checked
//! only at cycle boundaries; a cycle in flight always completes.
//!
//! Callback fault policy is fail-fast: a panicking callback unwinds the
//! producer thread, and the next `stop` reports
//! [`MonitorError::ProducerPanicked`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::classifier::BehaviorClassifier;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::metrics;
use crate::source::{FrameSource, LandmarkProvider, SignalProbe};
use crate::state::SharedStateStore;
use crate::types::{BehaviorState, Frame, SignalReadings};

/// Target cycle cadence (~30 fps). Cadence slips under load rather than
/// dropping frames; the loop serves a live sensor, not a replay queue.
pub const CYCLE_INTERVAL: Duration = Duration::from_millis(33);

/// Handler invoked once per accepted behavior transition, synchronously on
/// the producer thread. Bounding its execution time is the caller's
/// responsibility.
pub type BehaviorCallback = Box<dyn FnMut(BehaviorState, &str, Frame) + Send>;

/// Driver behavior monitor: producer-thread orchestration plus lifecycle
pub struct DriverMonitor<S, L, P> {
    config: MonitorConfig,
    shared: Arc<SharedStateStore>,
    running: Arc<AtomicBool>,
    /// Capture resources, present while Idle and moved into the producer
    /// thread while Running
    resources: Option<(S, L, P)>,
    handle: Option<JoinHandle<(S, L, P)>>,
}

impl<S, L, P> DriverMonitor<S, L, P>
where
    S: FrameSource + 'static,
    L: LandmarkProvider + 'static,
    P: SignalProbe + 'static,
{
    pub fn new(config: MonitorConfig, source: S, landmarks: L, probe: P) -> Self {
        Self {
            config,
            shared: Arc::new(SharedStateStore::new()),
            running: Arc::new(AtomicBool::new(false)),
            resources: Some((source, landmarks, probe)),
            handle: None,
        }
    }

    /// Store handle for reader threads
    pub fn shared(&self) -> Arc<SharedStateStore> {
        Arc::clone(&self.shared)
    }

    /// Copy of the most recently published frame
    pub fn current_frame(&self) -> Option<Frame> {
        self.shared.latest_frame()
    }

    /// Most recently published behavior
    pub fn current_behavior(&self) -> BehaviorState {
        self.shared.latest_behavior()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start the producer thread (Idle → Running).
    ///
    /// Fails without any state change when already running or when the
    /// capture device cannot be acquired.
    pub fn start<F>(&mut self, callback: F) -> Result<(), MonitorError>
    where
        F: FnMut(BehaviorState, &str, Frame) + Send + 'static,
    {
        if self.handle.is_some() {
            return Err(MonitorError::AlreadyRunning);
        }
        let device_id = self.config.camera.device_id;
        let Some((mut source, landmarks, probe)) = self.resources.take() else {
            // resources were lost to a panicked producer
            return Err(MonitorError::ResourceUnavailable(device_id));
        };
        if !source.open(device_id) {
            source.close();
            self.resources = Some((source, landmarks, probe));
            return Err(MonitorError::ResourceUnavailable(device_id));
        }

        let classifier = BehaviorClassifier::new(&self.config.detection);
        let running = Arc::clone(&self.running);
        let shared = Arc::clone(&self.shared);
        running.store(true, Ordering::SeqCst);

        self.handle = Some(thread::spawn(move || {
            produce(
                running,
                shared,
                source,
                landmarks,
                probe,
                classifier,
                Box::new(callback),
            )
        }));
        info!(device_id, "monitor started");
        Ok(())
    }

    /// Stop the producer thread (Running → Idle).
    ///
    /// Blocks until the in-flight cycle finishes; a no-op when idle. After
    /// return, no further snapshot or callback update occurs.
    pub fn stop(&mut self) -> Result<(), MonitorError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        self.running.store(false, Ordering::SeqCst);
        match handle.join() {
            Ok(resources) => {
                self.resources = Some(resources);
                info!("monitor stopped");
                Ok(())
            }
            Err(_) => {
                warn!("producer thread panicked before stop");
                Err(MonitorError::ProducerPanicked)
            }
        }
    }
}

impl<S, L, P> Drop for DriverMonitor<S, L, P> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.running.store(false, Ordering::SeqCst);
            let _ = handle.join();
        }
    }
}

/// Producer loop body. Returns the capture resources to the caller of `stop`
/// so the monitor can be restarted.
fn produce<S, L, P>(
    running: Arc<AtomicBool>,
    shared: Arc<SharedStateStore>,
    mut source: S,
    mut landmarks: L,
    mut probe: P,
    mut classifier: BehaviorClassifier,
    mut callback: BehaviorCallback,
) -> (S, L, P)
where
    S: FrameSource,
    L: LandmarkProvider,
    P: SignalProbe,
{
    // seeded to Normal: an initial Normal classification is not a transition
    let mut last_dispatched = BehaviorState::Normal;

    while running.load(Ordering::SeqCst) {
        let Some(frame) = source.read() else {
            warn!("frame capture failed, skipping cycle");
            thread::sleep(CYCLE_INTERVAL);
            continue;
        };

        let faces = landmarks.detect_faces(&frame);
        let behavior = match faces.first() {
            Some(region) => match landmarks.landmarks(&frame, region) {
                Some(lm) => {
                    let frame_metrics = metrics::frame_metrics(&lm);
                    let signals = SignalReadings {
                        drinking: probe.drinking(&frame),
                        phone_call: probe.phone_call(&frame, &lm),
                    };
                    classifier.observe(&frame_metrics, signals)
                }
                None => classifier.observe_no_face(),
            },
            None => classifier.observe_no_face(),
        };

        shared.publish_frame(frame.clone());
        shared.publish_behavior(behavior);

        if behavior != last_dispatched {
            debug!(from = %last_dispatched, to = %behavior, "behavior transition");
            callback(behavior, behavior.alert_message(), frame);
            last_dispatched = behavior;
        }

        thread::sleep(CYCLE_INTERVAL);
    }

    source.close();
    (source, landmarks, probe)
}
