// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camera capture session: device lifecycle and decode gating.
//
// The camera is a single exclusively-owned resource; only this module may
// acquire or release it.  Pausing is deliberately cheap — the decode callback
// becomes a no-op but the device stays open, because the player will resume
// scanning seconds after dismissing a card and device re-acquisition latency
// (plus a possible new permission prompt) would ruin the table flow.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rookierun_core::error::Result;
use rookierun_core::human_errors::{HumanError, humanize_error};
use rookierun_core::types::{CardIdentifier, ScanEvent};

use crate::debounce::ScanDebouncer;
use crate::identifier;

/// One camera as reported by device enumeration.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub id: String,
    pub label: String,
}

/// Constraint-style camera preference for when no concrete device id is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// The rear (world-facing) camera.
    Environment,
    /// The front (selfie) camera.
    User,
}

/// How the session asks the platform to open a camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraSelection {
    /// A specific device from enumeration.
    DeviceId(String),
    /// A facing-mode constraint; the platform picks the device.
    Facing(FacingMode),
}

/// Platform camera handle.
///
/// Implementations classify acquisition failures through
/// [`rookierun_core::error::classify_camera_failure`] so the session can
/// surface them.  `close` must be safe to call when the device was never
/// opened — the session calls it unconditionally on teardown.
pub trait CameraDevice {
    /// List available cameras.  May fail on platforms that gate enumeration
    /// behind permissions; the session falls back to a facing-mode constraint.
    fn enumerate(&self) -> Result<Vec<CameraInfo>>;

    /// Acquire the device and attach the decode loop.
    fn open(&mut self, selection: &CameraSelection) -> Result<()>;

    /// Release the device and detach all decode callbacks.
    fn close(&mut self);
}

/// Pick a camera from an enumeration snapshot.
///
/// Prefers a device whose label indicates it faces away from the player;
/// otherwise the first enumerated device; an empty list falls back to an
/// environment facing-mode constraint rather than failing.
pub fn select_camera(cameras: &[CameraInfo]) -> CameraSelection {
    if let Some(back) = cameras.iter().find(|c| {
        let label = c.label.to_ascii_lowercase();
        label.contains("back") || label.contains("rear")
    }) {
        return CameraSelection::DeviceId(back.id.clone());
    }
    match cameras.first() {
        Some(first) => CameraSelection::DeviceId(first.id.clone()),
        None => CameraSelection::Facing(FacingMode::Environment),
    }
}

/// Lifecycle states of the capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Created, camera not yet requested.
    Idle,
    /// Acquiring the device.
    Starting,
    /// Decoding frames and emitting identifiers.
    Running,
    /// Device held open, decode results discarded.
    Paused,
    /// Device acquisition failed — manual retry allowed.
    Error,
    /// Device released; terminal.
    Stopped,
}

/// Owns the camera device and gates the decode stream.
///
/// Accepted identifiers are emitted on a single-consumer channel; the
/// extractor and debouncer run synchronously inside [`handle_decode`] so no
/// state leaks into decode-callback closures.
///
/// [`handle_decode`]: CaptureSession::handle_decode
pub struct CaptureSession<D: CameraDevice> {
    device: D,
    state: CaptureState,
    last_error: Option<HumanError>,
    debouncer: ScanDebouncer,
    events: mpsc::UnboundedSender<CardIdentifier>,
}

impl<D: CameraDevice> CaptureSession<D> {
    /// Create a session and the receiving half of its identifier channel.
    pub fn new(
        device: D,
        debounce_window: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<CardIdentifier>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                device,
                state: CaptureState::Idle,
                last_error: None,
                debouncer: ScanDebouncer::new(debounce_window),
                events,
            },
            receiver,
        )
    }

    /// Acquire the camera and begin decoding.
    ///
    /// No-op if the session is already running or paused.  On failure the
    /// session enters `Error` (not `Stopped`) so the player can retry without
    /// re-navigating; the classified error is recorded and returned.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            CaptureState::Running | CaptureState::Paused | CaptureState::Starting => {
                debug!(state = ?self.state, "capture session already active");
                return Ok(());
            }
            CaptureState::Idle | CaptureState::Error | CaptureState::Stopped => {}
        }

        self.state = CaptureState::Starting;
        self.last_error = None;

        // Enumeration failure is not fatal — fall back to a facing-mode
        // constraint and let the platform pick.
        let selection = match self.device.enumerate() {
            Ok(cameras) => select_camera(&cameras),
            Err(e) => {
                debug!(error = %e, "camera enumeration failed — using facing-mode fallback");
                CameraSelection::Facing(FacingMode::Environment)
            }
        };

        match self.device.open(&selection) {
            Ok(()) => {
                self.debouncer.reset();
                self.state = CaptureState::Running;
                info!(?selection, "capture session running");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "camera acquisition failed");
                self.last_error = Some(humanize_error(&err));
                self.state = CaptureState::Error;
                Err(err)
            }
        }
    }

    /// Stop forwarding decode results without releasing the device.
    pub fn pause(&mut self) {
        if self.state == CaptureState::Running {
            self.state = CaptureState::Paused;
            debug!("capture paused — device stays open");
        }
    }

    /// Resume forwarding decode results.
    pub fn resume(&mut self) {
        if self.state == CaptureState::Paused {
            self.state = CaptureState::Running;
            debug!("capture resumed");
        }
    }

    /// Release the camera and detach decode callbacks.
    ///
    /// Idempotent, and safe to call from teardown paths where the prior
    /// state is unknown.
    pub fn stop(&mut self) {
        if self.state == CaptureState::Stopped {
            return;
        }
        self.device.close();
        self.state = CaptureState::Stopped;
        info!("capture session stopped");
    }

    /// Feed one decode attempt through the pipeline.
    ///
    /// While paused (or in any non-running state) events are discarded
    /// before extraction.  Malformed text is rejected silently; the camera
    /// keeps scanning.  Returns the identifier if it was emitted.
    pub fn handle_decode(&mut self, event: ScanEvent) -> Option<CardIdentifier> {
        if self.state != CaptureState::Running {
            return None;
        }

        let id = match identifier::extract(&event.raw_text) {
            Some(id) => id,
            None => {
                debug!(raw = event.raw_text, "ignoring non-card decode");
                return None;
            }
        };

        if !self.debouncer.should_accept(&id, event.at) {
            return None;
        }

        // The receiver disappearing mid-teardown is not an error.
        let _ = self.events.send(id.clone());
        Some(id)
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The classified error from the last failed start, if any.
    pub fn last_error(&self) -> Option<&HumanError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use rookierun_core::error::{RookieError, classify_camera_failure};

    /// Observable side of the fake camera, shared with the test body.
    #[derive(Default)]
    struct CameraLog {
        opens: usize,
        closes: usize,
        last_selection: Option<CameraSelection>,
        /// When set, `open` fails with this platform error name.
        open_failure: Option<&'static str>,
    }

    /// Scriptable fake camera that records lifecycle calls.
    struct FakeCamera {
        cameras: Vec<CameraInfo>,
        enumerate_fails: bool,
        log: Rc<RefCell<CameraLog>>,
    }

    impl FakeCamera {
        fn with_cameras(labels: &[&str]) -> (Self, Rc<RefCell<CameraLog>>) {
            let log = Rc::new(RefCell::new(CameraLog::default()));
            let camera = Self {
                cameras: labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| CameraInfo {
                        id: format!("cam-{i}"),
                        label: (*label).to_string(),
                    })
                    .collect(),
                enumerate_fails: false,
                log: Rc::clone(&log),
            };
            (camera, log)
        }
    }

    impl CameraDevice for FakeCamera {
        fn enumerate(&self) -> Result<Vec<CameraInfo>> {
            if self.enumerate_fails {
                Err(RookieError::UnknownCamera("enumeration blocked".into()))
            } else {
                Ok(self.cameras.clone())
            }
        }

        fn open(&mut self, selection: &CameraSelection) -> Result<()> {
            let mut log = self.log.borrow_mut();
            log.opens += 1;
            log.last_selection = Some(selection.clone());
            match log.open_failure {
                Some(name) => Err(classify_camera_failure(name)),
                None => Ok(()),
            }
        }

        fn close(&mut self) {
            self.log.borrow_mut().closes += 1;
        }
    }

    const WINDOW: Duration = Duration::from_millis(1500);

    fn decode(raw: &str, at: Instant) -> ScanEvent {
        ScanEvent {
            raw_text: raw.to_string(),
            at,
        }
    }

    #[test]
    fn selection_prefers_back_facing_label() {
        let front = CameraInfo { id: "0".into(), label: "Front Camera".into() };
        let back = CameraInfo { id: "1".into(), label: "Back Ultra Wide Camera".into() };
        assert_eq!(
            select_camera(&[front.clone(), back]),
            CameraSelection::DeviceId("1".into())
        );
        assert_eq!(select_camera(&[front]), CameraSelection::DeviceId("0".into()));
        assert_eq!(
            select_camera(&[]),
            CameraSelection::Facing(FacingMode::Environment)
        );
    }

    #[test]
    fn start_reaches_running_and_emits_scans() {
        let (camera, _log) = FakeCamera::with_cameras(&["rear camera"]);
        let (mut session, mut rx) = CaptureSession::new(camera, WINDOW);

        session.start().expect("start");
        assert_eq!(session.state(), CaptureState::Running);

        let now = Instant::now();
        let id = session
            .handle_decode(decode("https://host/cards/rr-mlb-002", now))
            .expect("emitted");
        assert_eq!(id.as_str(), "RR-MLB-002");
        assert_eq!(rx.try_recv().expect("channel has id").as_str(), "RR-MLB-002");
    }

    #[test]
    fn enumeration_failure_falls_back_to_facing_mode() {
        let (mut camera, log) = FakeCamera::with_cameras(&[]);
        camera.enumerate_fails = true;
        let (mut session, _rx) = CaptureSession::new(camera, WINDOW);

        session.start().expect("start still succeeds");
        assert_eq!(
            log.borrow().last_selection,
            Some(CameraSelection::Facing(FacingMode::Environment))
        );
    }

    #[test]
    fn open_failure_enters_error_state_and_allows_retry() {
        let (camera, log) = FakeCamera::with_cameras(&["back"]);
        log.borrow_mut().open_failure = Some("NotAllowedError");
        let (mut session, _rx) = CaptureSession::new(camera, WINDOW);

        assert!(matches!(session.start(), Err(RookieError::PermissionDenied)));
        assert_eq!(session.state(), CaptureState::Error);
        assert!(session.last_error().is_some());

        // Manual retry after the player grants permission.
        log.borrow_mut().open_failure = None;
        session.start().expect("retry succeeds");
        assert_eq!(session.state(), CaptureState::Running);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn pause_and_resume_do_not_touch_the_device() {
        let (camera, log) = FakeCamera::with_cameras(&["back"]);
        let (mut session, _rx) = CaptureSession::new(camera, WINDOW);
        session.start().expect("start");

        session.pause();
        assert_eq!(session.state(), CaptureState::Paused);
        session.resume();
        assert_eq!(session.state(), CaptureState::Running);

        // One open at start, nothing since — no re-acquisition on resume.
        assert_eq!(log.borrow().opens, 1);
        assert_eq!(log.borrow().closes, 0);
    }

    #[test]
    fn paused_session_discards_decodes() {
        let (camera, _log) = FakeCamera::with_cameras(&["back"]);
        let (mut session, mut rx) = CaptureSession::new(camera, WINDOW);
        session.start().expect("start");
        session.pause();

        assert!(
            session
                .handle_decode(decode("RR-MLB-002", Instant::now()))
                .is_none()
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let (camera, log) = FakeCamera::with_cameras(&["back"]);
        let (mut session, _rx) = CaptureSession::new(camera, WINDOW);
        session.start().expect("start");
        session.start().expect("second start");
        assert_eq!(log.borrow().opens, 1);
    }

    #[test]
    fn stop_is_idempotent_and_safe_from_any_state() {
        let (camera, log) = FakeCamera::with_cameras(&["back"]);
        let (mut session, _rx) = CaptureSession::new(camera, WINDOW);
        session.start().expect("start");
        session.stop();
        session.stop();
        assert_eq!(session.state(), CaptureState::Stopped);
        assert_eq!(log.borrow().closes, 1);

        // Stopping a session that never started must not panic.
        let (idle_camera, _idle_log) = FakeCamera::with_cameras(&[]);
        let (mut session, _rx) = CaptureSession::new(idle_camera, WINDOW);
        session.stop();
        assert_eq!(session.state(), CaptureState::Stopped);
    }

    #[test]
    fn stopped_session_ignores_decodes() {
        let (camera, _log) = FakeCamera::with_cameras(&["back"]);
        let (mut session, _rx) = CaptureSession::new(camera, WINDOW);
        session.start().expect("start");
        session.stop();
        assert!(
            session
                .handle_decode(decode("RR-MLB-002", Instant::now()))
                .is_none()
        );
    }

    #[test]
    fn duplicate_frames_are_debounced() {
        let (camera, _log) = FakeCamera::with_cameras(&["back"]);
        let (mut session, _rx) = CaptureSession::new(camera, WINDOW);
        session.start().expect("start");

        let t0 = Instant::now();
        assert!(session.handle_decode(decode("RR-MLB-002", t0)).is_some());
        assert!(
            session
                .handle_decode(decode("RR-MLB-002", t0 + Duration::from_millis(100)))
                .is_none()
        );
        assert!(
            session
                .handle_decode(decode("RR-NHL-014", t0 + Duration::from_millis(200)))
                .is_some()
        );
    }
}
