// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rookierun-scan — the QR decode-and-resolve pipeline.
//
// A camera frame stream feeds `CaptureSession`, which runs each raw decode
// through the identifier extractor and the debouncer before emitting a
// `CardIdentifier` on a single-consumer channel.  `ResultGate` consumes those
// identifiers, runs at most one cancellable store lookup at a time, and tells
// the capture session when to pause (card on screen) and resume (dismissed).

pub mod announce;
pub mod capture;
pub mod debounce;
pub mod gate;
pub mod identifier;

pub use announce::{AnnouncePolicy, Speaker};
pub use capture::{CameraDevice, CaptureSession, CaptureState};
pub use debounce::ScanDebouncer;
pub use gate::{CaptureDirective, GateView, ResultGate};
