//! Magnification session: the only state that survives between frames.
//!
//! A session is either idle or tracking one target (plane identity plus the
//! tapped world point). Each frame is evaluated from scratch against the
//! frame's own anchor snapshot; nothing else is carried over.
//!
//! Typical usage:
//! ```no_run
//! use plane_magnifier::prelude::*;
//!
//! # fn example(frames: Vec<CameraFrame<'_>>, tap: Pixel) {
//! let mut session = MagnifierSession::new(MagnifierParams::default());
//! session.select_target_at(&frames[0], tap);
//! for frame in &frames {
//!     if let Some(image) = session.process_frame(frame).into_image() {
//!         println!("display {}x{}", image.w, image.h);
//!     }
//! }
//! session.end();
//! # }
//! ```
use super::outcome::{FrameOutcome, FrameReport, SkipReason};
use super::params::MagnifierParams;
use super::pipeline::run_frame;
use crate::diagnostics::FrameTrace;
use crate::target::select_target;
use crate::types::{AnchorId, CameraFrame, Pixel};
use log::debug;
use nalgebra::Point3;
use serde::Serialize;
use std::time::Instant;

/// What the session is magnifying.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingTarget {
    pub anchor_id: AnchorId,
    /// World point the user selected, kept as chosen.
    pub tap_point: Point3<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Tracking(TrackingTarget),
}

/// Frame pipeline driver owning the per-session target.
pub struct MagnifierSession {
    params: MagnifierParams,
    state: SessionState,
}

impl MagnifierSession {
    pub fn new(params: MagnifierParams) -> Self {
        Self {
            params,
            state: SessionState::Idle,
        }
    }

    pub fn params(&self) -> &MagnifierParams {
        &self.params
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn target(&self) -> Option<&TrackingTarget> {
        match &self.state {
            SessionState::Tracking(target) => Some(target),
            SessionState::Idle => None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.target().is_some()
    }

    /// Start (or restart) magnifying the given plane.
    pub fn select_target(&mut self, anchor_id: AnchorId, tap_point: Point3<f64>) {
        debug!("session: tracking anchor {anchor_id:?} tap={tap_point:?}");
        self.state = SessionState::Tracking(TrackingTarget {
            anchor_id,
            tap_point,
        });
    }

    /// Hit-test `pixel` against `frame` and track whatever plane it lands on.
    ///
    /// Leaves the session untouched when the tap misses every anchor.
    pub fn select_target_at(&mut self, frame: &CameraFrame<'_>, pixel: Pixel) -> Option<TrackingTarget> {
        let hit = select_target(frame, pixel)?;
        self.select_target(hit.anchor_id, hit.point);
        self.target().copied()
    }

    /// Stop magnifying; subsequent frames are skipped until a new selection.
    pub fn end(&mut self) {
        if self.is_tracking() {
            debug!("session: ended");
        }
        self.state = SessionState::Idle;
    }

    /// Process one frame and return the image to display, if any.
    pub fn process_frame(&self, frame: &CameraFrame<'_>) -> FrameOutcome {
        self.process_frame_with_diagnostics(frame).outcome
    }

    /// Process one frame and return both the outcome and a detailed trace.
    pub fn process_frame_with_diagnostics(&self, frame: &CameraFrame<'_>) -> FrameReport {
        let total_start = Instant::now();
        let mut trace = FrameTrace {
            timestamp: frame.timestamp,
            ..FrameTrace::default()
        };
        let result = match &self.state {
            SessionState::Idle => Err(SkipReason::Idle),
            SessionState::Tracking(target) => run_frame(frame, target, &self.params, &mut trace),
        };
        if let Err(reason) = &result {
            debug!("session: frame {:.3} skipped: {reason}", frame.timestamp);
            trace.skipped = Some(reason.to_string());
        }
        trace.timing.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        FrameReport {
            outcome: result.into(),
            trace,
        }
    }
}
