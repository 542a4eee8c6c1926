//! Magnifier session driving the per-frame plane rectification pipeline.
//!
//! Overview
//! - A [`MagnifierSession`] is idle until a target is selected, either
//!   directly by anchor identity or by hit-testing a tap against the frame's
//!   tracked planes.
//! - Every frame re-locates the target plane by identity in the frame's own
//!   anchor snapshot. A plane that is not tracked in a frame skips that frame
//!   only; the session keeps its target.
//! - The plane's local extent is shrunk about its center until all four
//!   corners project on screen (see [`crate::bounds`]), then projected,
//!   labelled by screen position and warped to an upright rectangle.
//! - The result is a [`FrameOutcome`]: either a rectified image or the
//!   [`SkipReason`] explaining why nothing new should be displayed.
//!
//! Modules
//! - [`params`] – configuration shared by the stages.
//! - [`outcome`] – per-frame results and skip reasons.
//! - `pipeline` – the single-frame pass.
//! - [`session`] – the idle/tracking state machine.

pub mod outcome;
pub mod params;
mod pipeline;
pub mod session;

pub use outcome::{FrameOutcome, FrameReport, RectifiedFrame, SkipReason};
pub use params::MagnifierParams;
pub use session::{MagnifierSession, SessionState, TrackingTarget};
