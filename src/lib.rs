//! Calibrated pixel-level HUD detection and input actuation.
//!
//! hudscan watches a full-screen application by sampling single pixels at
//! pre-calibrated coordinates, classifies what it sees against a
//! resolution-keyed calibration database, and resolves a gated compound
//! decision: is the application in its expected state, which equipment slot
//! and ammo class are active, which fire mode is selected, and which weapon
//! that combination identifies. A movement planner turns target
//! displacements into sequences of absolute repositioning commands.
//!
//! The expensive and platform-specific collaborators sit behind traits:
//! [`perception::sampler::PixelSampler`] for the pixel read,
//! [`executor::driver::InputDriver`] and
//! [`executor::driver::CursorProvider`] for actuation and the cursor query.
//! When the input driver cannot open, actuation degrades to no-ops and
//! detection keeps working.
//!
//! Everything is synchronous and blocking; a pixel sample costs 1–10 ms, so
//! callers rate-limit detection cycles rather than poll continuously.

pub mod calibration;
pub mod errors;
pub mod executor;
pub mod perception;

pub use calibration::{load_calibration, Calibration, Resolution};
pub use errors::{HudScanError, HudScanResult};
pub use perception::pipeline::{Detection, Pipeline};
