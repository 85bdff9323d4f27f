//! Screen-side collaborators: pixel sampling, display queries, and the
//! calibration-driven classifiers that turn sampled colors into a decision.

#[cfg(windows)]
pub(crate) mod gdi;
pub mod hud;
pub mod pipeline;
pub mod sampler;
pub mod screen;
