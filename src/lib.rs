//! Onboard abort sequencing and control for launch escape systems.
//!
//! One [`abort_control::AbortSequencer`] instance governs one escape
//! assembly. The host binds the physical collaborators through
//! [`hardware::LesHardware`], drives the sequencer with a fixed-step
//! `tick`, and issues `abort`/`jettison` as external commands. The crate
//! sets aerodynamic parameters for the host physics engine but never
//! simulates flight itself.

pub mod abort_control;
pub mod hardware;
pub mod util;
