//! Capability interfaces for the physical collaborators governed by the
//! abort sequencer. The host binds concrete implementations at vehicle
//! initialization; the sequencer never performs discovery itself and
//! tolerates any capability being absent.

mod sim;

pub use sim::{SimDecoupler, SimDeployableSurface, SimEngine, SimLiftingSurface};

use crate::abort_control::EngineRole;
use strum_macros::Display;

/// Error raised by a failed separation attempt.
///
/// Failures are logged at the call site and never abort the remaining
/// jettison actions.
#[derive(Debug, Display)]
pub enum DecoupleError {
    AlreadyDecoupled,
    MechanismFault,
}

/// A solid motor with a single ignition and a commanded shutdown.
pub trait Engine {
    fn ignite(&mut self);
    fn shutdown(&mut self);
    fn is_ignited(&self) -> bool;
}

/// The separation mechanism between the escape assembly and the vehicle.
pub trait Decoupler {
    fn decouple(&mut self) -> Result<(), DecoupleError>;
}

/// A stowed control surface with a host-driven deployment animation.
pub trait DeployableSurface {
    fn toggle(&mut self);
}

/// Aerodynamic parameters of the governed lifting surface, consumed by the
/// host physics engine.
pub trait LiftingSurfaceTrim {
    fn set_lift_coefficient(&mut self, coeff: f64);
    fn set_drag_model(&mut self, internal: bool);
}

/// The capability bundle bound to one escape assembly.
///
/// Every field is optional: a missing collaborator degrades the
/// corresponding action to a logged no-op while the sequence itself still
/// advances.
#[derive(Default)]
pub struct LesHardware {
    pub escape_engine: Option<Box<dyn Engine>>,
    pub pitch_engine: Option<Box<dyn Engine>>,
    pub jettison_engine: Option<Box<dyn Engine>>,
    pub decoupler: Option<Box<dyn Decoupler>>,
    pub deploy_surface: Option<Box<dyn DeployableSurface>>,
    pub lifting_surface: Option<Box<dyn LiftingSurfaceTrim>>,
}

impl LesHardware {
    /// Creates a bundle with no capabilities bound.
    pub fn unbound() -> Self { Self::default() }

    /// The motor bound to `role`, if any.
    pub fn engine(&self, role: EngineRole) -> Option<&dyn Engine> {
        match role {
            EngineRole::Escape => self.escape_engine.as_deref(),
            EngineRole::Pitch => self.pitch_engine.as_deref(),
            EngineRole::Jettison => self.jettison_engine.as_deref(),
        }
    }

    /// Mutable access to the motor bound to `role`, if any.
    pub fn engine_mut(&mut self, role: EngineRole) -> Option<&mut (dyn Engine + 'static)> {
        match role {
            EngineRole::Escape => self.escape_engine.as_deref_mut(),
            EngineRole::Pitch => self.pitch_engine.as_deref_mut(),
            EngineRole::Jettison => self.jettison_engine.as_deref_mut(),
        }
    }
}
