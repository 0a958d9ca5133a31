//! Simulated hardware used by the demo harness and the test suite.
//!
//! Each type is a cheap cloneable handle over shared interior state, so a
//! caller can hand one clone to the sequencer and keep another to observe
//! what was commanded. The counters are what the idempotence checks assert
//! against: irreversible actions must fire exactly once.

use super::{DecoupleError, Decoupler, DeployableSurface, Engine, LiftingSurfaceTrim};
use std::{cell::RefCell, rc::Rc};

#[derive(Debug, Default)]
struct EngineState {
    ignited: bool,
    ignite_count: u32,
    shutdown_count: u32,
}

/// A motor that tracks ignition/shutdown commands without burning anything.
#[derive(Debug, Clone, Default)]
pub struct SimEngine {
    state: Rc<RefCell<EngineState>>,
}

impl SimEngine {
    pub fn new() -> Self { Self::default() }

    pub fn ignite_count(&self) -> u32 { self.state.borrow().ignite_count }

    pub fn shutdown_count(&self) -> u32 { self.state.borrow().shutdown_count }
}

impl Engine for SimEngine {
    fn ignite(&mut self) {
        let mut state = self.state.borrow_mut();
        state.ignited = true;
        state.ignite_count += 1;
    }

    fn shutdown(&mut self) {
        let mut state = self.state.borrow_mut();
        state.ignited = false;
        state.shutdown_count += 1;
    }

    fn is_ignited(&self) -> bool { self.state.borrow().ignited }
}

#[derive(Debug, Default)]
struct DecouplerState {
    decoupled: bool,
    decouple_count: u32,
    fail_next: bool,
}

/// A separation mechanism that can be primed to fail on command.
#[derive(Debug, Clone, Default)]
pub struct SimDecoupler {
    state: Rc<RefCell<DecouplerState>>,
}

impl SimDecoupler {
    pub fn new() -> Self { Self::default() }

    /// Makes the next `decouple` call report a mechanism fault.
    pub fn prime_fault(&self) { self.state.borrow_mut().fail_next = true; }

    pub fn decouple_count(&self) -> u32 { self.state.borrow().decouple_count }

    pub fn is_decoupled(&self) -> bool { self.state.borrow().decoupled }
}

impl Decoupler for SimDecoupler {
    fn decouple(&mut self) -> Result<(), DecoupleError> {
        let mut state = self.state.borrow_mut();
        state.decouple_count += 1;
        if state.fail_next {
            state.fail_next = false;
            return Err(DecoupleError::MechanismFault);
        }
        if state.decoupled {
            return Err(DecoupleError::AlreadyDecoupled);
        }
        state.decoupled = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct DeployableState {
    deployed: bool,
    toggle_count: u32,
}

/// A stowed surface whose deployment state flips on every toggle.
#[derive(Debug, Clone, Default)]
pub struct SimDeployableSurface {
    state: Rc<RefCell<DeployableState>>,
}

impl SimDeployableSurface {
    pub fn new() -> Self { Self::default() }

    pub fn toggle_count(&self) -> u32 { self.state.borrow().toggle_count }

    pub fn is_deployed(&self) -> bool { self.state.borrow().deployed }
}

impl DeployableSurface for SimDeployableSurface {
    fn toggle(&mut self) {
        let mut state = self.state.borrow_mut();
        state.deployed = !state.deployed;
        state.toggle_count += 1;
    }
}

#[derive(Debug)]
struct LiftingSurfaceState {
    lift_coefficient: f64,
    internal_drag: bool,
}

/// A lifting surface that records the last aero parameters it was given.
#[derive(Debug, Clone)]
pub struct SimLiftingSurface {
    state: Rc<RefCell<LiftingSurfaceState>>,
}

impl SimLiftingSurface {
    pub fn new(lift_coefficient: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(LiftingSurfaceState {
                lift_coefficient,
                internal_drag: false,
            })),
        }
    }

    pub fn lift_coefficient(&self) -> f64 { self.state.borrow().lift_coefficient }

    pub fn internal_drag(&self) -> bool { self.state.borrow().internal_drag }
}

impl LiftingSurfaceTrim for SimLiftingSurface {
    fn set_lift_coefficient(&mut self, coeff: f64) {
        self.state.borrow_mut().lift_coefficient = coeff;
    }

    fn set_drag_model(&mut self, internal: bool) {
        self.state.borrow_mut().internal_drag = internal;
    }
}
