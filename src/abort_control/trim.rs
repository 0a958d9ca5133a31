use super::config::LesConfig;
use crate::hardware::{LesHardware, LiftingSurfaceTrim};
use crate::util::Vec3D;
use crate::warn;

/// Adjusts the assembly's center-of-mass and center-of-lift parameters over
/// the course of the abort.
///
/// The real tower carried a dense ballast mass in the nose opposite the
/// escape motor; modeled as a single body, the center of mass would drift
/// too far aft as solid propellant burns off. While the escape motor runs,
/// the simulator shifts the effective center of mass forward in proportion
/// to the burned propellant. Canard deployment replaces that trim with the
/// deployed aerodynamic model. The host physics engine reads the current
/// offsets through the getters; nothing here simulates flight.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct TrimSimulator {
    com_offset_original: Vec3D<f64>,
    col_offset_original: Vec3D<f64>,
    ballast_divisor: f64,
    com_offset: Vec3D<f64>,
    col_offset: Vec3D<f64>,
    deployed: bool,
}

impl TrimSimulator {
    /// Forward shift of the center of lift once the canards are out.
    const COL_DEPLOY_SHIFT_Y: f64 = 1.45;
    /// Lift-deflection coefficient of the small deployed canards.
    const DEPLOYED_LIFT_COEFF: f64 = 0.35;

    pub fn new(config: &LesConfig) -> Self {
        Self {
            com_offset_original: config.com_offset,
            col_offset_original: config.col_offset,
            ballast_divisor: f64::from(config.ballast_divisor),
            com_offset: config.com_offset,
            col_offset: config.col_offset,
            deployed: false,
        }
    }

    /// Current center-of-mass offset, consumed by the host physics engine.
    pub const fn com_offset(&self) -> Vec3D<f64> { self.com_offset }

    /// Current center-of-lift offset, consumed by the host physics engine.
    pub const fn col_offset(&self) -> Vec3D<f64> { self.col_offset }

    /// Whether the deployed-canard aerodynamic model is active.
    pub const fn is_deployed(&self) -> bool { self.deployed }

    /// Shifts the effective center of mass in proportion to the propellant
    /// burned so far. Called every tick while the escape motor reports
    /// itself ignited on an assembly with pitch control.
    pub fn update_ballast_trim(&mut self, fuel_remaining: f64, max_fuel: f64) {
        let com_shift = (max_fuel - fuel_remaining) / self.ballast_divisor;
        self.com_offset = self
            .com_offset_original
            .with_y(self.com_offset_original.y() + com_shift);
    }

    /// Switches to the deployed-canard aerodynamic model.
    ///
    /// Resets the center of mass to its original offset, shifts the center
    /// of lift forward and hands the deployed lift/drag parameters to the
    /// governed lifting surface. Driven exactly once, by the transition
    /// into `CanardsDeployed`.
    pub fn on_canard_deploy(&mut self, hardware: &mut LesHardware) {
        self.com_offset = self.com_offset_original;
        self.apply_deployed_model(hardware);
    }

    /// Applies the deployed center-of-lift shift and lifting-surface
    /// parameters. Also used to rebuild the aerodynamic state when a saved
    /// sequence is restored at or past canard deployment.
    pub fn apply_deployed_model(&mut self, hardware: &mut LesHardware) {
        self.deployed = true;
        self.col_offset = self
            .col_offset_original
            .with_y(self.col_offset_original.y() + Self::COL_DEPLOY_SHIFT_Y);
        match hardware.lifting_surface.as_deref_mut() {
            Some(surface) => {
                surface.set_drag_model(true);
                surface.set_lift_coefficient(Self::DEPLOYED_LIFT_COEFF);
            }
            None => warn!("No lifting surface bound, deployed aero model skipped"),
        }
    }
}
