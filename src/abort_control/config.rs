use crate::util::Vec3D;
use chrono::TimeDelta;

/// Fixed burn durations for the three motors, in seconds.
///
/// The motors are modeled with a fixed run time rather than a fixed
/// propellant mass, which keeps the sequencer independent of the host
/// engine's combustion model.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy)]
pub struct EngineRunTimes {
    pub escape: f32,
    pub pitch: f32,
    pub jettison: f32,
}

impl Default for EngineRunTimes {
    fn default() -> Self {
        Self {
            escape: 3.3,
            pitch: 0.7,
            jettison: 1.2,
        }
    }
}

/// Immutable configuration of one escape assembly.
///
/// Captured once at vehicle initialization and persisted alongside the
/// sequence state. The two flags select between the historical hardware
/// variants: towers with pitch control wait for canard deployment and a
/// retrograde attitude before jettisoning, towers without either jettison
/// on a timer or (with `jettisons_to_retro`) on attitude alone.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct LesConfig {
    /// Whether this assembly carries canards and a pitch-control motor.
    pub has_pitch_control: bool,
    /// Whether a tower without pitch control still waits for a retrograde
    /// attitude instead of a timer before jettisoning.
    pub jettisons_to_retro: bool,
    /// Delay between the abort command and canard deployment, in seconds.
    pub canard_delay_secs: f32,
    /// Delay between escape-motor ignition and jettison for towers that
    /// jettison on a timer, in seconds.
    pub jettison_delay_secs: f32,
    /// Burn durations for the three motors.
    pub run_times: EngineRunTimes,
    /// Divisor translating burned propellant mass into a center-of-mass
    /// shift along the vehicle's long axis.
    pub ballast_divisor: f32,
    /// Center-of-mass offset of the unlit assembly.
    pub com_offset: Vec3D<f64>,
    /// Center-of-lift offset of the stowed assembly.
    pub col_offset: Vec3D<f64>,
    /// Escape-motor propellant capacity captured at initialization.
    pub max_fuel: f64,
    /// Minimum per-axis alignment angle, in degrees, for the attitude gate.
    pub retro_tolerance_deg: f64,
}

impl LesConfig {
    /// Below this altitude an abort with pitch control also lights the
    /// pitch motor to kick the vehicle away from the pad (Mode A).
    pub const LOW_ABORT_CEILING: f64 = 3000.0;

    /// Canards must point the vehicle within 5 degrees of retrograde on
    /// both axes before the tower may leave.
    pub const DEFAULT_RETRO_TOLERANCE_DEG: f64 = 175.0;

    /// Run time of a motor by its role, in seconds.
    pub fn run_time_secs(&self, role: super::EngineRole) -> f32 {
        match role {
            super::EngineRole::Escape => self.run_times.escape,
            super::EngineRole::Pitch => self.run_times.pitch,
            super::EngineRole::Jettison => self.run_times.jettison,
        }
    }

    /// Canard deployment delay as a time delta.
    pub fn canard_delay(&self) -> TimeDelta { secs_to_delta(self.canard_delay_secs) }

    /// Timed-jettison delay as a time delta.
    pub fn jettison_delay(&self) -> TimeDelta { secs_to_delta(self.jettison_delay_secs) }
}

impl Default for LesConfig {
    fn default() -> Self {
        Self {
            has_pitch_control: false,
            jettisons_to_retro: false,
            canard_delay_secs: 11.0,
            jettison_delay_secs: 10.0,
            run_times: EngineRunTimes::default(),
            ballast_divisor: 100.0,
            com_offset: Vec3D::zero(),
            col_offset: Vec3D::zero(),
            max_fuel: 0.0,
            retro_tolerance_deg: Self::DEFAULT_RETRO_TOLERANCE_DEG,
        }
    }
}

/// Converts a configured delay in seconds to a `TimeDelta` with millisecond
/// resolution. Negative inputs clamp to zero.
pub(crate) fn secs_to_delta(secs: f32) -> TimeDelta {
    TimeDelta::milliseconds((secs.max(0.0) * 1000.0).round() as i64)
}
