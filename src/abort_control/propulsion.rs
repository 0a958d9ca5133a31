use super::config::{LesConfig, secs_to_delta};
use crate::hardware::{Engine, LesHardware};
use crate::{info, warn};
use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// The three motor roles of the escape assembly.
#[derive(serde::Serialize, serde::Deserialize, Debug, Display, EnumIter, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EngineRole {
    Escape,
    Pitch,
    Jettison,
}

/// Per-motor timing state.
///
/// `ignition_time` is recorded once, by the first ignition command;
/// `shutdown_commanded` is set at most once, by the sweep, and only while
/// the motor reports itself ignited.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default)]
pub struct EngineClock {
    ignition_time: Option<DateTime<Utc>>,
    shutdown_commanded: bool,
}

impl EngineClock {
    pub const fn ignition_time(&self) -> Option<DateTime<Utc>> { self.ignition_time }

    pub const fn shutdown_commanded(&self) -> bool { self.shutdown_commanded }
}

/// Tracks motor ignition times and commands timed shutdowns.
///
/// Ignition is idempotent per role: a second ignite command while a motor
/// is already running is ignored and never restarts its clock.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
pub struct PropulsionTimer {
    escape: EngineClock,
    pitch: EngineClock,
    jettison: EngineClock,
}

impl PropulsionTimer {
    pub fn new() -> Self { Self::default() }

    pub fn clock(&self, role: EngineRole) -> &EngineClock {
        match role {
            EngineRole::Escape => &self.escape,
            EngineRole::Pitch => &self.pitch,
            EngineRole::Jettison => &self.jettison,
        }
    }

    fn clock_mut(&mut self, role: EngineRole) -> &mut EngineClock {
        match role {
            EngineRole::Escape => &mut self.escape,
            EngineRole::Pitch => &mut self.pitch,
            EngineRole::Jettison => &mut self.jettison,
        }
    }

    /// Records the ignition time for `role` and commands ignition on the
    /// bound motor. No-op if the motor was already ignited once.
    pub fn ignite(&mut self, role: EngineRole, now: DateTime<Utc>, hardware: &mut LesHardware) {
        let clock = self.clock_mut(role);
        if clock.ignition_time.is_some() {
            return;
        }
        clock.ignition_time = Some(now);
        match hardware.engine_mut(role) {
            Some(engine) => {
                engine.ignite();
                info!("{role} motor ignited");
            }
            None => warn!("No {role} motor bound, ignition skipped"),
        }
    }

    /// Commands shutdown for every running motor whose run time has
    /// elapsed. Each shutdown is commanded at most once and only while the
    /// motor still reports itself ignited.
    pub fn sweep(&mut self, now: DateTime<Utc>, config: &LesConfig, hardware: &mut LesHardware) {
        for role in EngineRole::iter() {
            let clock = self.clock(role);
            let Some(ignition_time) = clock.ignition_time else {
                continue;
            };
            if clock.shutdown_commanded {
                continue;
            }
            let Some(engine) = hardware.engine_mut(role) else {
                continue;
            };
            if !engine.is_ignited() {
                continue;
            }
            if now - ignition_time >= secs_to_delta(config.run_time_secs(role)) {
                engine.shutdown();
                self.clock_mut(role).shutdown_commanded = true;
                info!("{role} motor shut down after its run time");
            }
        }
    }
}
