use super::{
    abort_state::AbortState,
    attitude,
    config::LesConfig,
    propulsion::{EngineRole, PropulsionTimer},
    telemetry::VehicleTelemetry,
    trim::TrimSimulator,
};
use crate::hardware::{Decoupler, DeployableSurface, Engine, LesHardware};
use crate::{error, event, info, warn};
use chrono::{DateTime, Utc};

/// The persisted progress of the abort sequence.
///
/// The deadlines are computed once, when the abort command arrives, and
/// never change afterwards.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
pub struct SequenceState {
    state: AbortState,
    abort_time: Option<DateTime<Utc>>,
    canard_deploy_time: Option<DateTime<Utc>>,
    jettison_time: Option<DateTime<Utc>>,
}

impl SequenceState {
    pub const fn state(&self) -> AbortState { self.state }

    /// When the abort command was accepted.
    pub const fn abort_time(&self) -> Option<DateTime<Utc>> { self.abort_time }

    /// When the canards are scheduled to pop (pitch-control assemblies).
    pub const fn canard_deploy_time(&self) -> Option<DateTime<Utc>> { self.canard_deploy_time }

    /// When the tower is scheduled to jettison (timed-jettison assemblies).
    pub const fn jettison_time(&self) -> Option<DateTime<Utc>> { self.jettison_time }
}

/// Everything needed to reconstruct a sequencer after a save/reload:
/// configuration, sequence progress, motor clocks and trim state.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct SequencerSnapshot {
    pub config: LesConfig,
    pub sequence: SequenceState,
    pub propulsion: PropulsionTimer,
    pub trim: TrimSimulator,
}

/// The finite-state controller driving the whole abort sequence.
///
/// A host loop calls [`tick`](Self::tick) once per fixed simulation step;
/// [`abort`](Self::abort) and [`jettison`](Self::jettison) arrive as
/// external commands at any point between ticks. One sequencer instance
/// governs one escape assembly; all mutation happens through `&mut self`,
/// so a tick can never observe a half-updated sequence.
pub struct AbortSequencer {
    config: LesConfig,
    sequence: SequenceState,
    propulsion: PropulsionTimer,
    trim: TrimSimulator,
    hardware: LesHardware,
}

impl AbortSequencer {
    pub fn new(config: LesConfig, hardware: LesHardware) -> Self {
        let trim = TrimSimulator::new(&config);
        Self {
            config,
            sequence: SequenceState::default(),
            propulsion: PropulsionTimer::new(),
            trim,
            hardware,
        }
    }

    pub const fn state(&self) -> AbortState { self.sequence.state() }

    pub const fn config(&self) -> &LesConfig { &self.config }

    pub const fn sequence(&self) -> &SequenceState { &self.sequence }

    pub const fn propulsion(&self) -> &PropulsionTimer { &self.propulsion }

    pub const fn trim(&self) -> &TrimSimulator { &self.trim }

    /// Starts the abort sequence.
    ///
    /// No-op unless the sequence is still idle. Below
    /// [`LesConfig::LOW_ABORT_CEILING`] an assembly with pitch control
    /// lights both the escape and the pitch motor (Mode A); otherwise only
    /// the escape motor fires (Mode B). The canard-deployment and
    /// timed-jettison deadlines are fixed here, once.
    pub fn abort(&mut self, now: DateTime<Utc>, altitude: f64) {
        if self.sequence.state != AbortState::Idle {
            event!("Abort command ignored, sequence already running");
            return;
        }
        self.sequence.state = AbortState::Aborted;
        self.sequence.abort_time = Some(now);

        if self.config.has_pitch_control && altitude < LesConfig::LOW_ABORT_CEILING {
            info!("Abort mode A engaged at {altitude:.0}m");
            self.propulsion.ignite(EngineRole::Escape, now, &mut self.hardware);
            self.propulsion.ignite(EngineRole::Pitch, now, &mut self.hardware);
        } else {
            info!("Abort mode B engaged at {altitude:.0}m");
            self.propulsion.ignite(EngineRole::Escape, now, &mut self.hardware);
        }

        if self.config.has_pitch_control {
            self.sequence.canard_deploy_time = Some(now + self.config.canard_delay());
        } else if !self.config.jettisons_to_retro {
            let escape_ignition =
                self.propulsion.clock(EngineRole::Escape).ignition_time().unwrap_or(now);
            self.sequence.jettison_time = Some(escape_ignition + self.config.jettison_delay());
        }
    }

    /// Advances the sequence by one fixed simulation step.
    ///
    /// The order is load-bearing: the shutdown sweep and ballast trim run
    /// first, then canard deployment, then the jettison gate — so a canard
    /// deployment and a jettison triggered by it can land in the same step.
    pub fn tick(&mut self, telemetry: &VehicleTelemetry, now: DateTime<Utc>) {
        self.propulsion.sweep(now, &self.config, &mut self.hardware);
        if self.config.has_pitch_control
            && self.hardware.engine(EngineRole::Escape).is_some_and(Engine::is_ignited)
        {
            self.trim.update_ballast_trim(telemetry.fuel_remaining(), self.config.max_fuel);
        }

        if self.sequence.state == AbortState::Aborted
            && self.config.has_pitch_control
            && self.sequence.canard_deploy_time.is_some_and(|t| now >= t)
        {
            self.deploy_canards();
        }

        let armed = match self.sequence.state {
            AbortState::Aborted => !self.config.has_pitch_control,
            AbortState::CanardsDeployed => true,
            AbortState::Idle | AbortState::Jettisoned => false,
        };
        if armed && self.gate_holds(telemetry, now) {
            self.jettison(now);
        }
    }

    /// Separates the tower from the vehicle.
    ///
    /// Idempotent: only the first effective call performs the physical
    /// actions, whether it comes from the automatic gate or a manual
    /// command. A failed decouple is logged and does not stop the jettison
    /// motor from firing — each step of the sequence is independently
    /// life-critical.
    pub fn jettison(&mut self, now: DateTime<Utc>) {
        if self.sequence.state.is_terminal() {
            event!("Jettison command ignored, tower already jettisoned");
            return;
        }
        match self.hardware.decoupler.as_deref_mut() {
            Some(decoupler) => {
                if let Err(err) = decoupler.decouple() {
                    error!("Decouple failed: {err}");
                }
            }
            None => error!("No decoupler bound on the escape assembly!"),
        }
        self.propulsion.ignite(EngineRole::Jettison, now, &mut self.hardware);
        self.sequence.state = AbortState::Jettisoned;
        info!("Escape tower jettisoned");
    }

    /// Whether the jettison gate holds for the current step.
    ///
    /// Attitude-gated assemblies recompute the retrograde check fresh every
    /// tick; it is a pure function of current telemetry and has no upper
    /// time bound. Timed assemblies compare against the deadline fixed at
    /// abort.
    fn gate_holds(&self, telemetry: &VehicleTelemetry, now: DateTime<Utc>) -> bool {
        if self.sequence.state.is_terminal() {
            return false;
        }
        if self.config.has_pitch_control || self.config.jettisons_to_retro {
            let basis = telemetry.attitude();
            attitude::is_retrograde(
                telemetry.surface_velocity(),
                &basis,
                self.config.retro_tolerance_deg,
            )
        } else {
            self.sequence.jettison_time.is_some_and(|t| now >= t)
        }
    }

    fn deploy_canards(&mut self) {
        match self.hardware.deploy_surface.as_deref_mut() {
            Some(surface) => surface.toggle(),
            None => warn!("No deployable surface bound, canard animation skipped"),
        }
        self.trim.on_canard_deploy(&mut self.hardware);
        self.sequence.state = AbortState::CanardsDeployed;
        info!("Canards deployed");
    }

    /// Captures the persistable state of the sequencer.
    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            config: self.config.clone(),
            sequence: self.sequence.clone(),
            propulsion: self.propulsion.clone(),
            trim: self.trim.clone(),
        }
    }

    /// Rebuilds a sequencer from a snapshot and freshly bound hardware.
    ///
    /// If the canards were already out when the snapshot was taken, the
    /// deployed aerodynamic model is pushed to the new lifting surface so
    /// future behavior matches an uninterrupted run.
    pub fn restore(snapshot: SequencerSnapshot, hardware: LesHardware) -> Self {
        let mut sequencer = Self {
            config: snapshot.config,
            sequence: snapshot.sequence,
            propulsion: snapshot.propulsion,
            trim: snapshot.trim,
            hardware,
        };
        if sequencer.trim.is_deployed() {
            sequencer.trim.apply_deployed_model(&mut sequencer.hardware);
        }
        sequencer
    }
}
