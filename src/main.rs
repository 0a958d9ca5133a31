//! Fixed-step pad-abort demonstration.
//!
//! Builds a pitch-control escape assembly on simulated hardware, issues the
//! abort command shortly after liftoff and drives the sequencer with
//! synthetic telemetry until the tower is jettisoned: the escape motor
//! burns out, the canards pop at their deadline, the vehicle arcs over
//! into a retrograde fall and the attitude gate releases the tower.

use chrono::{DateTime, TimeDelta, Utc};
use les_ob::abort_control::{AbortSequencer, AttitudeBasis, LesConfig, VehicleTelemetry};
use les_ob::hardware::{
    Engine, LesHardware, SimDecoupler, SimDeployableSurface, SimEngine, SimLiftingSurface,
};
use les_ob::util::Vec3D;
use les_ob::{info, log};

const ABORT_AT: TimeDelta = TimeDelta::seconds(1);
const MAX_SIM_TIME: TimeDelta = TimeDelta::seconds(90);

/// Escape-motor acceleration while burning, in m/s^2.
const ESCAPE_ACCEL: f64 = 52.0;
const GRAVITY: f64 = 9.81;
/// Constant lateral drift so the yaw-plane angle is not trivially 180.
const LATERAL_VEL: f64 = 1.8;

struct SimRig {
    escape: SimEngine,
    pitch: SimEngine,
    jettison: SimEngine,
    decoupler: SimDecoupler,
    canards: SimDeployableSurface,
    lifting_surface: SimLiftingSurface,
}

fn init() -> (AbortSequencer, SimRig) {
    let config = LesConfig {
        has_pitch_control: true,
        max_fuel: 24.0,
        com_offset: Vec3D::new(0.0, -0.32, 0.0),
        ..LesConfig::default()
    };
    let rig = SimRig {
        escape: SimEngine::new(),
        pitch: SimEngine::new(),
        jettison: SimEngine::new(),
        decoupler: SimDecoupler::new(),
        canards: SimDeployableSurface::new(),
        lifting_surface: SimLiftingSurface::new(1.1),
    };
    let hardware = LesHardware {
        escape_engine: Some(Box::new(rig.escape.clone())),
        pitch_engine: Some(Box::new(rig.pitch.clone())),
        jettison_engine: Some(Box::new(rig.jettison.clone())),
        decoupler: Some(Box::new(rig.decoupler.clone())),
        deploy_surface: Some(Box::new(rig.canards.clone())),
        lifting_surface: Some(Box::new(rig.lifting_surface.clone())),
    };
    (AbortSequencer::new(config, hardware), rig)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn main() {
    let (mut sequencer, rig) = init();
    let sim_step = TimeDelta::milliseconds(20);
    let max_fuel = sequencer.config().max_fuel;
    let burn_rate = max_fuel / f64::from(sequencer.config().run_times.escape);

    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    let mut now = epoch;
    let mut altitude = 42.0;
    let mut vertical_vel = 0.0;
    let mut fuel = max_fuel;
    let mut aborted = false;
    let mut last_state = sequencer.state();

    info!("Pad abort simulation starting");
    while now - epoch < MAX_SIM_TIME {
        let dt = sim_step.num_milliseconds() as f64 / 1000.0;
        let thrust = if rig.escape.is_ignited() { ESCAPE_ACCEL } else { 0.0 };
        if rig.escape.is_ignited() {
            fuel = (fuel - burn_rate * dt).max(0.0);
        }
        vertical_vel += (thrust - GRAVITY) * dt;
        altitude += vertical_vel * dt;
        if altitude <= 0.0 {
            log!("Ground contact before jettison, stopping");
            break;
        }

        // Nose stays up while the velocity vector arcs over into the fall.
        let basis = AttitudeBasis::new(
            Vec3D::new(0.0, 0.0, 1.0),
            Vec3D::new(1.0, 0.0, 0.0),
            Vec3D::new(0.0, 1.0, 0.0),
        );
        let velocity = Vec3D::new(LATERAL_VEL, vertical_vel, 0.0);
        let telemetry = VehicleTelemetry::new(velocity, basis, fuel, altitude);

        if !aborted && now - epoch >= ABORT_AT {
            sequencer.abort(now, telemetry.altitude());
            aborted = true;
        }
        sequencer.tick(&telemetry, now);

        let state = sequencer.state();
        if state != last_state {
            let elapsed = (now - epoch).num_milliseconds() as f64 / 1000.0;
            log!("t+{elapsed:.2}s: {last_state} -> {state} (alt {altitude:.0}m, vvel {vertical_vel:.1}m/s)");
            last_state = state;
        }
        if state.is_terminal() && rig.jettison.shutdown_count() > 0 {
            break;
        }
        now += sim_step;
    }

    info!(
        "Simulation done: decoupled={}, canards deployed={}, pitch motor firings={}, lift coeff={:.2}",
        rig.decoupler.is_decoupled(),
        rig.canards.is_deployed(),
        rig.pitch.ignite_count(),
        rig.lifting_surface.lift_coefficient()
    );
}
