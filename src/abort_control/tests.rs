use super::{
    AbortSequencer, AbortState, AttitudeBasis, EngineRole, LesConfig, SequencerSnapshot,
    VehicleTelemetry, attitude,
};
use crate::hardware::{
    Engine, LesHardware, SimDecoupler, SimDeployableSurface, SimEngine, SimLiftingSurface,
};
use crate::util::Vec3D;
use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, rng};

const MAX_FUEL: f64 = 24.0;

struct Rig {
    escape: SimEngine,
    pitch: SimEngine,
    jettison: SimEngine,
    decoupler: SimDecoupler,
    canards: SimDeployableSurface,
    lifting_surface: SimLiftingSurface,
}

fn rig() -> (LesHardware, Rig) {
    let rig = Rig {
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
    (hardware, rig)
}

fn timer_config() -> LesConfig {
    LesConfig {
        max_fuel: MAX_FUEL,
        com_offset: Vec3D::new(0.0, -0.32, 0.0),
        ..LesConfig::default()
    }
}

fn pitch_config() -> LesConfig {
    LesConfig {
        has_pitch_control: true,
        ..timer_config()
    }
}

fn retro_config() -> LesConfig {
    LesConfig {
        jettisons_to_retro: true,
        ..timer_config()
    }
}

fn t(secs: f64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::milliseconds((secs * 1000.0).round() as i64)
}

fn basis() -> AttitudeBasis {
    AttitudeBasis::new(
        Vec3D::new(0.0, 0.0, 1.0),
        Vec3D::new(1.0, 0.0, 0.0),
        Vec3D::new(0.0, 1.0, 0.0),
    )
}

/// Nose up, falling straight down: both axis angles at 180 degrees.
fn retro_telemetry(fuel: f64) -> VehicleTelemetry {
    VehicleTelemetry::new(Vec3D::new(0.1, -50.0, 0.0), basis(), fuel, 2000.0)
}

/// Nose up, still climbing: both axis angles near zero.
fn prograde_telemetry(fuel: f64) -> VehicleTelemetry {
    VehicleTelemetry::new(Vec3D::new(0.1, 60.0, 0.0), basis(), fuel, 2000.0)
}

#[test]
fn abort_is_idempotent() {
    let (hardware, rig) = rig();
    let mut seq = AbortSequencer::new(timer_config(), hardware);
    seq.abort(t(0.0), 500.0);
    seq.abort(t(1.0), 400.0);

    assert_eq!(seq.state(), AbortState::Aborted);
    assert_eq!(seq.sequence().abort_time(), Some(t(0.0)));
    assert_eq!(rig.escape.ignite_count(), 1);
    assert_eq!(
        seq.propulsion().clock(EngineRole::Escape).ignition_time(),
        Some(t(0.0))
    );
}

#[test]
fn jettison_is_idempotent() {
    let (hardware, rig) = rig();
    let mut seq = AbortSequencer::new(timer_config(), hardware);
    seq.jettison(t(0.0));
    seq.jettison(t(0.5));

    assert_eq!(seq.state(), AbortState::Jettisoned);
    assert_eq!(rig.decoupler.decouple_count(), 1);
    assert_eq!(rig.jettison.ignite_count(), 1);
}

#[test]
fn state_never_moves_backward() {
    let (hardware, _rig) = rig();
    let mut seq = AbortSequencer::new(pitch_config(), hardware);
    let mut previous = seq.state();
    let mut step = 0.0;
    let mut check = |seq: &AbortSequencer| {
        assert!(seq.state() >= previous);
        previous = seq.state();
    };

    while step < 30.0 {
        seq.tick(&prograde_telemetry(MAX_FUEL), t(step));
        check(&seq);
        if (step - 2.0).abs() < f64::EPSILON {
            seq.abort(t(step), 800.0);
            check(&seq);
        }
        step += 0.5;
    }
    // Retrograde telemetry releases the gate, then further commands must
    // leave the terminal state alone.
    seq.tick(&retro_telemetry(0.0), t(31.0));
    check(&seq);
    assert_eq!(seq.state(), AbortState::Jettisoned);
    seq.abort(t(32.0), 100.0);
    seq.jettison(t(32.0));
    seq.tick(&retro_telemetry(0.0), t(33.0));
    check(&seq);
}

#[test]
fn retrograde_holds_iff_both_axis_angles_reach_tolerance() {
    let basis = basis();
    let mut rand_gen = rng();
    for _ in 0..500 {
        // Build a velocity with a known angular offset per axis: deviation
        // d from straight-down maps to an axis angle of 180 - d degrees.
        let dev_yaw: f64 = rand_gen.random_range(0.0..15.0);
        let dev_pitch: f64 = rand_gen.random_range(0.0..15.0);
        let scale: f64 = rand_gen.random_range(0.5..80.0);
        let velocity = Vec3D::new(
            dev_yaw.to_radians().tan(),
            -1.0,
            dev_pitch.to_radians().tan(),
        ) * scale;

        let (yaw, pitch) = attitude::retro_axis_angles(velocity, &basis);
        assert!((yaw - (180.0 - dev_yaw)).abs() < 1e-6);
        assert!((pitch - (180.0 - dev_pitch)).abs() < 1e-6);

        let expected = yaw >= 175.0 && pitch >= 175.0;
        assert_eq!(attitude::is_retrograde(velocity, &basis, 175.0), expected);
        // The comparison is inclusive on both axes.
        assert!(attitude::is_retrograde(velocity, &basis, yaw.min(pitch)));
    }
}

#[test]
fn retrograde_is_false_for_degenerate_velocity() {
    let basis = basis();
    assert!(!attitude::is_retrograde(Vec3D::zero(), &basis, 175.0));
}

#[test]
fn scenario_timed_jettison_fires_at_the_deadline() {
    let (hardware, rig) = rig();
    let mut seq = AbortSequencer::new(timer_config(), hardware);
    seq.abort(t(0.0), 500.0);
    assert_eq!(seq.sequence().jettison_time(), Some(t(10.0)));

    seq.tick(&prograde_telemetry(MAX_FUEL), t(9.99));
    assert_eq!(seq.state(), AbortState::Aborted);

    seq.tick(&prograde_telemetry(MAX_FUEL), t(10.0));
    assert_eq!(seq.state(), AbortState::Jettisoned);
    assert_eq!(rig.decoupler.decouple_count(), 1);
    assert_eq!(rig.jettison.ignite_count(), 1);
}

#[test]
fn scenario_canards_deploy_at_the_deadline() {
    let (hardware, rig) = rig();
    let mut seq = AbortSequencer::new(pitch_config(), hardware);
    seq.abort(t(0.0), 1000.0);
    assert_eq!(seq.sequence().canard_deploy_time(), Some(t(11.0)));
    assert_eq!(seq.sequence().jettison_time(), None);

    // While the escape motor burns, the ballast trim shifts the center of
    // mass forward in proportion to the burned propellant.
    seq.tick(&prograde_telemetry(12.0), t(2.0));
    assert!((seq.trim().com_offset().y() - (-0.2)).abs() < 1e-9);

    seq.tick(&prograde_telemetry(0.0), t(10.99));
    assert_eq!(seq.state(), AbortState::Aborted);
    assert_eq!(rig.canards.toggle_count(), 0);

    seq.tick(&prograde_telemetry(0.0), t(11.0));
    assert_eq!(seq.state(), AbortState::CanardsDeployed);
    assert_eq!(rig.canards.toggle_count(), 1);
    // Deployment resets the center of mass and shifts the center of lift.
    assert!((seq.trim().com_offset().y() - (-0.32)).abs() < 1e-9);
    assert!((seq.trim().col_offset().y() - 1.45).abs() < 1e-9);
    assert!((rig.lifting_surface.lift_coefficient() - 0.35).abs() < 1e-9);
    assert!(rig.lifting_surface.internal_drag());
}

#[test]
fn scenario_abort_mode_depends_on_altitude() {
    let (hardware, rig_low) = rig();
    let mut seq = AbortSequencer::new(pitch_config(), hardware);
    seq.abort(t(0.0), 1000.0);
    assert_eq!(rig_low.escape.ignite_count(), 1);
    assert_eq!(rig_low.pitch.ignite_count(), 1);

    let (hardware, rig_high) = rig();
    let mut seq = AbortSequencer::new(pitch_config(), hardware);
    seq.abort(t(0.0), 5000.0);
    assert_eq!(rig_high.escape.ignite_count(), 1);
    assert_eq!(rig_high.pitch.ignite_count(), 0);

    // Without pitch control the altitude is irrelevant: escape motor only.
    let (hardware, rig_plain) = rig();
    let mut seq = AbortSequencer::new(timer_config(), hardware);
    seq.abort(t(0.0), 1000.0);
    assert_eq!(rig_plain.escape.ignite_count(), 1);
    assert_eq!(rig_plain.pitch.ignite_count(), 0);
}

#[test]
fn scenario_escape_motor_shuts_down_after_its_run_time() {
    let (hardware, rig) = rig();
    let mut seq = AbortSequencer::new(timer_config(), hardware);
    seq.abort(t(2.0), 500.0);
    assert!(rig.escape.is_ignited());

    seq.tick(&prograde_telemetry(10.0), t(5.29));
    assert_eq!(rig.escape.shutdown_count(), 0);

    seq.tick(&prograde_telemetry(8.0), t(5.3));
    assert_eq!(rig.escape.shutdown_count(), 1);
    assert!(seq.propulsion().clock(EngineRole::Escape).shutdown_commanded());

    // Never re-commanded afterwards.
    seq.tick(&prograde_telemetry(8.0), t(6.0));
    seq.tick(&prograde_telemetry(8.0), t(60.0));
    assert_eq!(rig.escape.shutdown_count(), 1);
}

#[test]
fn scenario_attitude_gate_ignores_elapsed_time() {
    let (hardware, rig) = rig();
    let mut seq = AbortSequencer::new(retro_config(), hardware);
    seq.abort(t(0.0), 500.0);
    assert_eq!(seq.sequence().jettison_time(), None);

    // Long past any timed deadline, still prograde: the tower stays.
    seq.tick(&prograde_telemetry(0.0), t(100.0));
    assert_eq!(seq.state(), AbortState::Aborted);
    assert_eq!(rig.decoupler.decouple_count(), 0);

    seq.tick(&retro_telemetry(0.0), t(100.02));
    assert_eq!(seq.state(), AbortState::Jettisoned);
    assert_eq!(rig.decoupler.decouple_count(), 1);
}

#[test]
fn pitch_control_gate_waits_for_canard_deployment() {
    let (hardware, rig) = rig();
    let mut seq = AbortSequencer::new(pitch_config(), hardware);
    seq.abort(t(0.0), 1000.0);

    // Retrograde before the canard deadline must not release the tower.
    seq.tick(&retro_telemetry(MAX_FUEL), t(5.0));
    assert_eq!(seq.state(), AbortState::Aborted);
    assert_eq!(rig.decoupler.decouple_count(), 0);

    // At the deadline the canards pop and the same step's gate check
    // releases the tower.
    seq.tick(&retro_telemetry(0.0), t(11.0));
    assert_eq!(seq.state(), AbortState::Jettisoned);
    assert_eq!(rig.canards.toggle_count(), 1);
    assert_eq!(rig.decoupler.decouple_count(), 1);
}

#[test]
fn missing_collaborators_degrade_to_noops() {
    let mut seq = AbortSequencer::new(pitch_config(), LesHardware::unbound());
    seq.abort(t(0.0), 1000.0);
    seq.tick(&prograde_telemetry(MAX_FUEL), t(11.0));
    assert_eq!(seq.state(), AbortState::CanardsDeployed);
    seq.tick(&retro_telemetry(0.0), t(12.0));
    assert_eq!(seq.state(), AbortState::Jettisoned);
}

#[test]
fn decouple_failure_does_not_block_the_jettison_motor() {
    let (hardware, rig) = rig();
    rig.decoupler.prime_fault();
    let mut seq = AbortSequencer::new(timer_config(), hardware);
    seq.abort(t(0.0), 500.0);
    seq.tick(&prograde_telemetry(MAX_FUEL), t(10.0));

    assert_eq!(seq.state(), AbortState::Jettisoned);
    assert_eq!(rig.decoupler.decouple_count(), 1);
    assert!(!rig.decoupler.is_decoupled());
    assert_eq!(rig.jettison.ignite_count(), 1);
}

#[test]
fn snapshot_roundtrip_reproduces_the_remaining_sequence() {
    let (hardware, _rig) = rig();
    let mut seq = AbortSequencer::new(pitch_config(), hardware);
    seq.abort(t(0.0), 1000.0);
    seq.tick(&prograde_telemetry(0.0), t(11.0));
    assert_eq!(seq.state(), AbortState::CanardsDeployed);

    let bytes = bincode::serde::encode_to_vec(seq.snapshot(), bincode::config::standard())
        .expect("snapshot encodes");
    let (snapshot, _): (SequencerSnapshot, usize) =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .expect("snapshot decodes");

    let (hardware, rig_restored) = rig();
    let mut restored = AbortSequencer::restore(snapshot, hardware);
    assert_eq!(restored.state(), AbortState::CanardsDeployed);
    assert_eq!(restored.sequence().abort_time(), Some(t(0.0)));
    // The deployed aero model is pushed to the freshly bound surface.
    assert!((rig_restored.lifting_surface.lift_coefficient() - 0.35).abs() < 1e-9);
    assert!(rig_restored.lifting_surface.internal_drag());

    restored.tick(&retro_telemetry(0.0), t(12.0));
    assert_eq!(restored.state(), AbortState::Jettisoned);
    assert_eq!(rig_restored.decoupler.decouple_count(), 1);
    assert_eq!(rig_restored.jettison.ignite_count(), 1);
}

#[test]
fn snapshot_roundtrip_before_deployment_leaves_surface_alone() {
    let (hardware, _rig) = rig();
    let mut seq = AbortSequencer::new(timer_config(), hardware);
    seq.abort(t(0.0), 500.0);
    seq.tick(&prograde_telemetry(MAX_FUEL), t(1.0));

    let (hardware, rig_restored) = rig();
    let mut restored = AbortSequencer::restore(seq.snapshot(), hardware);
    assert_eq!(restored.state(), AbortState::Aborted);
    assert!((rig_restored.lifting_surface.lift_coefficient() - 1.1).abs() < 1e-9);

    restored.tick(&prograde_telemetry(MAX_FUEL), t(9.99));
    assert_eq!(restored.state(), AbortState::Aborted);
    restored.tick(&prograde_telemetry(MAX_FUEL), t(10.0));
    assert_eq!(restored.state(), AbortState::Jettisoned);
}
