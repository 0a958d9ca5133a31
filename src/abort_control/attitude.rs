//! Retrograde-alignment check for the jettison gate.
//!
//! The alignment is decomposed per axis rather than measured as a single
//! 3D deviation: the velocity is projected into the yaw plane (forward
//! component removed) and the pitch plane (right component removed), and
//! each plane vector is measured against the vehicle's `up` axis. Both
//! angles must reach the tolerance for the check to hold. The decomposition
//! matches what the canards can actually correct for, one axis at a time.

use super::telemetry::AttitudeBasis;
use crate::util::Vec3D;

/// Computes the yaw-plane and pitch-plane alignment angles, in degrees.
///
/// # Arguments
/// * `velocity` - The vehicle's surface velocity.
/// * `basis` - The vehicle's orientation basis.
///
/// # Returns
/// `(yaw_deg, pitch_deg)`, each within `[0, 180]`. Degenerate inputs (zero
/// velocity, or a velocity parallel to the excluded axis) yield 0 for the
/// affected angle.
pub fn retro_axis_angles(velocity: Vec3D<f64>, basis: &AttitudeBasis) -> (f64, f64) {
    let yaw_plane = velocity.exclude(basis.forward);
    let pitch_plane = velocity.exclude(basis.right);
    let yaw = yaw_plane.angle_deg(&basis.up);
    let pitch = pitch_plane.angle_deg(&basis.up);
    (yaw, pitch)
}

/// Whether the vehicle's nose points opposite its direction of travel,
/// within `tolerance_deg` on both axes.
///
/// Pure function of the current telemetry; the gate recomputes it fresh
/// every tick.
pub fn is_retrograde(velocity: Vec3D<f64>, basis: &AttitudeBasis, tolerance_deg: f64) -> bool {
    let (yaw, pitch) = retro_axis_angles(velocity, basis);
    yaw >= tolerance_deg && pitch >= tolerance_deg
}
