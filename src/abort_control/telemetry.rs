use crate::util::Vec3D;

/// The vehicle's orientation expressed as three unit vectors.
///
/// `up` points along the vehicle's long axis toward the nose, `forward` and
/// `right` span the plane orthogonal to it (the host's transform basis).
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy)]
pub struct AttitudeBasis {
    pub forward: Vec3D<f64>,
    pub right: Vec3D<f64>,
    pub up: Vec3D<f64>,
}

impl AttitudeBasis {
    pub const fn new(forward: Vec3D<f64>, right: Vec3D<f64>, up: Vec3D<f64>) -> Self {
        Self { forward, right, up }
    }
}

/// Read-only snapshot of the host simulation state, captured once per tick.
///
/// The snapshot is owned by the host; the sequencer never mutates it and
/// never reads host state through any other channel.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy)]
pub struct VehicleTelemetry {
    surface_velocity: Vec3D<f64>,
    attitude: AttitudeBasis,
    fuel_remaining: f64,
    altitude: f64,
}

impl VehicleTelemetry {
    pub const fn new(
        surface_velocity: Vec3D<f64>,
        attitude: AttitudeBasis,
        fuel_remaining: f64,
        altitude: f64,
    ) -> Self {
        Self {
            surface_velocity,
            attitude,
            fuel_remaining,
            altitude,
        }
    }

    /// Velocity relative to the surface.
    pub const fn surface_velocity(&self) -> Vec3D<f64> { self.surface_velocity }

    /// The vehicle's orientation basis.
    pub const fn attitude(&self) -> AttitudeBasis { self.attitude }

    /// Remaining escape-motor propellant mass.
    pub const fn fuel_remaining(&self) -> f64 { self.fuel_remaining }

    /// Altitude above the surface.
    pub const fn altitude(&self) -> f64 { self.altitude }
}
