pub mod logger;
mod math;

pub use math::vec3d::Vec3D;
