pub mod vec3d;
