// MODEL: Scene state and data
pub mod camera;
pub mod cube;
pub mod light;

pub use camera::{Camera, MoveDirections};
pub use cube::cube_mesh;
pub use light::Light;
