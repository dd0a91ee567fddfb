// VIEW: GPU setup and drawing
pub mod cube_renderer;
pub mod gpu_init;
pub mod render;
pub mod shader;
pub mod texture;

pub use cube_renderer::Cube;
pub use gpu_init::GpuContext;
pub use render::{RenderState, SceneResources};
