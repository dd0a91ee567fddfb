// CONTROLLER: Input, camera control and frame timing
pub mod camera_controller;
pub mod frame_loop;
pub mod input;

pub use camera_controller::CameraController;
pub use frame_loop::{CameraUniform, FrameClock, FrameTime, LightUniform, ModelUniform};
pub use input::{InputEvent, InputProcessor, InputState, KeyBindings};
