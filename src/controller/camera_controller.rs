use crate::controller::input::{InputProcessor, InputState};
use crate::model::Camera;

/// Feeds one frame of input into the camera
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    processor: InputProcessor,
}

impl CameraController {
    pub fn new(processor: InputProcessor) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &InputProcessor {
        &self.processor
    }

    /// Move, rotate and refresh the view matrix using `delta_ms` of frame time.
    pub fn update(&self, camera: &mut Camera, input: &mut InputState, delta_ms: f32) {
        let directions = self.processor.directions(input);
        let look = input.consume_look();
        camera.update(directions, look, delta_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputEvent;
    use glam::Vec3;
    use winit::keyboard::KeyCode;

    #[test]
    fn applies_movement_and_look() {
        let controller = CameraController::default();
        let mut camera = Camera::new(1.0);
        let mut input = InputState::new();
        input.process_event(&InputEvent::CursorGrabChanged { grabbed: true });
        input.process_event(&InputEvent::KeyDown(KeyCode::KeyW));
        input.process_event(&InputEvent::MouseMove { dx: 20.0, dy: 0.0 });

        controller.update(&mut camera, &mut input, 100.0);

        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
        assert!((camera.yaw - (-89.0)).abs() < 1e-4);
        assert_eq!(input.look_delta, (0.0, 0.0));
    }

    #[test]
    fn idle_frame_keeps_pose() {
        let controller = CameraController::default();
        let mut camera = Camera::new(1.0);
        let before = camera.m_view;
        let mut input = InputState::new();
        controller.update(&mut camera, &mut input, 16.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 4.0));
        assert!(camera.m_view.abs_diff_eq(before, 1e-5));
    }
}
