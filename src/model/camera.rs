use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV: f32 = 80.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;
/// World units travelled per millisecond of frame time.
pub const SPEED: f32 = 0.01;
/// Degrees of rotation per pixel of mouse motion.
pub const SENSITIVITY: f32 = 0.05;
pub const PITCH_LIMIT: f32 = 89.0;

/// Which of the six movement directions are requested this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveDirections {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveDirections {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

/// First-person camera driven by yaw/pitch angles (in degrees).
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub aspect_ratio: f32,
    pub m_view: Mat4,
    pub m_proj: Mat4,
}

impl Camera {
    pub fn new(aspect_ratio: f32) -> Self {
        Self::with_pose(aspect_ratio, Vec3::new(0.0, 0.0, 4.0), -90.0, 0.0)
    }

    /// The basis starts axis-aligned; it is only derived from yaw/pitch on the
    /// first `update`.
    pub fn with_pose(aspect_ratio: f32, position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            aspect_ratio,
            m_view: Mat4::IDENTITY,
            m_proj: Mat4::IDENTITY,
        };
        camera.m_view = camera.view_matrix();
        camera.m_proj = camera.projection_matrix();
        camera
    }

    /// Apply a mouse delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * SENSITIVITY;
        self.pitch -= dy * SENSITIVITY;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.forward = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.forward.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.forward).normalize();
    }

    /// Translate along the current basis. Directions add up without
    /// normalisation, so diagonal movement is faster.
    pub fn move_by(&mut self, directions: MoveDirections, delta_ms: f32) {
        if !directions.any() {
            return;
        }
        let velocity = SPEED * delta_ms;
        if directions.forward {
            self.position += self.forward * velocity;
        }
        if directions.backward {
            self.position -= self.forward * velocity;
        }
        if directions.left {
            self.position -= self.right * velocity;
        }
        if directions.right {
            self.position += self.right * velocity;
        }
        if directions.up {
            self.position += self.up * velocity;
        }
        if directions.down {
            self.position -= self.up * velocity;
        }
    }

    /// One frame: move with last frame's basis, then rotate, rebuild the
    /// basis and refresh the view matrix.
    pub fn update(&mut self, directions: MoveDirections, look_delta: (f32, f32), delta_ms: f32) {
        self.move_by(directions, delta_ms);
        self.rotate(look_delta.0, look_delta.1);
        self.update_camera_vectors();
        self.m_view = self.view_matrix();
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
        self.m_proj = self.projection_matrix();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(FOV.to_radians(), self.aspect_ratio, NEAR, FAR)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.m_proj * self.m_view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(cam: &Camera) {
        assert!((cam.forward.length() - 1.0).abs() < EPS);
        assert!((cam.right.length() - 1.0).abs() < EPS);
        assert!((cam.up.length() - 1.0).abs() < EPS);
        assert!(cam.forward.dot(cam.right).abs() < EPS);
        assert!(cam.forward.dot(cam.up).abs() < EPS);
        assert!(cam.right.dot(cam.up).abs() < EPS);
    }

    #[test]
    fn default_pose_looks_down_negative_z() {
        let cam = Camera::new(16.0 / 9.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(cam.yaw, -90.0);
        assert_eq!(cam.pitch, 0.0);

        // Origin sits straight ahead, 4 units in front of the eye
        let origin = cam.m_view.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), EPS));
    }

    #[test]
    fn derived_basis_matches_initial_basis_at_default_angles() {
        let mut cam = Camera::new(1.0);
        let initial = (cam.forward, cam.right, cam.up);
        cam.update_camera_vectors();
        assert!(cam.forward.abs_diff_eq(initial.0, EPS));
        assert!(cam.right.abs_diff_eq(initial.1, EPS));
        assert!(cam.up.abs_diff_eq(initial.2, EPS));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::new(1.0);
        cam.rotate(0.0, -100_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.rotate(0.0, 100_000.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);

        let clamped = Camera::with_pose(1.0, Vec3::ZERO, 0.0, 120.0);
        assert_eq!(clamped.pitch, PITCH_LIMIT);
    }

    #[test]
    fn rotate_scales_by_sensitivity() {
        let mut cam = Camera::new(1.0);
        cam.rotate(100.0, 20.0);
        assert!((cam.yaw - (-90.0 + 100.0 * SENSITIVITY)).abs() < EPS);
        assert!((cam.pitch - (-20.0 * SENSITIVITY)).abs() < EPS);
    }

    #[test]
    fn basis_stays_orthonormal_after_updates() {
        let mut cam = Camera::new(1.0);
        for step in 0..50 {
            let d = step as f32 * 7.3;
            cam.update(MoveDirections { forward: true, left: step % 2 == 0, ..Default::default() }, (d, -d * 0.5), 16.0);
            assert_orthonormal(&cam);
            assert!(cam.pitch >= -PITCH_LIMIT && cam.pitch <= PITCH_LIMIT);
        }
    }

    #[test]
    fn basis_orthonormal_near_pitch_limit() {
        let mut cam = Camera::new(1.0);
        cam.rotate(0.0, -10_000.0);
        cam.update_camera_vectors();
        assert_orthonormal(&cam);
        assert!(cam.forward.y > 0.99);
    }

    #[test]
    fn movement_scales_with_frame_time() {
        let mut cam = Camera::new(1.0);
        let forward = MoveDirections { forward: true, ..Default::default() };
        cam.move_by(forward, 100.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPS));
        cam.move_by(MoveDirections { backward: true, ..Default::default() }, 50.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.5), EPS));
    }

    #[test]
    fn opposing_directions_cancel() {
        let mut cam = Camera::new(1.0);
        let start = cam.position;
        let all = MoveDirections { forward: true, backward: true, left: true, right: true, up: true, down: true };
        assert!(all.any());
        assert!(!MoveDirections::default().any());
        cam.move_by(all, 1000.0);
        assert!(cam.position.abs_diff_eq(start, EPS));
    }

    #[test]
    fn strafe_and_vertical_follow_basis() {
        let mut cam = Camera::new(1.0);
        cam.move_by(MoveDirections { right: true, ..Default::default() }, 100.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(1.0, 0.0, 4.0), EPS));
        cam.move_by(MoveDirections { up: true, ..Default::default() }, 100.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(1.0, 1.0, 4.0), EPS));
        cam.move_by(MoveDirections { down: true, left: true, ..Default::default() }, 100.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), EPS));
    }

    #[test]
    fn update_moves_before_rotating() {
        let mut cam = Camera::new(1.0);
        // A full quarter turn this frame must not affect this frame's movement
        cam.update(MoveDirections { forward: true, ..Default::default() }, (90.0 / SENSITIVITY, 0.0), 100.0);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPS));
        assert!(cam.forward.abs_diff_eq(Vec3::X, 1e-4));
        assert_eq!(cam.m_view, cam.view_matrix());
    }

    #[test]
    fn set_aspect_refreshes_projection() {
        let mut cam = Camera::new(1.0);
        let before = cam.m_proj;
        cam.set_aspect(1280, 720);
        assert!((cam.aspect_ratio - 1280.0 / 720.0).abs() < EPS);
        assert_ne!(before, cam.m_proj);

        cam.set_aspect(100, 0);
        assert!((cam.aspect_ratio - 1280.0 / 720.0).abs() < EPS);
    }

    #[test]
    fn projection_maps_near_and_far_to_depth_range() {
        let cam = Camera::new(1.0);
        let near = cam.m_proj.project_point3(Vec3::new(0.0, 0.0, -NEAR));
        let far = cam.m_proj.project_point3(Vec3::new(0.0, 0.0, -FAR));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
