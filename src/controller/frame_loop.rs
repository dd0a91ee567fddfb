use std::time::{Duration, Instant};

use glam::{Mat3, Mat4};

use crate::model::{Camera, Light};

/// Longest frame step fed to the simulation, so a stall doesn't teleport the camera.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed_seconds: f32,
    /// Milliseconds since the previous tick.
    pub delta_ms: f32,
}

/// Caps the loop at a fixed number of iterations per second and tracks
/// elapsed and per-frame time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_interval: Duration,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameClock {
    pub fn new(max_fps: u32, now: Instant) -> Self {
        Self {
            start: now,
            last: now,
            frame_interval: Duration::from_secs(1) / max_fps.max(1),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn next_frame_at(&self) -> Instant {
        self.last + self.frame_interval
    }

    pub fn is_frame_due(&self, now: Instant) -> bool {
        now >= self.next_frame_at()
    }

    pub fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }

    /// Start a new frame at `now`.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let delta = now.saturating_duration_since(self.last).min(MAX_FRAME_DELTA);
        self.last = now;

        // FPS, refreshed once per second
        self.frame_count += 1;
        self.fps_timer += delta.as_secs_f32();
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        FrameTime {
            elapsed_seconds: self.elapsed(now),
            delta_ms: delta.as_secs_f32() * 1000.0,
        }
    }

    /// Like `tick`, but only when the cap allows a frame at `now`.
    pub fn try_tick(&mut self, now: Instant) -> Option<FrameTime> {
        if self.is_frame_due(now) {
            Some(self.tick(now))
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub m_proj: [[f32; 4]; 4],
    pub m_view: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            m_proj: camera.m_proj.to_cols_array_2d(),
            m_view: camera.m_view.to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl LightUniform {
    pub fn from_light(light: &Light) -> Self {
        Self {
            position: light.position.extend(1.0).to_array(),
            ambient: light.ambient.extend(0.0).to_array(),
            diffuse: light.diffuse.extend(0.0).to_array(),
            specular: light.specular.extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub m_model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix, padded to 4x4.
    pub m_normal: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn from_model(model: Mat4) -> Self {
        let normal = Mat3::from_mat4(model).inverse().transpose();
        Self {
            m_model: model.to_cols_array_2d(),
            m_normal: Mat4::from_mat3(normal).to_cols_array_2d(),
        }
    }
}
