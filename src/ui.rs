use egui::Context;
use glam::Vec3;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::model::Camera;

/// Tessellated overlay output, ready for the egui render pass
pub struct OverlayFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Values shown in the debug window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStats {
    pub fps: f32,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub time: f32,
}

impl OverlayStats {
    pub fn new(camera: &Camera, fps: f32, time: f32) -> Self {
        Self {
            fps,
            position: camera.position,
            yaw: camera.yaw,
            pitch: camera.pitch,
            time,
        }
    }

    pub fn lines(&self) -> [String; 4] {
        let p = self.position;
        [
            format!("FPS: {:.0}", self.fps),
            format!("Pos: {:.2}, {:.2}, {:.2}", p.x, p.y, p.z),
            format!("Yaw: {:.1} Pitch: {:.1}", self.yaw, self.pitch),
            format!("Time: {:.1}s", self.time),
        ]
    }
}

pub const CONTROLS: [&str; 5] = [
    "W/S - Forward/back",
    "A/D - Strafe",
    "Q/E - Up/down",
    "F3 - Toggle overlay",
    "Esc - Quit",
];

/// egui context plus its winit glue
pub struct Overlay {
    ctx: Context,
    state: egui_winit::State,
}

impl Overlay {
    pub fn new(window: &Window) -> Self {
        let ctx = Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        Self { ctx, state }
    }

    /// Forward a window event to egui.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Lay out the debug window and tessellate it.
    pub fn run(&mut self, window: &Window, stats: &OverlayStats) -> OverlayFrame {
        let raw_input = self.state.take_egui_input(window);
        let output = self.ctx.run(raw_input, |ctx| draw_debug_window(ctx, stats));
        self.state.handle_platform_output(window, output.platform_output);

        let pixels_per_point = output.pixels_per_point;
        OverlayFrame {
            primitives: self.ctx.tessellate(output.shapes, pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point,
        }
    }
}

fn draw_debug_window(ctx: &Context, stats: &OverlayStats) {
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .default_size([160.0, 120.0])
        .show(ctx, |ui| {
            for line in stats.lines() {
                ui.label(egui::RichText::new(line).small());
            }
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            for line in CONTROLS {
                ui.label(egui::RichText::new(line).small());
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_follow_camera() {
        let camera = Camera::new(16.0 / 9.0);
        let stats = OverlayStats::new(&camera, 59.6, 2.34);
        let lines = stats.lines();
        assert_eq!(lines[0], "FPS: 60");
        assert_eq!(lines[1], "Pos: 0.00, 0.00, 4.00");
        assert_eq!(lines[2], "Yaw: -90.0 Pitch: 0.0");
        assert_eq!(lines[3], "Time: 2.3s");
    }

    #[test]
    fn debug_window_lays_out_headless() {
        let ctx = Context::default();
        let stats = OverlayStats::new(&Camera::new(1.0), 60.0, 0.0);
        let output = ctx.run(egui::RawInput::default(), |ctx| draw_debug_window(ctx, &stats));
        assert!(!output.shapes.is_empty());
    }
}
