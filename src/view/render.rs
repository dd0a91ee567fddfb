use wgpu::*;

use crate::error::Result;
use crate::ui::OverlayFrame;
use crate::view::cube_renderer::Cube;
use crate::view::gpu_init::GpuContext;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Background as it appears on screen, sRGB-encoded.
pub const BACKGROUND: [f64; 3] = [0.08, 0.16, 0.18];

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Clear color for `format`. sRGB targets encode on write, so the background
/// is decoded first to land on the same on-screen value.
pub fn clear_color(format: TextureFormat) -> Color {
    let [r, g, b] = if format.is_srgb() {
        BACKGROUND.map(srgb_to_linear)
    } else {
        BACKGROUND
    };
    Color { r, g, b, a: 1.0 }
}

/// Camera and light uniforms shared by everything drawn in the scene (group 0)
pub struct SceneResources {
    pub camera_buffer: Buffer,
    pub light_buffer: Buffer,
    pub bind_group_layout: BindGroupLayout,
    pub bind_group: BindGroup,
}

fn uniform_entry(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let depth_texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

pub fn create_scene_resources(device: &Device) -> SceneResources {
    let camera_buffer = device.create_buffer(&BufferDescriptor {
        label: Some("camera_buffer"),
        size: std::mem::size_of::<crate::controller::CameraUniform>() as BufferAddress,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let light_buffer = device.create_buffer(&BufferDescriptor {
        label: Some("light_buffer"),
        size: std::mem::size_of::<crate::controller::LightUniform>() as BufferAddress,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("scene_bind_group_layout"),
        entries: &[
            uniform_entry(0, ShaderStages::VERTEX | ShaderStages::FRAGMENT),
            uniform_entry(1, ShaderStages::FRAGMENT),
        ],
    });

    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("scene_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            BindGroupEntry { binding: 0, resource: camera_buffer.as_entire_binding() },
            BindGroupEntry { binding: 1, resource: light_buffer.as_entire_binding() },
        ],
    });

    SceneResources { camera_buffer, light_buffer, bind_group_layout, bind_group }
}

/// Per-window render targets plus the overlay renderer
pub struct RenderState {
    pub scene: SceneResources,
    pub depth_texture: Texture,
    pub depth_view: TextureView,
    pub clear_color: Color,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl RenderState {
    pub fn new(gpu: &GpuContext) -> Self {
        let (depth_texture, depth_view) = create_depth_texture(&gpu.device, gpu.config.width, gpu.config.height);
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format, egui_wgpu::RendererOptions::default());
        Self {
            scene: create_scene_resources(&gpu.device),
            depth_texture,
            depth_view,
            clear_color: clear_color(gpu.format),
            egui_renderer,
        }
    }

    /// Match the depth buffer to the current surface size.
    pub fn resize(&mut self, gpu: &GpuContext) {
        self.depth_texture.destroy();
        let (texture, view) = create_depth_texture(&gpu.device, gpu.config.width, gpu.config.height);
        self.depth_texture = texture;
        self.depth_view = view;
    }

    /// Clear, draw the cube and the optional overlay, then present.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped;
    /// only unrecoverable surface errors are returned.
    pub fn draw_frame(&mut self, gpu: &GpuContext, cube: &Cube, overlay: Option<OverlayFrame>) -> Result<()> {
        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                gpu.reconfigure();
                return Ok(());
            }
            Err(SurfaceError::Timeout) => {
                tracing::warn!("timed out acquiring frame, skipping");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rp.set_bind_group(0, &self.scene.bind_group, &[]);
            cube.render(&mut rp);
        }

        if let Some(overlay) = overlay {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [gpu.config.width, gpu.config.height],
                pixels_per_point: overlay.pixels_per_point,
            };

            for (id, image_delta) in &overlay.textures_delta.set {
                self.egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
            }
            self.egui_renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &overlay.primitives,
                &screen_descriptor,
            );

            {
                let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                    label: Some("egui_render_pass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                self.egui_renderer
                    .render(&mut egui_pass.forget_lifetime(), &overlay.primitives, &screen_descriptor);
            }

            for id in &overlay.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn destroy(&self) {
        self.depth_texture.destroy();
        self.scene.camera_buffer.destroy();
        self.scene.light_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_target_clears_to_raw_background() {
        let c = clear_color(TextureFormat::Bgra8Unorm);
        assert_eq!((c.r, c.g, c.b, c.a), (0.08, 0.16, 0.18, 1.0));
    }

    #[test]
    fn srgb_target_clears_to_decoded_background() {
        let c = clear_color(TextureFormat::Bgra8UnormSrgb);
        // Decoded values are darker but keep their order
        assert!(c.r < 0.08 && c.g < 0.16 && c.b < 0.18);
        assert!(c.r < c.g && c.g < c.b);
        assert!((c.g - 0.021_981).abs() < 1e-5);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn srgb_decode_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-12);
        assert!((srgb_to_linear(0.04) - 0.04 / 12.92).abs() < 1e-12);
    }
}
