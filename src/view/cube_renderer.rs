use std::path::Path;

use crate::controller::{CameraUniform, LightUniform, ModelUniform};
use crate::error::Result;
use crate::model::{cube, Camera, Light};
use crate::utils::{MeshBuffer, Vertex};
use crate::view::gpu_init::GpuContext;
use crate::view::render::{SceneResources, DEPTH_FORMAT};
use crate::view::shader::{check_shader_scope, create_shader_module, read_shader_source};
use crate::view::texture::{Texture, TextureImage};

/// The textured, lit cube and everything needed to draw it.
///
/// Group 0 (camera + light) is shared and owned by the render state; the
/// cube keeps handles to its buffers so it can refresh them every frame.
/// Group 1 holds the model matrix, texture and sampler.
pub struct Cube {
    mesh: MeshBuffer,
    pipeline: wgpu::RenderPipeline,
    texture: Texture,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
}

fn create_model_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("model_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    shader: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("cube_pipeline_layout"),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("cube_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

impl Cube {
    /// Load the shader and texture, build the pipeline and buffers, and write
    /// the initial uniforms.
    pub fn new(
        gpu: &GpuContext,
        scene: &SceneResources,
        light: &Light,
        camera: &Camera,
        shader_path: &Path,
        texture_path: &Path,
    ) -> Result<Self> {
        let device = &gpu.device;

        let source = read_shader_source(shader_path)?;
        let image = TextureImage::load(texture_path)?;
        image.check_limits(texture_path, device.limits().max_texture_dimension_2d)?;
        let texture = Texture::upload(device, &gpu.queue, &image, "u_texture_0");

        let mesh = cube::cube_mesh().upload(device);

        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model_buffer"),
            size: std::mem::size_of::<ModelUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let model_layout = create_model_layout(device);
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_bind_group"),
            layout: &model_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: model_buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&texture.view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&texture.sampler) },
            ],
        });

        // Bad WGSL surfaces here instead of in wgpu's uncaptured error handler
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = create_shader_module(device, "default_shader", &source);
        let pipeline = create_pipeline(device, gpu.format, &shader, &[&scene.bind_group_layout, &model_layout]);
        check_shader_scope(shader_path, pollster::block_on(device.pop_error_scope()))?;

        let cube = Self {
            mesh,
            pipeline,
            texture,
            model_buffer,
            model_bind_group,
            camera_buffer: scene.camera_buffer.clone(),
            light_buffer: scene.light_buffer.clone(),
        };
        cube.on_init(&gpu.queue, light, camera);
        tracing::debug!("cube ready: {} indices", cube.mesh.index_count);
        Ok(cube)
    }

    fn on_init(&self, queue: &wgpu::Queue, light: &Light, camera: &Camera) {
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&LightUniform::from_light(light)));
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&CameraUniform::from_camera(camera)));
        queue.write_buffer(&self.model_buffer, 0, bytemuck::bytes_of(&ModelUniform::from_model(cube::model_matrix(0.0))));
    }

    /// Spin the model to `time` seconds and refresh the camera uniforms.
    pub fn update(&self, queue: &wgpu::Queue, time: f32, camera: &Camera) {
        let model = ModelUniform::from_model(cube::model_matrix(time));
        queue.write_buffer(&self.model_buffer, 0, bytemuck::bytes_of(&model));
        // Projection rides along so resizes take effect without a separate write
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&CameraUniform::from_camera(camera)));
    }

    /// Draw into a pass that already has the scene bind group at slot 0.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.model_bind_group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }

    pub fn destroy(self) {
        self.mesh.destroy();
        self.texture.destroy();
        self.model_buffer.destroy();
        tracing::debug!("cube resources released");
    }
}
