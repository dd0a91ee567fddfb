use std::sync::Arc;

use winit::window::Window;

use crate::error::{Error, Result};

/// Device, queue and the configured window surface
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub format: wgpu::TextureFormat,
    pub config: wgpu::SurfaceConfiguration,
    pub backend: wgpu::Backend,
}

async fn request_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
) -> std::result::Result<wgpu::Adapter, wgpu::RequestAdapterError> {
    instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: Some(surface),
        })
        .await
}

async fn init_device_and_queue(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
    let adapter_limits = adapter.limits();
    let limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter_limits);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits,
            memory_hints: wgpu::MemoryHints::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            trace: wgpu::Trace::default(),
        })
        .await?;

    Ok((device, queue))
}

/// Pick an sRGB format so textures and lighting stay in linear space in the shader.
pub fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    width: u32,
    height: u32,
    vsync: bool,
) -> Result<wgpu::SurfaceConfiguration> {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .ok_or(Error::UnsupportedSurface("texture formats"))?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .ok_or(Error::UnsupportedSurface("alpha modes"))?;

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: if vsync { wgpu::PresentMode::AutoVsync } else { wgpu::PresentMode::AutoNoVsync },
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

impl GpuContext {
    /// Create a GPU context for `window`, preferring `backends`. When none of
    /// them yields an adapter, every available backend is tried once.
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        let first_choice = request_adapter(&instance, &surface).await;
        let (surface, adapter) = match first_choice {
            Ok(adapter) => (surface, adapter),
            Err(err) if backends != wgpu::Backends::all() => {
                tracing::warn!("no adapter for {backends:?} ({err}), retrying with all backends");
                drop(surface);
                let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                    backends: wgpu::Backends::all(),
                    ..Default::default()
                });
                let surface = instance.create_surface(Arc::clone(&window))?;
                let adapter = request_adapter(&instance, &surface).await?;
                (surface, adapter)
            }
            Err(err) => return Err(err.into()),
        };

        let info = adapter.get_info();
        tracing::info!("using {} ({:?} backend)", info.name, info.backend);

        let (device, queue) = init_device_and_queue(&adapter).await?;

        let caps = surface.get_capabilities(&adapter);
        let config = surface_config(&caps, size.width, size.height, vsync)?;
        surface.configure(&device, &config);

        Ok(GpuContext {
            device,
            queue,
            surface,
            format: config.format,
            config,
            backend: info.backend,
        })
    }

    /// Reconfigure the surface; zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        }
    }

    #[test]
    fn prefers_srgb_format() {
        let caps = caps(vec![wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb]);
        let config = surface_config(&caps, 1280, 720, true).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(config.present_mode, wgpu::PresentMode::AutoVsync);
        assert_eq!((config.width, config.height), (1280, 720));
    }

    #[test]
    fn falls_back_to_first_format_and_clamps_size() {
        let caps = caps(vec![wgpu::TextureFormat::Rgba8Unorm]);
        let config = surface_config(&caps, 0, 0, false).unwrap();
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(config.present_mode, wgpu::PresentMode::AutoNoVsync);
        assert_eq!((config.width, config.height), (1, 1));
    }

    #[test]
    fn empty_capabilities_are_an_error() {
        let caps = caps(vec![]);
        assert!(matches!(
            surface_config(&caps, 10, 10, true),
            Err(Error::UnsupportedSurface("texture formats"))
        ));
    }
}
