use std::path::PathBuf;

/// Errors raised while bringing up the window, the GPU or the startup assets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {kind} from {}", path.display())]
    Asset {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {} is {width}x{height}, larger than the device limit of {max}", path.display())]
    TextureTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
    #[error("invalid shader {}: {message}", path.display())]
    Shader { path: PathBuf, message: String },
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported {0}")]
    UnsupportedSurface(&'static str),
    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
}

pub type Result<T> = std::result::Result<T, Error>;
