use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_MAX_FPS: u32 = 60;

/// Shader source, relative to the asset directory.
pub const SHADER_PATH: &str = "shaders/default.wgsl";
/// Cube texture, relative to the asset directory.
pub const TEXTURE_PATH: &str = "textures/img.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Gl,
    Vulkan,
    Metal,
    Dx12,
    Auto,
}

impl Backend {
    pub fn backends(self) -> wgpu::Backends {
        match self {
            Backend::Gl => wgpu::Backends::GL,
            Backend::Vulkan => wgpu::Backends::VULKAN,
            Backend::Metal => wgpu::Backends::METAL,
            Backend::Dx12 => wgpu::Backends::DX12,
            Backend::Auto => wgpu::Backends::all(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "cubelight", about = "Rotating textured cube with a point light and a fly camera")]
pub struct Config {
    /// Window width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Directory containing `shaders/` and `textures/`
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Frame rate cap
    #[arg(long, default_value_t = DEFAULT_MAX_FPS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_fps: u32,

    /// Preferred graphics backend; falls back to any backend if unavailable
    #[arg(long, value_enum, default_value_t = Backend::Gl)]
    pub backend: Backend,

    /// Present without waiting for vertical sync
    #[arg(long)]
    pub no_vsync: bool,

    /// Allow the window to be resized
    #[arg(long)]
    pub resizable: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn shader_path(&self) -> PathBuf {
        self.assets.join(SHADER_PATH)
    }

    pub fn texture_path(&self) -> PathBuf {
        self.assets.join(TEXTURE_PATH)
    }

    pub fn vsync(&self) -> bool {
        !self.no_vsync
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            assets: PathBuf::from("."),
            max_fps: DEFAULT_MAX_FPS,
            backend: Backend::Gl,
            no_vsync: false,
            resizable: false,
            verbose: false,
        }
    }
}
