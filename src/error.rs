use thiserror::Error;

/// Fatal errors from setting up or presenting through the host graphics stack.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("surface reports no supported formats for this adapter")]
    NoSurfaceFormat,

    #[error("failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("shader compilation failed: {0}")]
    ShaderCompilation(String),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Invalid numeric input to the frame driver.
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("frame time must be finite and non-negative, got {0}")]
    InvalidTime(f64),
}
