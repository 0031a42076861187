use thiserror::Error;

/// Fatal start-up and event loop failures.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("could not get a graphics context: {0}")]
    GraphicsContext(String),

    #[error("shader pipeline failed to build: {0}")]
    Shader(String),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

impl From<wgpu::CreateSurfaceError> for ViewerError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        ViewerError::GraphicsContext(err.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for ViewerError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        ViewerError::GraphicsContext(err.to_string())
    }
}
