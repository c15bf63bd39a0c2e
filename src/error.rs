//! Error types for asset loading and renderer start-up

use thiserror::Error;

/// Failure of a single asset load
///
/// Every variant carries the url that was requested so the loading overlay
/// can pick a message from the file extension.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {url}: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse glTF {url}: {source}")]
    Gltf {
        url: String,
        #[source]
        source: gltf::Error,
    },

    #[error("{url} contains no drawable meshes")]
    EmptyModel { url: String },
}

impl LoadError {
    /// The url of the asset that failed
    pub fn url(&self) -> &str {
        match self {
            LoadError::Io { url, .. }
            | LoadError::Image { url, .. }
            | LoadError::Gltf { url, .. }
            | LoadError::EmptyModel { url } => url,
        }
    }
}

/// Errors raised while bringing up the window and GPU
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("could not create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("could not open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no usable texture format")]
    NoSurfaceFormat,

    #[error("pipeline setup failed: {0}")]
    Pipeline(#[from] crate::gfx::rendering::pipeline_manager::PipelineError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),
}
