//! Core rendering functionality
//!
//! Handles render pipelines, GPU resource management, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineManager};
pub use render_engine::{DrawItem, GpuContext, RenderEngine};
