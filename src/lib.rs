//! bakelight
//!
//! A native viewer for a baked, lightmapped glTF scene built on wgpu and
//! winit. The model is drawn with its baked colour texture; in the
//! advanced scene a lightmap mask lets a live light colour and strength
//! brighten it through a lighten blend.
//!
//! ```no_run
//! use bakelight::{config::ViewerConfig, ViewerApp};
//!
//! let app = ViewerApp::new(ViewerConfig::from_env())?;
//! app.run()?;
//! # Ok::<(), bakelight::error::ViewerError>(())
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod loading;
pub mod scene;
pub mod ui;
pub mod wgpu_utils;

pub use app::{Viewer, ViewerApp};
pub use config::{SceneVariant, ViewerConfig};
