//! # User Interface Module
//!
//! Dear ImGui based UI drawn on top of the scene.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//!   and the UI render pass
//! - [`panel`] - the "Lighting" panel with the light colour and strength
//! - [`overlay`] - loading/error overlay, info box and placard labels
//!
//! When the UI wants the mouse or keyboard, input does not reach the
//! camera controls.

pub mod manager;
pub mod overlay;
pub mod panel;

pub use manager::UiManager;
pub use overlay::{draw_info_box, draw_loading_overlay, draw_placard_labels, OverlayAction};
pub use panel::{LightPanel, PanelEvent};
