//! Asset loading: progress tracking, background decoding and completion
//! delivery.

pub mod loader;
pub mod manager;
pub mod model;
pub mod texture;

pub use loader::{AssetId, AssetLoader, AssetPayload, LoadEvent};
pub use manager::{AssetKind, LoadFailure, LoadingManager, OverlayPhase};
pub use texture::TextureData;
