//! Scene state: material sequencing, the error placard and the viewer
//! scene that ties loads, camera and GPU materials together.

pub mod materials;
pub mod placard;
pub mod viewer_scene;

pub use materials::{LightParams, MaterialSlot, MaterialState, SceneMaterials, ShaderVariant};
pub use placard::{InfoBox, Placard};
pub use viewer_scene::{ScreenLabel, ViewerScene};
