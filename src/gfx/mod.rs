//! # Graphics Module
//!
//! Everything between decoded assets and pixels on screen.
//!
//! - **Camera** ([`camera`]) - damped orbit camera and its input controller
//! - **Rendering** ([`rendering`]) - surface, pipelines and the frame loop
//! - **Materials** ([`material`]) - the lightmap bind group and light uniform
//! - **Resources** ([`resources`]) - textures, render targets and global uniforms
//! - **Scene data** ([`scene`], [`geometry`]) - meshes, vertices and generated shapes
//!
//! Colour handling lives in [`color`]: textures and the light colour are
//! authored in sRGB, shading happens in linear space and the surface
//! encodes back to sRGB.

pub mod camera;
pub mod color;
pub mod geometry;
pub mod material;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod viewport;

pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
