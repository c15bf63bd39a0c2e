//! # Mesh Data Module
//!
//! Vertex format and the model container drawn by the render engine.

pub mod model;
pub mod vertex;

pub use model::{Mesh, MeshBuffers, MeshData, Model};
pub use vertex::Vertex;
