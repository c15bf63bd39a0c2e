//! # Procedural Geometry Generation
//!
//! Generates the few primitive shapes the viewer builds itself (the error
//! placard's box and text plane), so no model file is needed for them.
//!
//! ## Usage
//!
//! ```rust
//! use bakelight::gfx::geometry::{generate_box, generate_plane};
//!
//! let slab = generate_box(1.0, 0.5, 0.1);
//! let plane = generate_plane(1.0, 0.5, 1, 1);
//! assert_eq!(slab.triangle_count(), 12);
//! assert_eq!(plane.triangle_count(), 2);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::{model::MeshData, vertex::Vertex};

/// Generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Moves every vertex by `offset`
    pub fn translated(mut self, offset: [f32; 3]) -> Self {
        for v in &mut self.vertices {
            v[0] += offset[0];
            v[1] += offset[1];
            v[2] += offset[2];
        }
        self
    }

    /// Converts into the mesh format drawn by the renderer
    pub fn into_mesh_data(self, name: &str) -> MeshData {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: *position,
                tex_coord: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        MeshData {
            name: name.to_string(),
            vertices,
            indices: self.indices,
        }
    }
}
