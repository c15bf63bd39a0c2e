//! # Vertex Data Structures
//!
//! GPU-compatible vertex format shared by loaded models and generated
//! geometry.

/// A vertex with position and texture coordinate
///
/// `#[repr(C)]` keeps the layout the vertex buffer description expects.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position [x, y, z] in model space (node transforms already applied)
    pub position: [f32; 3],
    /// Texture coordinate [u, v], shared by the baked texture and lightmap
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    /// Vertex buffer layout
    ///
    /// - Attribute 0: Position (Float32x3) at shader location 0
    /// - Attribute 1: UV (Float32x2) at shader location 1
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 20);
        assert_eq!(desc.attributes[1].offset, 12);
    }
}
