//! Loaded model and its GPU buffers
//!
//! A model is a flat list of meshes. Each mesh remembers which material slot
//! it is drawn with, so the material can be swapped on every mesh without
//! touching geometry.

use wgpu::util::DeviceExt;

use super::vertex::Vertex;
use crate::scene::materials::MaterialSlot;

/// CPU-side triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

pub struct Mesh {
    pub data: MeshData,
    pub material: MaterialSlot,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }
}

pub struct Model {
    pub name: String,
    pub meshes: Vec<Mesh>,
}

impl Model {
    /// Wraps parsed meshes, every mesh starting on `material`
    pub fn from_data(name: &str, meshes: Vec<MeshData>, material: MaterialSlot) -> Self {
        Self {
            name: name.to_string(),
            meshes: meshes
                .into_iter()
                .map(|data| Mesh {
                    data,
                    material,
                    buffers: None,
                })
                .collect(),
        }
    }

    /// Creates vertex and index buffers for meshes that have none yet
    pub fn upload(&mut self, device: &wgpu::Device) {
        for mesh in self.meshes.iter_mut().filter(|m| m.buffers.is_none()) {
            let label = format!("{}/{}", self.name, mesh.data.name);
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(&mesh.data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", label)),
                contents: bytemuck::cast_slice(&mesh.data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            mesh.buffers = Some(MeshBuffers {
                vertex_buffer,
                index_buffer,
                index_count: mesh.data.indices.len() as u32,
            });
        }
    }

    /// Assigns `slot` to every mesh
    pub fn assign_material(&mut self, slot: MaterialSlot) {
        for mesh in &mut self.meshes {
            mesh.material = slot;
        }
    }

    pub fn materials(&self) -> impl Iterator<Item = MaterialSlot> + '_ {
        self.meshes.iter().map(|m| m.material)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}
