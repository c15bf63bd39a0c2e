//! GLB / glTF parsing into flat, world-space meshes
//!
//! Node transforms are baked into the vertex positions so the renderer can
//! draw every mesh with the camera matrix alone.

use std::path::Path;

use cgmath::{Matrix4, SquareMatrix, Transform};
use log::{debug, warn};

use crate::{
    error::LoadError,
    gfx::scene::{model::MeshData, vertex::Vertex},
};

pub fn load_model_file(path: &Path) -> Result<Vec<MeshData>, LoadError> {
    let url = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        url: url.clone(),
        source,
    })?;
    parse_gltf(&url, &bytes, path.parent())
}

/// Parses a binary or JSON glTF document
///
/// Buffers come from the GLB binary chunk or, when `base_dir` is given,
/// from files next to the document. Primitives without positions are
/// skipped; a document with nothing drawable is an error.
pub fn parse_gltf(url: &str, bytes: &[u8], base_dir: Option<&Path>) -> Result<Vec<MeshData>, LoadError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|source| LoadError::Gltf {
        url: url.to_string(),
        source,
    })?;
    let document = gltf.document;
    let blob = gltf.blob;

    let buffers: Vec<Option<Vec<u8>>> = document
        .buffers()
        .map(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => blob.clone(),
            gltf::buffer::Source::Uri(uri) => {
                let dir = base_dir?;
                match std::fs::read(dir.join(uri)) {
                    Ok(data) => Some(data),
                    Err(e) => {
                        warn!("{}: buffer '{}' unavailable: {}", url, uri, e);
                        None
                    }
                }
            }
        })
        .collect();

    let Some(scene) = document
        .default_scene()
        .or_else(|| document.scenes().next())
    else {
        return Err(LoadError::EmptyModel {
            url: url.to_string(),
        });
    };

    let mut meshes = Vec::new();
    let mut stack: Vec<(gltf::Node, Matrix4<f32>)> =
        scene.nodes().map(|n| (n, Matrix4::identity())).collect();

    while let Some((node, parent_transform)) = stack.pop() {
        let world = parent_transform * Matrix4::from(node.transform().matrix());

        if let Some(mesh) = node.mesh() {
            let mesh_name = mesh.name().or(node.name()).unwrap_or("mesh");

            for (index, primitive) in mesh.primitives().enumerate() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    debug!("{}: skipping non-triangle primitive in {}", url, mesh_name);
                    continue;
                }

                let reader = primitive.reader(|buffer| buffers[buffer.index()].as_deref());

                let positions: Vec<[f32; 3]> = match reader.read_positions() {
                    Some(iter) => iter.collect(),
                    None => continue,
                };
                if positions.is_empty() {
                    continue;
                }

                let tex_coords: Vec<[f32; 2]> = reader
                    .read_tex_coords(0)
                    .map(|t| t.into_f32().collect())
                    .unwrap_or_else(|| vec![[0.0; 2]; positions.len()]);
                let indices: Vec<u32> = reader
                    .read_indices()
                    .map(|i| i.into_u32().collect())
                    .unwrap_or_else(|| (0..positions.len() as u32).collect());

                let vertices = positions
                    .iter()
                    .zip(tex_coords.iter().chain(std::iter::repeat(&[0.0, 0.0])))
                    .map(|(p, uv)| {
                        let world_pos = world.transform_point(cgmath::Point3::new(p[0], p[1], p[2]));
                        Vertex {
                            position: [world_pos.x, world_pos.y, world_pos.z],
                            tex_coord: *uv,
                        }
                    })
                    .collect();

                meshes.push(MeshData {
                    name: format!("{}#{}", mesh_name, index),
                    vertices,
                    indices,
                });
            }
        }

        stack.extend(node.children().map(|child| (child, world)));
    }

    if meshes.is_empty() {
        return Err(LoadError::EmptyModel {
            url: url.to_string(),
        });
    }

    debug!("{}: parsed {} meshes", url, meshes.len());
    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Packs a JSON document and an optional binary chunk into a GLB container
    fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let bin_chunk_len = if bin.is_empty() { 0 } else { 8 + bin.len() };
        let total = 12 + 8 + json.len() + bin_chunk_len;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        if !bin.is_empty() {
            out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            out.extend_from_slice(b"BIN\0");
            out.extend_from_slice(&bin);
        }
        out
    }

    fn triangle_glb() -> Vec<u8> {
        let mut bin = Vec::new();
        for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for uv in [[0.0f32, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            for c in uv {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in [0u16, 1, 2] {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        assert_eq!(bin.len(), 66);

        let json = r#"{
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [{"name": "root", "translation": [1.0, 2.0, 3.0], "children": [1]},
                      {"mesh": 0}],
            "meshes": [{"name": "tri", "primitives": [{"attributes": {"POSITION": 0, "TEXCOORD_0": 1}, "indices": 2}]}],
            "buffers": [{"byteLength": 68}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 36},
                {"buffer": 0, "byteOffset": 36, "byteLength": 24},
                {"buffer": 0, "byteOffset": 60, "byteLength": 6}
            ],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                 "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
                {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2"},
                {"bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR"}
            ]
        }"#;

        glb(json, &bin)
    }

    #[test]
    fn test_node_transforms_are_baked() {
        let meshes = parse_gltf("tri.glb", &triangle_glb(), None).unwrap();
        assert_eq!(meshes.len(), 1);

        let mesh = &meshes[0];
        assert_eq!(mesh.name, "tri#0");
        assert_eq!(mesh.indices, vec![0, 1, 2]);

        let positions: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[1.0, 2.0, 3.0], [2.0, 2.0, 3.0], [1.0, 3.0, 3.0]]);
        assert_eq!(mesh.vertices[2].tex_coord, [0.0, 1.0]);
    }

    #[test]
    fn test_document_without_meshes_is_empty_model() {
        let bytes = glb(r#"{"asset": {"version": "2.0"}, "scenes": [{"nodes": []}]}"#, &[]);
        let err = parse_gltf("empty.glb", &bytes, None).unwrap_err();
        assert!(matches!(err, LoadError::EmptyModel { .. }));
        assert_eq!(err.url(), "empty.glb");
    }

    #[test]
    fn test_garbage_is_gltf_error() {
        let err = parse_gltf("bad.glb", b"glTF garbage", None).unwrap_err();
        assert!(matches!(err, LoadError::Gltf { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_model_file(Path::new("no/such/model.glb")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
