//! # Primitive Shape Generation
//!
//! All shapes are centred on the origin with UV coordinates from 0 to 1 per
//! face.

use super::GeometryData;

/// Generate a box centred at the origin
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face (+Z)
        [-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z],
        // Back face (-Z)
        [-x, -y, -z], [-x,  y, -z], [ x,  y, -z], [ x, -y, -z],
        // Left face (-X)
        [-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z],
        // Right face (+X)
        [ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z],
        // Top face (+Y)
        [-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z],
        // Bottom face (-Y)
        [-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z],
    ];

    #[rustfmt::skip]
    let tex_coords = [
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
    ];

    // Two counter-clockwise triangles per face
    let indices = (0..6u32)
        .flat_map(|face| {
            let i = face * 4;
            [i, i + 1, i + 2, i + 2, i + 3, i]
        })
        .collect();

    GeometryData {
        vertices: positions.to_vec(),
        tex_coords: tex_coords.to_vec(),
        indices,
    }
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for row in 0..=h_segs {
        let v = row as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for col in 0..=w_segs {
            let u = col as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            // Texture rows run top to bottom
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    for row in 0..h_segs {
        for col in 0..w_segs {
            let i = row * (w_segs + 1) + col;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[i + 1, next_row + 1, next_row]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(data: &GeometryData) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in &data.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        (min, max)
    }

    fn triangle_normal_z(data: &GeometryData, triangle: usize) -> f32 {
        let [a, b, c] = [0, 1, 2].map(|k| data.vertices[data.indices[triangle * 3 + k] as usize]);
        let e1 = [b[0] - a[0], b[1] - a[1]];
        let e2 = [c[0] - a[0], c[1] - a[1]];
        e1[0] * e2[1] - e1[1] * e2[0]
    }

    #[test]
    fn test_box_extents() {
        let data = generate_box(1.0, 0.5, 0.1);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);

        let (min, max) = bounds(&data);
        assert_eq!(min, [-0.5, -0.25, -0.05]);
        assert_eq!(max, [0.5, 0.25, 0.05]);
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertex_count()));
    }

    #[test]
    fn test_box_front_face_is_counter_clockwise() {
        let data = generate_box(2.0, 2.0, 2.0);
        assert!(triangle_normal_z(&data, 0) > 0.0);
        assert!(triangle_normal_z(&data, 1) > 0.0);
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let data = generate_plane(1.0, 0.5, 1, 1);
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.triangle_count(), 2);
        assert!(data.vertices.iter().all(|v| v[2] == 0.0));
        assert!(triangle_normal_z(&data, 0) > 0.0);
        assert!(triangle_normal_z(&data, 1) > 0.0);
    }

    #[test]
    fn test_translated_geometry_converts_to_mesh() {
        let mesh = generate_plane(1.0, 0.5, 1, 1)
            .translated([0.0, 1.0, 0.06])
            .into_mesh_data("text");
        assert_eq!(mesh.name, "text");
        assert_eq!(mesh.vertices.len(), 4);
        assert!(mesh.vertices.iter().all(|v| (v.position[2] - 0.06).abs() < 1e-6));
        assert!(mesh.vertices.iter().all(|v| v.position[1] >= 0.75 && v.position[1] <= 1.25));
    }
}
