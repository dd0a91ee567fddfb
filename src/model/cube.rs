//! Static cube geometry.
//!
//! The cube spans `[-1, 1]` on every axis. Triangles are wound
//! counter-clockwise when seen from outside, two per face, faces in the order
//! +Z, +X, -Z, -X, +Y, -Y.

use glam::{Mat4, Vec3};

use crate::utils::{Mesh, Vertex};

/// Radians of spin around +Y per second of elapsed time.
pub const SPIN_RATE: f32 = 0.5;

pub const CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
];

pub const TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 3],
    [0, 1, 2],
    [1, 7, 2],
    [1, 6, 7],
    [6, 5, 4],
    [4, 7, 6],
    [3, 4, 5],
    [3, 5, 0],
    [3, 7, 4],
    [3, 2, 7],
    [0, 6, 1],
    [0, 5, 6],
];

pub const TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

pub const TEX_TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 3],
    [0, 1, 2],
    [0, 2, 3],
    [0, 1, 2],
    [0, 1, 2],
    [2, 3, 0],
    [2, 3, 0],
    [2, 0, 1],
    [0, 2, 3],
    [0, 1, 2],
    [3, 1, 2],
    [3, 0, 1],
];

pub const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

/// Expand the tables into an indexed mesh (24 vertices, 36 indices).
pub fn cube_mesh() -> Mesh {
    let corners = TRIANGLES.iter().zip(TEX_TRIANGLES.iter()).enumerate().flat_map(|(tri, (pos, uv))| {
        let normal = FACE_NORMALS[tri / 2];
        (0..3).map(move |i| Vertex {
            pos: CORNERS[pos[i]],
            normal,
            uv: TEX_COORDS[uv[i]],
        })
    });
    Mesh::from_triangle_list(corners)
}

/// Model matrix after `time` seconds of spinning.
pub fn model_matrix(time: f32) -> Mat4 {
    Mat4::from_rotation_y(time * SPIN_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_is_indexed_and_shares_face_corners() {
        let mesh = cube_mesh();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn winding_agrees_with_outward_normals() {
        let mesh = cube_mesh();
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (Vec3::from(a.pos), Vec3::from(b.pos), Vec3::from(c.pos));
            let winding = (pb - pa).cross(pc - pa).normalize();
            let normal = Vec3::from(a.normal);
            assert!(winding.abs_diff_eq(normal, 1e-6), "triangle {pa} {pb} {pc} winds against {normal}");
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.normal, c.normal);

            // Every corner of the face lies on the outward side
            let centroid = (pa + pb + pc) / 3.0;
            assert!(centroid.dot(normal) > 0.0);
        }
    }

    #[test]
    fn each_face_uses_the_whole_texture() {
        let mesh = cube_mesh();
        for face in mesh.indices.chunks_exact(6) {
            let mut uvs: Vec<[u32; 2]> = face
                .iter()
                .map(|&i| mesh.vertices[i as usize].uv.map(f32::to_bits))
                .collect();
            uvs.sort();
            uvs.dedup();
            assert_eq!(uvs.len(), 4);
        }
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.uv.iter().all(|c| (0.0..=1.0).contains(c))));
    }

    #[test]
    fn normals_are_unit_axes() {
        for n in FACE_NORMALS {
            assert_eq!(Vec3::from(n).length(), 1.0);
        }
    }

    #[test]
    fn model_matrix_spins_about_y() {
        assert_eq!(model_matrix(0.0), Mat4::IDENTITY);

        // pi seconds at half a radian per second is a quarter turn
        let quarter = model_matrix(std::f32::consts::PI);
        let x = quarter.transform_vector3(Vec3::X);
        assert!(x.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(quarter.transform_vector3(Vec3::Y).abs_diff_eq(Vec3::Y, 1e-6));
    }
}
