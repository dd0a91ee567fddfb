use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn key(&self) -> [u32; 8] {
        let [x, y, z] = self.pos;
        let [nx, ny, nz] = self.normal;
        let [u, v] = self.uv;
        [x, y, z, nx, ny, nz, u, v].map(f32::to_bits)
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Build an indexed mesh from a flat triangle list, sharing bit-identical
    /// vertices.
    pub fn from_triangle_list(corners: impl IntoIterator<Item = Vertex>) -> Self {
        let mut mesh = Mesh::default();
        let mut seen: HashMap<[u32; 8], u32> = HashMap::new();
        for vertex in corners {
            let index = *seen.entry(vertex.key()).or_insert_with(|| {
                mesh.vertices.push(vertex);
                (mesh.vertices.len() - 1) as u32
            });
            mesh.indices.push(index);
        }
        mesh
    }

    /// Triangles as vertex triples, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertices = bytemuck::cast_slice(&self.vertices);
        let indices = bytemuck::cast_slice(&self.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: indices,
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(pos: [f32; 3], uv: [f32; 2]) -> Vertex {
        Vertex { pos, normal: [0.0, 0.0, 1.0], uv }
    }

    #[test]
    fn shares_identical_corners() {
        let quad = [
            v([0.0, 0.0, 0.0], [0.0, 0.0]),
            v([1.0, 0.0, 0.0], [1.0, 0.0]),
            v([1.0, 1.0, 0.0], [1.0, 1.0]),
            v([0.0, 0.0, 0.0], [0.0, 0.0]),
            v([1.0, 1.0, 0.0], [1.0, 1.0]),
            v([0.0, 1.0, 0.0], [0.0, 1.0]),
        ];
        let mesh = Mesh::from_triangle_list(quad);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.triangles().count(), 2);
    }

    #[test]
    fn differing_attributes_stay_separate() {
        let mesh = Mesh::from_triangle_list([
            v([0.0, 0.0, 0.0], [0.0, 0.0]),
            v([0.0, 0.0, 0.0], [1.0, 0.0]),
            v([0.0, 0.0, 0.0], [0.0, 0.0]),
        ]);
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 0]);
    }

    #[test]
    fn empty_input_gives_empty_mesh() {
        let mesh = Mesh::from_triangle_list(std::iter::empty());
        assert!(mesh.vertices.is_empty());
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn layout_stride_matches_struct() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
    }
}
