#![allow(dead_code)]

use byteorder::{ByteOrder, WriteBytesExt};
use ply_import::{FaceHandle, Importer, ScalarValue, VertexHandle};

/// Every importer call, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Reserve(usize, usize),
    AddVertex([f32; 3]),
    Normal(u32, [f32; 3]),
    Color(u32, [u8; 4]),
    TexCoord(u32, [f32; 2]),
    Custom(u32, String, ScalarValue),
    AddFace(Vec<u32>),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    vertices: u32,
    faces: u32,
}

impl Recorder {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn vertex_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::AddVertex(_)))
    }

    pub fn faces(&self) -> Vec<Vec<u32>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::AddFace(f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Importer for Recorder {
    fn add_vertex(&mut self, point: [f32; 3]) -> VertexHandle {
        self.calls.push(Call::AddVertex(point));
        self.vertices += 1;
        VertexHandle::new(self.vertices - 1)
    }

    fn add_face(&mut self, vertices: &[VertexHandle]) -> FaceHandle {
        self.calls
            .push(Call::AddFace(vertices.iter().map(|v| v.idx()).collect()));
        self.faces += 1;
        FaceHandle::new(self.faces - 1)
    }

    fn set_normal(&mut self, vertex: VertexHandle, normal: [f32; 3]) {
        self.calls.push(Call::Normal(vertex.idx(), normal));
    }

    fn set_color(&mut self, vertex: VertexHandle, rgba: [u8; 4]) {
        self.calls.push(Call::Color(vertex.idx(), rgba));
    }

    fn set_tex_coord(&mut self, vertex: VertexHandle, uv: [f32; 2]) {
        self.calls.push(Call::TexCoord(vertex.idx(), uv));
    }

    fn set_custom_property(&mut self, vertex: VertexHandle, name: &str, value: ScalarValue) {
        self.calls
            .push(Call::Custom(vertex.idx(), name.to_string(), value));
    }

    fn reserve(&mut self, vertices: usize, faces: usize) {
        self.calls.push(Call::Reserve(vertices, faces));
    }
}

/// A small mesh with positions, normals, uchar colors, a custom float and
/// mixed-size faces, encoded in byte order `E`.
pub fn binary_mesh<E: ByteOrder>(format: &str) -> Vec<u8> {
    let header = format!(
        r#"ply
format {format} 1.0
comment written by the test suite
element vertex 5
property float x
property float y
property float z
property float nx
property float ny
property float nz
property uchar red
property uchar green
property uchar blue
property float quality
element face 2
property list uchar int vertex_indices
end_header
"#
    );

    let mut data = header.into_bytes();
    for i in 0..5u8 {
        let f = i as f32;
        for v in [f, f * 2.0, -f, 0.0, 0.0, 1.0] {
            data.write_f32::<E>(v).unwrap();
        }
        data.write_u8(255).unwrap();
        data.write_u8(i * 10).unwrap();
        data.write_u8(0).unwrap();
        data.write_f32::<E>(f / 4.0).unwrap();
    }

    data.write_u8(3).unwrap();
    for idx in [0, 1, 2] {
        data.write_i32::<E>(idx).unwrap();
    }
    data.write_u8(4).unwrap();
    for idx in [1, 2, 3, 4] {
        data.write_i32::<E>(idx).unwrap();
    }
    data
}
