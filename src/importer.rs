//! The contract between the reader and whatever builds the mesh.

use serde::Serialize;

use crate::ScalarValue;

/// Handle to a vertex created by an [`Importer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VertexHandle(u32);

impl VertexHandle {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn idx(&self) -> u32 {
        self.0
    }
}

/// Handle to a face created by an [`Importer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FaceHandle(u32);

impl FaceHandle {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn idx(&self) -> u32 {
        self.0
    }
}

/// Receives decoded mesh data from the reader.
///
/// Only vertex and face creation are required. The setters are called after
/// `add_vertex` for the same vertex, and only for data that was both requested
/// and declared by the file.
pub trait Importer {
    fn add_vertex(&mut self, point: [f32; 3]) -> VertexHandle;

    fn add_face(&mut self, vertices: &[VertexHandle]) -> FaceHandle;

    fn set_normal(&mut self, _vertex: VertexHandle, _normal: [f32; 3]) {}

    fn set_color(&mut self, _vertex: VertexHandle, _rgba: [u8; 4]) {}

    fn set_tex_coord(&mut self, _vertex: VertexHandle, _uv: [f32; 2]) {}

    fn set_custom_property(&mut self, _vertex: VertexHandle, _name: &str, _value: ScalarValue) {}

    /// Called once before any element is read with the declared counts,
    /// capped to a sane size. The file may still hold more or fewer.
    fn reserve(&mut self, _vertices: usize, _faces: usize) {}
}

/// An [`Importer`] that collects everything into plain vectors.
///
/// Per-vertex attribute vectors are only filled for vertices that received
/// the attribute; vertices without one get the default value so indices stay
/// aligned with `points`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshBuffer {
    pub points: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[u8; 4]>,
    pub tex_coords: Vec<[f32; 2]>,
    /// `(vertex, name, value)` in delivery order.
    pub custom: Vec<(u32, String, ScalarValue)>,
    pub faces: Vec<Vec<u32>>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom values delivered under `name`, in vertex order.
    pub fn custom_values(&self, name: &str) -> Vec<ScalarValue> {
        self.custom
            .iter()
            .filter(|(_, n, _)| n == name)
            .map(|(_, _, v)| *v)
            .collect()
    }
}

fn set_aligned<T: Copy + Default>(values: &mut Vec<T>, idx: u32, value: T) {
    let idx = idx as usize;
    if values.len() <= idx {
        values.resize(idx + 1, T::default());
    }
    values[idx] = value;
}

impl Importer for MeshBuffer {
    fn add_vertex(&mut self, point: [f32; 3]) -> VertexHandle {
        self.points.push(point);
        VertexHandle::new(self.points.len() as u32 - 1)
    }

    fn add_face(&mut self, vertices: &[VertexHandle]) -> FaceHandle {
        self.faces.push(vertices.iter().map(VertexHandle::idx).collect());
        FaceHandle::new(self.faces.len() as u32 - 1)
    }

    fn set_normal(&mut self, vertex: VertexHandle, normal: [f32; 3]) {
        set_aligned(&mut self.normals, vertex.idx(), normal);
    }

    fn set_color(&mut self, vertex: VertexHandle, rgba: [u8; 4]) {
        set_aligned(&mut self.colors, vertex.idx(), rgba);
    }

    fn set_tex_coord(&mut self, vertex: VertexHandle, uv: [f32; 2]) {
        set_aligned(&mut self.tex_coords, vertex.idx(), uv);
    }

    fn set_custom_property(&mut self, vertex: VertexHandle, name: &str, value: ScalarValue) {
        self.custom.push((vertex.idx(), name.to_string(), value));
    }

    fn reserve(&mut self, vertices: usize, faces: usize) {
        self.points.reserve(vertices);
        self.faces.reserve(faces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_buffer_alignment() {
        let mut mesh = MeshBuffer::new();
        let a = mesh.add_vertex([0.0, 0.0, 0.0]);
        let b = mesh.add_vertex([1.0, 0.0, 0.0]);
        mesh.set_color(b, [1, 2, 3, 4]);

        assert_eq!(a.idx(), 0);
        assert_eq!(mesh.colors, vec![[0, 0, 0, 0], [1, 2, 3, 4]]);

        let f = mesh.add_face(&[a, b]);
        assert_eq!(f.idx(), 0);
        assert_eq!(mesh.faces, vec![vec![0, 1]]);
    }

    #[test]
    fn test_mesh_buffer_serializes() {
        let mut mesh = MeshBuffer::new();
        let v = mesh.add_vertex([1.0, 2.0, 3.0]);
        mesh.set_custom_property(v, "quality", ScalarValue::Float32(0.5));

        let json = serde_json::to_value(&mesh).unwrap();
        assert_eq!(json["points"][0][2], 3.0);
        assert_eq!(json["custom"][0][1], "quality");
    }
}
