use glam::{DVec2, DVec3};

/// Triangle-strip mesh as flat parallel arrays, in emission order.
///
/// `vertices` and `normals` hold three floats per vertex, `uvs` two. Vertices
/// come in (low-u, high-u) pairs, so the count is always even.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StripMesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub rows: usize,
    pub columns: usize,
}

impl StripMesh {
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::with_capacity(vertex_count * 2),
            rows: 0,
            columns: 0,
        }
    }

    pub fn push(&mut self, position: DVec3, normal: DVec3, uv: DVec2) {
        self.vertices.extend_from_slice(&position.as_vec3().to_array());
        self.normals.extend_from_slice(&normal.as_vec3().to_array());
        self.uvs.extend_from_slice(&uv.as_vec2().to_array());
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    pub fn uv_count(&self) -> usize {
        self.uvs.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.vertex_count();
        self.vertices.len() % 3 == 0
            && self.normals.len() % 3 == 0
            && self.uvs.len() % 2 == 0
            && n == self.normal_count()
            && n == self.uv_count()
            && n % 2 == 0
    }

    pub fn byte_size(&self) -> usize {
        (self.vertices.len() + self.normals.len() + self.uvs.len()) * std::mem::size_of::<f32>()
    }
}

#[cfg(test)]
impl StripMesh {
    pub fn position(&self, index: usize) -> [f32; 3] {
        let i = index * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }

    pub fn normal(&self, index: usize) -> [f32; 3] {
        let i = index * 3;
        [self.normals[i], self.normals[i + 1], self.normals[i + 2]]
    }

    pub fn uv(&self, index: usize) -> [f32; 2] {
        let i = index * 2;
        [self.uvs[i], self.uvs[i + 1]]
    }
}
