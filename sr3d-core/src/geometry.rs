//! Geometry primitives for 3D rendering

use crate::error::MeshError;
use crate::math::{normalized, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub normal: Vector3,
}

impl Vertex {
    pub fn new(position: Vector3, normal: Vector3) -> Self {
        Self { position, normal }
    }

    /// A vertex with a zero normal.
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vector3::new(x, y, z), Vector3::zeros())
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    ///
    /// Zero for degenerate triangles.
    pub fn calculate_normal(&self) -> Vector3 {
        let [p0, p1, p2] = self.vertices.map(|v| v.position);
        face_normal(&p0, &p1, &p2)
    }

    /// Replace every vertex normal with the face normal.
    pub fn flatten_normals(&mut self) {
        let n = self.calculate_normal();
        for v in &mut self.vertices {
            v.normal = n;
        }
    }
}

/// Unit normal of the triangle `p0 p1 p2`, following the right-hand rule.
pub fn face_normal(p0: &Vector3, p1: &Vector3, p2: &Vector3) -> Vector3 {
    normalized((p1 - p0).cross(&(p2 - p0)))
}

/// An indexed triangle mesh.
///
/// Every consecutive triple of `indices` names one triangle. Triangles are
/// wound clockwise by convention.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates a mesh, checking that `indices` forms whole triangles and that
    /// every index refers to a vertex.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(indices.len()));
        }
        let len = vertices.len();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= len) {
            return Err(MeshError::IndexOutOfRange {
                index: index as usize,
                len,
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Builds an unrolled mesh: each triangle gets three vertices of its own.
    pub fn from_triangles<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = Triangle>,
    {
        let triangles = triangles.into_iter();
        let mut mesh = Self::with_capacity(triangles.size_hint().0 * 3);
        for triangle in triangles {
            mesh.push_triangle(triangle);
        }
        mesh
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices),
        }
    }

    /// Appends a triangle with three new vertices.
    pub fn push_triangle(&mut self, triangle: Triangle) {
        for vertex in triangle.vertices {
            self.indices.push(self.vertices.len() as u32);
            self.vertices.push(vertex);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over the triangles as index triples, in index-buffer order.
    pub fn faces(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Iterates over the triangles, in index-buffer order. Faces with an
    /// index past the vertex list are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces().filter_map(|[a, b, c]| {
            let v = |i: usize| self.vertices.get(i).copied();
            Some(Triangle::new(v(a)?, v(b)?, v(c)?))
        })
    }

    /// Axis-aligned bounds of the vertex positions, or `None` if there are
    /// no vertices.
    pub fn bounds(&self) -> Option<(Vector3, Vector3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.inf(&v.position), hi.sup(&v.position))
        }))
    }

    /// Create a unit cube centered on the origin, spanning `[-0.5, 0.5]`.
    ///
    /// Eight shared corners, twelve clockwise triangles. Corner normals point
    /// away from the center.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        let corners = [
            // Front face (z = -0.5)
            (-0.5, 0.5, -0.5),  // 0: top left
            (0.5, 0.5, -0.5),   // 1: top right
            (0.5, -0.5, -0.5),  // 2: bottom right
            (-0.5, -0.5, -0.5), // 3: bottom left
            // Back face (z = 0.5)
            (-0.5, 0.5, 0.5),   // 4: top left
            (0.5, 0.5, 0.5),    // 5: top right
            (0.5, -0.5, 0.5),   // 6: bottom right
            (-0.5, -0.5, 0.5),  // 7: bottom left
        ];
        let vertices = corners
            .into_iter()
            .map(|(x, y, z)| {
                let position = Vector3::new(x, y, z);
                Vertex::new(position, normalized(position))
            })
            .collect();

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 0, 2, 3, // front
            5, 4, 7, 5, 7, 6, // back
            4, 5, 1, 4, 1, 0, // top
            3, 2, 6, 3, 6, 7, // bottom
            4, 0, 3, 4, 3, 7, // left
            1, 5, 6, 1, 6, 2, // right
        ];

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_shape() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!(Mesh::new(cube.vertices.clone(), cube.indices.clone()).is_ok());

        let (lo, hi) = cube.bounds().unwrap();
        assert_eq!(lo, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(hi, Vector3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        // Clockwise as seen from outside: the cross-product normal of every
        // face points away from the center.
        let cube = Mesh::cube();
        for triangle in cube.triangles() {
            let n = triangle.calculate_normal();
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.position)
                / 3.0;
            assert!(n.dot(&centroid) > 0.0, "{triangle:?}");
        }
    }

    #[test]
    fn test_new_rejects_partial_triangle() {
        let verts = vec![Vertex::at(0.0, 0.0, 0.0), Vertex::at(1.0, 0.0, 0.0)];
        assert_eq!(
            Mesh::new(verts, vec![0, 1]).unwrap_err(),
            MeshError::IndexCount(2)
        );
    }

    #[test]
    fn test_new_rejects_out_of_range_index() {
        let verts = vec![
            Vertex::at(0.0, 0.0, 0.0),
            Vertex::at(1.0, 0.0, 0.0),
            Vertex::at(0.0, 1.0, 0.0),
        ];
        assert_eq!(
            Mesh::new(verts, vec![0, 1, 3]).unwrap_err(),
            MeshError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn test_triangles_skip_out_of_range_faces() {
        let mut cube = Mesh::cube();
        cube.indices.extend([0, 1, 42]);
        assert_eq!(cube.triangle_count(), 13);
        assert_eq!(cube.triangles().count(), 12);
    }

    #[test]
    fn test_from_triangles_unrolls() {
        let t = Triangle::new(
            Vertex::at(0.0, 0.0, 0.0),
            Vertex::at(1.0, 0.0, 0.0),
            Vertex::at(0.0, 1.0, 0.0),
        );
        let mesh = Mesh::from_triangles([t.clone(), t]);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flat_normal() {
        let mut t = Triangle::new(
            Vertex::at(0.0, 0.0, 0.0),
            Vertex::at(1.0, 0.0, 0.0),
            Vertex::at(0.0, 1.0, 0.0),
        );
        t.flatten_normals();
        for v in &t.vertices {
            assert_eq!(v.normal, Vector3::new(0.0, 0.0, 1.0));
        }

        let degenerate = Triangle::new(
            Vertex::at(1.0, 1.0, 1.0),
            Vertex::at(1.0, 1.0, 1.0),
            Vertex::at(2.0, 2.0, 2.0),
        );
        assert_eq!(degenerate.calculate_normal(), Vector3::zeros());
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Mesh::default().bounds().is_none());
        assert!(Mesh::default().is_empty());
    }
}
