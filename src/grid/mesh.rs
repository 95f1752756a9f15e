use std::collections::BTreeSet;

use crate::math::{Point2, Point3, Vector3};

/// A triangle mesh for one finite grid plane.
///
/// Vertices lie in the local XZ plane, lifted by a small offset along the
/// local +Y normal so the surface never z-fights coplanar geometry.
/// Generated once per build session; re-anchoring only moves a transform.
#[derive(Debug, Clone, Default)]
pub struct GridMesh {
    /// Vertex positions in the surface's local frame.
    pub vertices: Vec<Point3>,
    /// Vertex normals (all equal to the plane's up direction).
    pub normals: Vec<Vector3>,
    /// UV coordinates: normalized lattice indices.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl GridMesh {
    /// Generates the plane mesh for a grid of `width x depth` cells,
    /// centered on the local origin.
    ///
    /// Emits one vertex per lattice point, `(width + 1) * (depth + 1)` in
    /// total, and two consistently wound triangles per cell.
    #[must_use]
    pub fn generate(cell_size: f64, width: u32, depth: u32, normal_offset: f64) -> Self {
        let cols = width + 1;
        let rows = depth + 1;
        // Widened before multiplying; counts near the u32 extents would
        // overflow otherwise.
        let lattice = cols as usize * rows as usize;
        let mut vertices = Vec::with_capacity(lattice);
        let mut normals = Vec::with_capacity(lattice);
        let mut uvs = Vec::with_capacity(lattice);

        for z in 0..rows {
            for x in 0..cols {
                let x_pos = (f64::from(x) - f64::from(width) * 0.5) * cell_size;
                let z_pos = (f64::from(z) - f64::from(depth) * 0.5) * cell_size;
                vertices.push(Point3::new(x_pos, normal_offset, z_pos));
                normals.push(Vector3::y());
                uvs.push(Point2::new(
                    f64::from(x) / f64::from(width),
                    f64::from(z) / f64::from(depth),
                ));
            }
        }

        let mut indices = Vec::with_capacity(width as usize * depth as usize * 2);
        for z in 0..depth {
            for x in 0..width {
                let current = z * cols + x;
                let next = current + 1;
                indices.push([current, next, current + cols]);
                indices.push([next, next + cols, current + cols]);
            }
        }

        Self {
            vertices,
            normals,
            uvs,
            indices,
        }
    }

    /// Number of vertices in the mesh.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles in the mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Extracts the unique edges of the mesh as local-space segment pairs,
    /// for wireframe-style overlay rendering. Edges shared by two
    /// triangles are emitted once.
    #[must_use]
    pub fn wireframe_edges(&self) -> Vec<(Point3, Point3)> {
        let mut seen = BTreeSet::new();
        for tri in &self.indices {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                let _ = seen.insert(key);
            }
        }
        seen.into_iter()
            .map(|(a, b)| (self.vertices[a as usize], self.vertices[b as usize]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn lattice_counts_match_extents() {
        let mesh = GridMesh::generate(1.0, 4, 4, 0.02);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        assert_eq!(mesh.normals.len(), 25);
        assert_eq!(mesh.uvs.len(), 25);
    }

    #[test]
    fn vertices_are_centered_and_lifted() {
        let mesh = GridMesh::generate(2.0, 2, 2, 0.05);
        // First lattice point is the minimum corner.
        assert_relative_eq!(mesh.vertices[0].x, -2.0);
        assert_relative_eq!(mesh.vertices[0].z, -2.0);
        assert_relative_eq!(mesh.vertices[0].y, 0.05);
        // Center vertex sits on the origin.
        assert_relative_eq!(mesh.vertices[4].x, 0.0);
        assert_relative_eq!(mesh.vertices[4].z, 0.0);
    }

    #[test]
    fn uvs_span_unit_square() {
        let mesh = GridMesh::generate(1.0, 4, 4, 0.0);
        assert_relative_eq!(mesh.uvs[0].x, 0.0);
        let last = mesh.uvs.last().copied().unwrap_or_default();
        assert_relative_eq!(last.x, 1.0);
        assert_relative_eq!(last.y, 1.0);
    }

    #[test]
    fn triangles_reference_valid_vertices() {
        let mesh = GridMesh::generate(1.0, 3, 5, 0.0);
        let count = u32::try_from(mesh.vertex_count()).unwrap_or(u32::MAX);
        for tri in &mesh.indices {
            for index in tri {
                assert!(*index < count);
            }
        }
    }

    #[test]
    fn wireframe_deduplicates_shared_edges() {
        let mesh = GridMesh::generate(1.0, 1, 1, 0.0);
        // One cell: 4 boundary edges plus 1 diagonal.
        assert_eq!(mesh.wireframe_edges().len(), 5);
    }
}
