//! Vertex normal recomputation.

use glam::Vec3;

use crate::MeshVertex;

/// Recompute all vertex normals from the displaced positions.
///
/// Face normals are accumulated unnormalized (cross-product magnitude equals
/// twice the triangle area), so larger faces pull shared vertices harder,
/// then each sum is normalized. Deterministic and idempotent for fixed
/// positions. Degenerate triangles contribute nothing.
pub fn recompute_normals(vertices: &mut [MeshVertex], indices: &[u32]) {
    for vertex in vertices.iter_mut() {
        vertex.normal = [0.0; 3];
    }

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = Vec3::from_array(vertices[i0].position);
        let p1 = Vec3::from_array(vertices[i1].position);
        let p2 = Vec3::from_array(vertices[i2].position);
        let face = (p1 - p0).cross(p2 - p0);
        for &i in &[i0, i1, i2] {
            let n = Vec3::from_array(vertices[i].normal) + face;
            vertices[i].normal = n.to_array();
        }
    }

    for vertex in vertices.iter_mut() {
        let n = Vec3::from_array(vertex.normal).normalize_or_zero();
        vertex.normal = n.to_array();
    }
}
