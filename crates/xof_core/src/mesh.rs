//! Assembled mesh representation handed to the host adapter.
//!
//! A `Mesh` is the result of parsing one `Mesh` block and merging its
//! independent index spaces. Index arithmetic is 1-based: slot 0 of the
//! position (and normal) arrays is a reserved placeholder that keeps the
//! face indices aligned with the source file. Hosts remove it after native
//! mesh construction, either themselves or via [`Mesh::strip_sentinel`].

use xof_math::{Aabb, Vec2, Vec3, Vec4};

use crate::scene::Material;

/// Face corner indices. Triangles are stored as degenerate quads with the
/// first index duplicated into the fourth slot.
pub type FaceIndices = [u32; 4];

/// A mesh with positions, quad-encoded faces, and optional per-corner
/// attributes, all in the target coordinate convention.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions; slot 0 is the reserved placeholder.
    pub positions: Vec<Vec3>,

    /// Vertex normals aligned with `positions` (placeholder at slot 0),
    /// present when the file carried a `MeshNormals` block.
    pub normals: Option<Vec<Vec3>>,

    /// Faces as quads of 1-based indices into `positions`.
    pub faces: Vec<FaceIndices>,

    /// UV coordinates per face corner, in face-traversal order.
    pub uvs: Option<Vec<[Vec2; 4]>>,

    /// RGBA colors per face corner, in face-traversal order.
    pub colors: Option<Vec<[Vec4; 4]>>,

    /// Material slot per face; empty when no `MeshMaterialList` was present,
    /// otherwise the same length as `faces`.
    pub material_indices: Vec<usize>,

    /// Mesh-local material slots referenced by `material_indices`.
    pub materials: Vec<Material>,
}

impl Mesh {
    /// Number of real vertices, excluding the reserved slot 0.
    pub fn vertex_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether a stored face is a degenerate quad encoding a triangle.
    pub fn is_triangle(face: &FaceIndices) -> bool {
        face[3] == face[0]
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Bounding box over the real vertices (the placeholder is skipped).
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points_iter(self.positions.iter().skip(1).copied())
    }

    /// Remove the reserved slot-0 vertex and rebase face indices to 0.
    ///
    /// This is the host-side cleanup step: after it, `positions` (and
    /// `normals`, when present) hold only real data and faces index them
    /// directly.
    pub fn strip_sentinel(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        self.positions.remove(0);
        if let Some(normals) = &mut self.normals {
            if !normals.is_empty() {
                normals.remove(0);
            }
        }
        for face in &mut self.faces {
            for index in face.iter_mut() {
                *index = index.saturating_sub(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> Mesh {
        Mesh {
            positions: vec![
                Vec3::ZERO, // placeholder
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[1, 2, 3, 4]],
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_exclude_placeholder() {
        let mesh = quad_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_triangle_detection() {
        assert!(Mesh::is_triangle(&[1, 2, 3, 1]));
        assert!(!Mesh::is_triangle(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_bounds_skip_placeholder() {
        let mut mesh = quad_mesh();
        // A placeholder far outside the real data must not affect bounds.
        mesh.positions[0] = Vec3::splat(-100.0);
        let bounds = mesh.bounds();
        assert_eq!(bounds.x.min, 0.0);
        assert_eq!(bounds.x.max, 1.0);
        assert_eq!(bounds.y.max, 1.0);
    }

    #[test]
    fn test_strip_sentinel() {
        let mut mesh = quad_mesh();
        mesh.normals = Some(vec![Vec3::X; 5]);
        mesh.strip_sentinel();

        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.normals.as_ref().unwrap().len(), 4);
        assert_eq!(mesh.faces[0], [0, 1, 2, 3]);
    }
}
