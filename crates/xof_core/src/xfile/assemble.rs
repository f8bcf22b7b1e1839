//! Mesh assembly: merging independent index spaces into one vertex buffer.
//!
//! A rendering vertex can carry only one normal, but the file format
//! indexes positions and normals independently. Assembly builds the set of
//! distinct `(position, normal)` corner pairs, gives each pair one slot in
//! a unified vertex array, and rewrites every face through that mapping. A
//! position shared by faces with different normals becomes multiple
//! unified vertices, which keeps hard edges hard.

use std::collections::{BTreeSet, HashMap};

use xof_math::{Vec2, Vec3, Vec4};

use crate::mesh::{FaceIndices, Mesh};

use super::types::MeshData;

/// Build the final [`Mesh`] from parsed mesh data.
///
/// Without a normal stream the position-indexed data passes through
/// unchanged. Per-corner UV/color binding and material-slot assignment
/// happen here in both cases.
pub fn assemble_mesh(data: MeshData) -> Mesh {
    let (positions, normals, faces) = if data.has_normal_stream() {
        let (positions, normals, faces) = merge_normal_stream(&data);
        (positions, Some(normals), faces)
    } else {
        (data.coords.clone(), None, data.faces.clone())
    };

    // UVs and colors bind per face corner, in face-traversal order, through
    // the *original* position indices; the merged faces above keep the same
    // corner order, so walking the raw faces stays aligned.
    let face_count = faces.len();

    let uvs = (data.tex_coords.len() > 1).then(|| {
        data.faces[..face_count]
            .iter()
            .map(|face| {
                face.map(|index| {
                    data.tex_coords
                        .get(index as usize)
                        .copied()
                        .unwrap_or(Vec2::ZERO)
                })
            })
            .collect()
    });

    let colors = (data.vertex_colors.len() > 1).then(|| {
        data.faces[..face_count]
            .iter()
            .map(|face| {
                face.map(|index| {
                    data.vertex_colors
                        .get(index as usize)
                        .copied()
                        .unwrap_or(Vec4::ONE)
                })
            })
            .collect()
    });

    // Faces beyond the end of the material-index list reuse its last entry.
    let material_indices = match data.face_material_index.last().copied() {
        Some(last) => (0..face_count)
            .map(|i| data.face_material_index.get(i).copied().unwrap_or(last))
            .collect(),
        None => Vec::new(),
    };

    Mesh {
        positions,
        normals,
        faces,
        uvs,
        colors,
        material_indices,
        materials: data.materials,
    }
}

/// Merge the position and normal index spaces.
///
/// Distinct corner pairs are collected in a `BTreeSet`, which orders the
/// unified vertices ascending by `(position, normal)`. Faces are walked
/// pairwise with their normal faces; if one list is shorter, the excess of
/// the longer is dropped.
fn merge_normal_stream(data: &MeshData) -> (Vec<Vec3>, Vec<Vec3>, Vec<FaceIndices>) {
    let mut pairs: BTreeSet<(u32, u32)> = BTreeSet::new();
    for (vf, nf) in data.faces.iter().zip(&data.face_normals) {
        for (&v, &n) in vf.iter().zip(nf) {
            pairs.insert((v, n));
        }
    }

    let mut positions = vec![Vec3::ZERO];
    let mut normals = vec![Vec3::X];
    let mut remap: HashMap<(u32, u32), u32> = HashMap::with_capacity(pairs.len());
    for (i, &(v, n)) in pairs.iter().enumerate() {
        positions.push(data.coords.get(v as usize).copied().unwrap_or(Vec3::ZERO));
        normals.push(data.normals.get(n as usize).copied().unwrap_or(Vec3::X));
        remap.insert((v, n), (i + 1) as u32);
    }

    let faces = data
        .faces
        .iter()
        .zip(&data.face_normals)
        .map(|(vf, nf)| {
            let mut face: FaceIndices = [0; 4];
            for (slot, (&v, &n)) in face.iter_mut().zip(vf.iter().zip(nf)) {
                *slot = remap.get(&(v, n)).copied().unwrap_or(0);
            }
            face
        })
        .collect();

    (positions, normals, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(n: usize) -> Vec<Vec3> {
        // Placeholder plus n distinguishable positions.
        (0..=n).map(|i| Vec3::splat(i as f32)).collect()
    }

    #[test]
    fn test_passthrough_without_normal_stream() {
        let data = MeshData {
            coords: coords(3),
            faces: vec![[1, 2, 3, 1]],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.faces, vec![[1, 2, 3, 1]]);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn test_shared_normal_still_splits_corners() {
        // One triangle whose corners all use normal 0 must still produce
        // three unified vertices, one per distinct (position, normal) pair.
        let data = MeshData {
            coords: coords(3),
            faces: vec![[1, 2, 3, 1]],
            normals: vec![Vec3::Z],
            face_normals: vec![[0, 0, 0, 0]],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);

        assert_eq!(mesh.positions.len(), 4); // placeholder + 3
        assert_eq!(mesh.faces, vec![[1, 2, 3, 1]]);
        let normals = mesh.normals.unwrap();
        assert_eq!(normals.len(), 4);
        assert!(normals[1..].iter().all(|&n| n == Vec3::Z));
    }

    #[test]
    fn test_hard_edge_duplicates_position() {
        // Two triangles share positions 1 and 2 but disagree on normals,
        // so the shared positions must appear twice in the unified set.
        let data = MeshData {
            coords: coords(4),
            faces: vec![[1, 2, 3, 1], [1, 2, 4, 1]],
            normals: vec![Vec3::Z, Vec3::Y],
            face_normals: vec![[0, 0, 0, 0], [1, 1, 1, 1]],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);

        // Pairs: (1,0) (2,0) (3,0) (1,1) (2,1) (4,1) -> 6 unified vertices.
        assert_eq!(mesh.positions.len(), 7);
        // Ascending (position, normal) order.
        assert_eq!(mesh.positions[1], Vec3::splat(1.0)); // (1,0)
        assert_eq!(mesh.positions[2], Vec3::splat(1.0)); // (1,1)
        assert_eq!(mesh.positions[3], Vec3::splat(2.0)); // (2,0)
        let normals = mesh.normals.unwrap();
        assert_eq!(normals[1], Vec3::Z);
        assert_eq!(normals[2], Vec3::Y);
        // Faces remapped into the unified ordering.
        assert_eq!(mesh.faces[0], [1, 3, 5, 1]);
        assert_eq!(mesh.faces[1], [2, 4, 6, 2]);
    }

    #[test]
    fn test_material_index_overflow_reuses_last() {
        let data = MeshData {
            coords: coords(3),
            faces: vec![[1, 2, 3, 1]; 5],
            face_material_index: vec![0, 1],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);
        assert_eq!(mesh.material_indices, vec![0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_uv_binding_per_corner() {
        let data = MeshData {
            coords: coords(3),
            faces: vec![[1, 2, 3, 1]],
            tex_coords: vec![
                Vec2::ZERO, // placeholder
                Vec2::new(0.1, 0.1),
                Vec2::new(0.2, 0.2),
                Vec2::new(0.3, 0.3),
            ],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);
        let uvs = mesh.uvs.unwrap();
        assert_eq!(
            uvs[0],
            [
                Vec2::new(0.1, 0.1),
                Vec2::new(0.2, 0.2),
                Vec2::new(0.3, 0.3),
                Vec2::new(0.1, 0.1),
            ]
        );
    }

    #[test]
    fn test_uv_binding_survives_normal_merge() {
        // UVs bind through the original position indices even when faces
        // are rewritten into the unified index space.
        let data = MeshData {
            coords: coords(3),
            faces: vec![[3, 2, 1, 3]],
            normals: vec![Vec3::Z],
            face_normals: vec![[0, 0, 0, 0]],
            tex_coords: vec![
                Vec2::ZERO,
                Vec2::new(0.1, 0.1),
                Vec2::new(0.2, 0.2),
                Vec2::new(0.3, 0.3),
            ],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);
        // Remapped face reorders indices, UV corners keep traversal order.
        assert_eq!(mesh.faces, vec![[3, 2, 1, 3]]);
        let uvs = mesh.uvs.unwrap();
        assert_eq!(uvs[0][0], Vec2::new(0.3, 0.3));
        assert_eq!(uvs[0][1], Vec2::new(0.2, 0.2));
        assert_eq!(uvs[0][2], Vec2::new(0.1, 0.1));
    }

    #[test]
    fn test_color_binding_defaults_opaque_white() {
        let data = MeshData {
            coords: coords(3),
            faces: vec![[1, 2, 3, 1]],
            vertex_colors: vec![
                Vec4::ONE, // placeholder
                Vec4::new(1.0, 0.0, 0.0, 1.0),
            ],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);
        let colors = mesh.colors.unwrap();
        assert_eq!(colors[0][0], Vec4::new(1.0, 0.0, 0.0, 1.0));
        // Corners whose position has no color entry fall back to white.
        assert_eq!(colors[0][1], Vec4::ONE);
        assert_eq!(colors[0][2], Vec4::ONE);
    }

    #[test]
    fn test_shorter_normal_face_list_drops_excess() {
        let data = MeshData {
            coords: coords(3),
            faces: vec![[1, 2, 3, 1], [3, 2, 1, 3]],
            normals: vec![Vec3::Z],
            face_normals: vec![[0, 0, 0, 0]],
            ..Default::default()
        };
        let mesh = assemble_mesh(data);
        assert_eq!(mesh.face_count(), 1);
    }
}
