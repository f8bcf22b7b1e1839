//! Intermediate data produced while parsing one `Mesh` block, plus the
//! grammar keyword dispatch enum.

use xof_math::{Vec2, Vec3, Vec4};

use crate::mesh::FaceIndices;
use crate::scene::Material;

/// Raw mesh data as read from the file, before index-space merging.
///
/// `coords`, `tex_coords`, and `vertex_colors` reserve slot 0 as an unused
/// placeholder so face indices stay 1-based; `normals` and `face_normals`
/// form an independent 0-based index space.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub coords: Vec<Vec3>,
    pub faces: Vec<FaceIndices>,
    pub normals: Vec<Vec3>,
    pub face_normals: Vec<FaceIndices>,
    pub tex_coords: Vec<Vec2>,
    pub vertex_colors: Vec<Vec4>,
    pub face_material_index: Vec<usize>,
    pub materials: Vec<Material>,
}

impl MeshData {
    /// Whether a `MeshNormals` block supplied an independent normal
    /// index space that must be merged with the position space.
    pub fn has_normal_stream(&self) -> bool {
        !self.normals.is_empty() && !self.face_normals.is_empty()
    }
}

/// Recognized template keywords of the grammar.
///
/// Dispatch happens on this enum rather than on raw identifier strings so
/// every handler site is an exhaustive match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Template,
    Header,
    Mesh,
    Frame,
    Material,
    FrameTransformMatrix,
    MeshMaterialList,
    MeshNormals,
    MeshTextureCoords,
    MeshVertexColors,
    TextureFilename,
    Unknown,
}

impl TemplateKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "template" => TemplateKind::Template,
            "Header" => TemplateKind::Header,
            "Mesh" => TemplateKind::Mesh,
            "Frame" => TemplateKind::Frame,
            "Material" => TemplateKind::Material,
            "FrameTransformMatrix" => TemplateKind::FrameTransformMatrix,
            "MeshMaterialList" => TemplateKind::MeshMaterialList,
            "MeshNormals" => TemplateKind::MeshNormals,
            "MeshTextureCoords" => TemplateKind::MeshTextureCoords,
            "MeshVertexColors" => TemplateKind::MeshVertexColors,
            "TextureFilename" => TemplateKind::TextureFilename,
            _ => TemplateKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_dispatch() {
        assert_eq!(TemplateKind::from_name("Mesh"), TemplateKind::Mesh);
        assert_eq!(
            TemplateKind::from_name("MeshNormals"),
            TemplateKind::MeshNormals
        );
        assert_eq!(TemplateKind::from_name("template"), TemplateKind::Template);
        // Case matters; an unknown name is skippable, not an error.
        assert_eq!(TemplateKind::from_name("mesh"), TemplateKind::Unknown);
        assert_eq!(
            TemplateKind::from_name("AnimationSet"),
            TemplateKind::Unknown
        );
    }

    #[test]
    fn test_normal_stream_detection() {
        let mut data = MeshData::default();
        assert!(!data.has_normal_stream());
        data.normals.push(Vec3::X);
        assert!(!data.has_normal_stream());
        data.face_normals.push([0, 0, 0, 0]);
        assert!(data.has_normal_stream());
    }
}
