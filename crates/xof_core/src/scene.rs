//! Scene graph output of one `.x` file import.
//!
//! Parsing produces pure data: a list of top-level nodes (frame trees and
//! bare meshes) plus the pool of named materials. Host adapters walk this
//! structure to build native objects; nothing here touches a host API.

use std::collections::HashMap;
use std::path::PathBuf;

use xof_math::{Aabb, Mat4, Vec3, Vec4};

use crate::mesh::Mesh;

/// A material record as carried by `Material` blocks.
#[derive(Clone, Debug)]
pub struct Material {
    /// Diffuse color with alpha (the "face color" row of the block).
    pub diffuse: Vec4,

    /// Specular exponent.
    pub specular_power: f32,

    /// Specular RGB.
    pub specular: Vec3,

    /// Emissive RGB.
    pub emissive: Vec3,

    /// Texture file path, resolved against the source file's directory.
    /// The file is not opened during parsing; see `texture::TextureCache`.
    pub texture: Option<PathBuf>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec4::ONE,
            specular_power: 0.0,
            specular: Vec3::ONE,
            emissive: Vec3::ONE,
            texture: None,
        }
    }
}

impl Material {
    /// Whether the diffuse alpha makes this material translucent.
    pub fn is_transparent(&self) -> bool {
        self.diffuse.w < 1.0
    }
}

/// A node in the frame hierarchy: a local transform, an optional mesh, and
/// owned children.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Instance name from the file, if one was given.
    pub name: Option<String>,

    /// Local transform, already converted to the target convention.
    pub transform: Mat4,

    /// Mesh parsed inside this frame, if any.
    pub mesh: Option<Mesh>,

    /// Child frames in file order.
    pub children: Vec<Frame>,
}

impl Frame {
    /// Create an empty frame with an identity transform.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            transform: Mat4::IDENTITY,
            mesh: None,
            children: Vec::new(),
        }
    }

    /// Number of frames in this subtree, including this one.
    pub fn frame_count(&self) -> usize {
        1 + self.children.iter().map(Frame::frame_count).sum::<usize>()
    }

    /// Number of meshes in this subtree.
    pub fn mesh_count(&self) -> usize {
        usize::from(self.mesh.is_some())
            + self.children.iter().map(Frame::mesh_count).sum::<usize>()
    }
}

/// A top-level instance of the scene graph.
#[derive(Clone, Debug)]
pub enum SceneNode {
    /// A frame tree.
    Frame(Frame),

    /// A mesh that appeared outside any frame.
    Mesh(Mesh),
}

/// The complete result of importing one file.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually the source file stem).
    pub name: String,

    /// Top-level instances in file order.
    pub nodes: Vec<SceneNode>,

    /// Named materials declared at top level, referenced by
    /// `MeshMaterialList` blocks during the parse.
    pub materials: HashMap<String, Material>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Total number of frames across all trees.
    pub fn frame_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                SceneNode::Frame(frame) => frame.frame_count(),
                SceneNode::Mesh(_) => 0,
            })
            .sum()
    }

    /// Total number of meshes, bare and framed.
    pub fn mesh_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                SceneNode::Frame(frame) => frame.mesh_count(),
                SceneNode::Mesh(_) => 1,
            })
            .sum()
    }

    /// Total face count across all meshes.
    pub fn total_face_count(&self) -> usize {
        fn frame_faces(frame: &Frame) -> usize {
            frame.mesh.as_ref().map_or(0, Mesh::face_count)
                + frame.children.iter().map(frame_faces).sum::<usize>()
        }
        self.nodes
            .iter()
            .map(|node| match node {
                SceneNode::Frame(frame) => frame_faces(frame),
                SceneNode::Mesh(mesh) => mesh.face_count(),
            })
            .sum()
    }

    /// World-space bounding box of every mesh, honoring frame transforms.
    pub fn world_bounds(&self) -> Aabb {
        fn mesh_bounds(mesh: &Mesh, transform: Mat4) -> Aabb {
            let local = mesh.bounds();
            if local.is_empty() {
                return Aabb::empty();
            }
            let corners = [
                Vec3::new(local.x.min, local.y.min, local.z.min),
                Vec3::new(local.x.max, local.y.min, local.z.min),
                Vec3::new(local.x.min, local.y.max, local.z.min),
                Vec3::new(local.x.max, local.y.max, local.z.min),
                Vec3::new(local.x.min, local.y.min, local.z.max),
                Vec3::new(local.x.max, local.y.min, local.z.max),
                Vec3::new(local.x.min, local.y.max, local.z.max),
                Vec3::new(local.x.max, local.y.max, local.z.max),
            ];
            Aabb::from_points_iter(corners.iter().map(|&c| transform.transform_point3(c)))
        }

        fn frame_bounds(frame: &Frame, parent: Mat4) -> Aabb {
            let world = parent * frame.transform;
            let mut bounds = frame
                .mesh
                .as_ref()
                .map_or_else(Aabb::empty, |mesh| mesh_bounds(mesh, world));
            for child in &frame.children {
                bounds = Aabb::surrounding(&bounds, &frame_bounds(child, world));
            }
            bounds
        }

        let mut bounds = Aabb::empty();
        for node in &self.nodes {
            let node_bounds = match node {
                SceneNode::Frame(frame) => frame_bounds(frame, Mat4::IDENTITY),
                SceneNode::Mesh(mesh) => mesh_bounds(mesh, Mat4::IDENTITY),
            };
            bounds = Aabb::surrounding(&bounds, &node_bounds);
        }
        bounds
    }
}
