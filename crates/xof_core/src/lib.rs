//! XOF Core - scene graph and DirectX `.x` text import.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scene`, `Frame`, `Mesh`, `Material`
//! - **X file support**: lexing, recursive-descent parsing, and mesh
//!   assembly for the legacy ASCII `.x` geometry format
//!
//! # Example
//!
//! ```ignore
//! use xof_core::xfile::load_x;
//! use xof_math::ImportConfig;
//!
//! // Load an X file with the default left-handed / Y-up source convention
//! let scene = load_x("model.x", ImportConfig::default())?;
//! println!("Loaded {} meshes, {} frames",
//!     scene.mesh_count(),
//!     scene.frame_count());
//! ```

pub mod mesh;
pub mod scene;
pub mod texture;
pub mod xfile;

// Re-export commonly used types
pub use mesh::Mesh;
pub use scene::{Frame, Material, Scene, SceneNode};
pub use xfile::{import_batch, load_x, load_x_from_string};
