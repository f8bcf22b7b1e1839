//! DirectX `.x` (ASCII) file format support.
//!
//! This module implements the text variant of the legacy "xof" geometry
//! interchange format: a hand-written tokenizer over a line-buffered
//! character stream, a recursive-descent parser with one token of
//! lookahead, and the mesh assembler that merges the format's independent
//! position/normal index spaces into a single vertex buffer.
//!
//! # Supported templates
//!
//! - `Mesh` with `MeshMaterialList`, `MeshNormals`, `MeshTextureCoords`,
//!   and `MeshVertexColors` sub-blocks
//! - `Frame` with `FrameTransformMatrix`, nested `Frame`, nested `Mesh`
//! - `Material` (top-level, named) and inline material blocks with
//!   `TextureFilename`
//! - `template` definitions (bodies discarded) and `Header`
//!
//! Anything else is skipped by balanced-brace scanning. All failures are
//! fatal for the current file only; a batch import continues with the next
//! file.

mod assemble;
mod error;
mod loader;
mod parser;
mod stream;
mod token;
mod types;

pub use assemble::assemble_mesh;
pub use error::{ParseError, ParseResult};
pub use loader::{import_batch, load_x, load_x_from_string, LoadError, LoadResult};
pub use parser::Parser;
pub use stream::CharacterStream;
pub use token::{Token, TokenKind, Tokenizer};
pub use types::{MeshData, TemplateKind};
