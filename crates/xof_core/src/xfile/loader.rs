//! High-level `.x` scene loading.
//!
//! Entry points for importing one file, an in-memory string, or a batch
//! of paths. Only the ASCII text variant of the format is handled; the
//! extension is checked before the file is ever opened.

use std::path::{Path, PathBuf};

use thiserror::Error;
use xof_math::ImportConfig;

use crate::scene::Scene;
use crate::xfile::error::ParseError;
use crate::xfile::parser::Parser;
use crate::xfile::stream::CharacterStream;

/// Errors that can occur during loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("not an X file: {0}")]
    NotAnXFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a `.x` file and return the imported scene.
///
/// The path must carry a `.x` extension (case-insensitive); anything else
/// is rejected without touching the filesystem. Texture paths inside the
/// file resolve against the file's directory.
///
/// # Example
///
/// ```ignore
/// use xof_core::xfile::load_x;
/// use xof_math::ImportConfig;
///
/// let scene = load_x("model.x", ImportConfig::default())?;
/// println!("Loaded {} meshes", scene.mesh_count());
/// ```
pub fn load_x<P: AsRef<Path>>(path: P, config: ImportConfig) -> LoadResult<Scene> {
    let path = path.as_ref();
    let is_x = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("x"));
    if !is_x {
        return Err(LoadError::NotAnXFile(path.to_path_buf()));
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    let base_dir = path.parent().map(Path::to_path_buf);

    let stream = CharacterStream::open(path)?;
    let scene = Parser::new(stream, config, base_dir)?.parse(name)?;
    log::debug!(
        "loaded {}: {} frames, {} meshes, {} faces",
        path.display(),
        scene.frame_count(),
        scene.mesh_count(),
        scene.total_face_count()
    );
    Ok(scene)
}

/// Load `.x` content from a string (useful for testing).
pub fn load_x_from_string(content: &str, name: &str, config: ImportConfig) -> LoadResult<Scene> {
    let stream = CharacterStream::from_string(content);
    Ok(Parser::new(stream, config, None)?.parse(name)?)
}

/// Import a batch of files with the same configuration.
///
/// A failing file is logged and skipped; the rest of the batch still
/// loads. Scenes come back in input order.
pub fn import_batch<P: AsRef<Path>>(paths: &[P], config: ImportConfig) -> Vec<Scene> {
    let mut scenes = Vec::with_capacity(paths.len());
    for path in paths {
        match load_x(path, config) {
            Ok(scene) => scenes.push(scene),
            Err(err) => {
                log::error!("skipping {}: {}", path.as_ref().display(), err);
            }
        }
    }
    scenes
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "xof 0303txt 0032
Mesh {
 3;
 0.0;0.0;0.0;,
 1.0;0.0;0.0;,
 0.0;1.0;0.0;;
 1;
 3;0,1,2;;
}
";

    #[test]
    fn test_load_from_string() {
        let scene = load_x_from_string(TRIANGLE, "tri", ImportConfig::default()).unwrap();
        assert_eq!(scene.name, "tri");
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.total_face_count(), 1);
    }

    #[test]
    fn test_wrong_extension_rejected_without_reading() {
        // The path does not exist; the extension check must fire first.
        let err = load_x("/nonexistent/model.obj", ImportConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::NotAnXFile(_)));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        // Passes the extension gate, then fails on IO.
        let err = load_x("/nonexistent/model.X", ImportConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let dir = std::env::temp_dir().join("xof_loader_batch_test");
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.x");
        let bad = dir.join("bad.x");
        std::fs::write(&good, TRIANGLE).unwrap();
        std::fs::write(&bad, "xof 0303txt 0032\nMesh {").unwrap();

        let scenes = import_batch(
            &[bad.as_path(), good.as_path(), Path::new("missing.x")],
            ImportConfig::default(),
        );
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].name, "good");
    }

    #[test]
    fn test_parse_error_carries_through() {
        let err = load_x_from_string("xof 0303txt 0032\nMesh { / }", "bad", ImportConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse(ParseError::StraySlash { .. })
        ));
    }
}
