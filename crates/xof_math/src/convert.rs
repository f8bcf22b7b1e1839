//! Coordinate-system conversion between source and target conventions.
//!
//! Legacy DirectX geometry is left-handed with Y up; the target convention
//! here is right-handed with Z up. Conversion is applied per position as it
//! is parsed and to each frame transform matrix as a whole.

use glam::{Mat4, Vec3, Vec4};

/// Source coordinate-system handedness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    LeftHanded,
    RightHanded,
}

/// Source up-axis convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpAxis {
    YUp,
    ZUp,
}

/// Import options, immutable for the duration of one parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    pub handedness: Handedness,
    pub up_axis: UpAxis,
}

impl Default for ImportConfig {
    /// DirectX files are conventionally left-handed with Y up.
    fn default() -> Self {
        Self {
            handedness: Handedness::LeftHanded,
            up_axis: UpAxis::YUp,
        }
    }
}

/// Mirror across the XY plane: `diag(1, 1, -1, 1)`.
const FLIP_Z: Mat4 = Mat4::from_diagonal(Vec4::new(1.0, 1.0, -1.0, 1.0));

/// Left conjugation factor for Y-up sources, rows
/// `(1,0,0,0) (0,0,-1,0) (0,1,0,0) (0,0,0,1)`.
const Z_TO_Y: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, -1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
]);

/// Right conjugation factor for Y-up sources, rows
/// `(1,0,0,0) (0,0,1,0) (0,-1,0,0) (0,0,0,1)`.
const Y_TO_Z: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, -1.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
]);

impl ImportConfig {
    /// Convert one parsed position (or normal vector) into the target
    /// convention: Z negation for left-handed sources, then the up-axis
    /// remap `(x, y, z) -> (x, -z, y)` for Y-up sources.
    pub fn convert_position(&self, v: Vec3) -> Vec3 {
        let v = match self.handedness {
            Handedness::LeftHanded => Vec3::new(v.x, v.y, -v.z),
            Handedness::RightHanded => v,
        };
        match self.up_axis {
            UpAxis::YUp => Vec3::new(v.x, -v.z, v.y),
            UpAxis::ZUp => v,
        }
    }

    /// Whether parsed face index lists must be reversed to keep outward
    /// normals consistent after the handedness flip.
    pub fn reverses_winding(&self) -> bool {
        self.handedness == Handedness::LeftHanded
    }

    /// Convert a frame transform matrix into the target convention.
    ///
    /// Left-handed sources are conjugated by `S * M * S` with
    /// `S = diag(1, 1, -1, 1)`; Y-up sources are then wrapped as
    /// `Z_TO_Y * M * Y_TO_Z`. The two up-axis factors are kept exactly as
    /// the reference importer had them; see the literal tests below.
    pub fn convert_matrix(&self, m: Mat4) -> Mat4 {
        let m = match self.handedness {
            Handedness::LeftHanded => FLIP_Z * m * FLIP_Z,
            Handedness::RightHanded => m,
        };
        match self.up_axis {
            UpAxis::YUp => Z_TO_Y * m * Y_TO_Z,
            UpAxis::ZUp => m,
        }
    }
}
