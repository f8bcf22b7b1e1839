// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod convert;
mod interval;

pub use aabb::Aabb;
pub use convert::{Handedness, ImportConfig, UpAxis};
pub use interval::Interval;
