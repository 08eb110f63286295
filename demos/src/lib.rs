//! Demo scenes shared by the `torches` and `scene-dump` binaries.

pub mod scene_file;
pub mod torches;

pub use scene_file::{Light, SceneFile};
pub use torches::TorchScene;
