//! nether-scene library
//!
//! Imports glTF 2.0 / GLB scenes into a CPU-side render data model: assembled
//! per-primitive vertex/index buffers, a validated node tree, skinning joint
//! matrices and keyframe animation. The `scene-inspect` binary is a thin
//! front end over this crate.

pub mod accessor;
pub mod animation;
pub mod config;
pub mod document;
pub mod drawdata;
pub mod error;
mod import;
pub mod mesh;
pub mod model;
pub mod node;
pub mod progress;
pub mod skin;
pub mod topology;

// Re-export the types most callers need
pub use animation::{Animation, AnimationKey, AnimationSelector};
pub use config::LoadConfig;
pub use document::Document;
pub use drawdata::{Drawdata, MaterialRef, PrimitiveRef};
pub use error::{Result, ResultExt, SceneError};
pub use mesh::{
    Mesh, MeshPrimitive, PrimitiveBuffers, RiggedShadowVertex, ShadowVertex, SkinnedVertex, Vertex,
};
pub use model::{Frame, Model};
pub use node::TransformOverride;
pub use progress::{LoadProgress, LoadStage, ProgressCell};
