//! Mesh assembly (glTF primitive -> optimized triangle list)

mod attributes;
mod optimize;
mod primitive;
mod topology;
mod vertex;


// Re-export public API
pub use attributes::{bounds, flat_normals, inflate_degenerate, tangents};
pub use optimize::{DedupOptimizer, MeshOptimizer, OptimizedMesh, PassthroughOptimizer};
pub use primitive::{Bounds, Mesh, MeshPrimitive, Primitive, PrimitiveBuffers, assemble};
pub use topology::{rearrange, unpack, validate_count};
pub use vertex::{
    DIRECTION_THRESHOLD, MeshVertex, RiggedShadowVertex, ShadowVertex, SkinnedVertex, Vertex,
    WEIGHT_THRESHOLD,
};
