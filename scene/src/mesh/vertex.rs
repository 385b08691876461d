//! Vertex layouts and the equality predicate handed to mesh optimizers

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Minimum dot product for two unit normals/tangents to count as equal.
pub const DIRECTION_THRESHOLD: f32 = 0.9999;

/// Maximum distance between two weight vectors to count as equal.
pub const WEIGHT_THRESHOLD: f32 = 1.0 - DIRECTION_THRESHOLD;

/// Unskinned vertex, 44 bytes.
///
/// Layout (in order): position f32x3, normal f32x3, tangent f32x3, texcoord f32x2.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub texcoord: Vec2,
}

/// Skinned vertex, 76 bytes.
///
/// Same leading layout as [`Vertex`], followed by joint indices u32x4 and
/// joint weights f32x4. Arrays rather than `UVec4`/`Vec4` keep the struct free
/// of SIMD alignment padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub texcoord: Vec2,
    pub joint_indices: [u32; 4],
    pub joint_weights: [f32; 4],
}

/// Depth-only vertex, 20 bytes: position f32x3, texcoord f32x2.
///
/// Texcoord stays so alpha-tested materials can still discard.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ShadowVertex {
    pub position: Vec3,
    pub texcoord: Vec2,
}

/// Depth-only skinned vertex, 52 bytes: [`ShadowVertex`] followed by joint
/// indices u32x4 and joint weights f32x4.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RiggedShadowVertex {
    pub position: Vec3,
    pub texcoord: Vec2,
    pub joint_indices: [u32; 4],
    pub joint_weights: [f32; 4],
}

impl From<Vertex> for ShadowVertex {
    fn from(v: Vertex) -> Self {
        Self {
            position: v.position,
            texcoord: v.texcoord,
        }
    }
}

impl From<SkinnedVertex> for RiggedShadowVertex {
    fn from(v: SkinnedVertex) -> Self {
        Self {
            position: v.position,
            texcoord: v.texcoord,
            joint_indices: v.joint_indices,
            joint_weights: v.joint_weights,
        }
    }
}

/// Contract shared by the vertex types.
pub trait MeshVertex: Pod + Send + Sync {
    fn position(&self) -> Vec3;

    fn texcoord(&self) -> Vec2;

    /// Approximate equality: exact position/texcoord, normal/tangent by dot
    /// product, skinning data exact indices and near weights.
    fn approx_eq(&self, other: &Self) -> bool;
}

fn surface_eq(
    (p0, n0, t0, uv0): (Vec3, Vec3, Vec3, Vec2),
    (p1, n1, t1, uv1): (Vec3, Vec3, Vec3, Vec2),
) -> bool {
    p0 == p1
        && uv0 == uv1
        && n0.dot(n1) >= DIRECTION_THRESHOLD
        && t0.dot(t1) >= DIRECTION_THRESHOLD
}

impl MeshVertex for Vertex {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn texcoord(&self) -> Vec2 {
        self.texcoord
    }

    fn approx_eq(&self, other: &Self) -> bool {
        surface_eq(
            (self.position, self.normal, self.tangent, self.texcoord),
            (other.position, other.normal, other.tangent, other.texcoord),
        )
    }
}

impl MeshVertex for SkinnedVertex {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn texcoord(&self) -> Vec2 {
        self.texcoord
    }

    fn approx_eq(&self, other: &Self) -> bool {
        surface_eq(
            (self.position, self.normal, self.tangent, self.texcoord),
            (other.position, other.normal, other.tangent, other.texcoord),
        ) && self.joint_indices == other.joint_indices
            && Vec4::from_array(self.joint_weights).distance(Vec4::from_array(other.joint_weights))
                <= WEIGHT_THRESHOLD
    }
}

impl MeshVertex for ShadowVertex {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn texcoord(&self) -> Vec2 {
        self.texcoord
    }

    fn approx_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl MeshVertex for RiggedShadowVertex {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn texcoord(&self) -> Vec2 {
        self.texcoord
    }

    fn approx_eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.texcoord == other.texcoord
            && self.joint_indices == other.joint_indices
            && Vec4::from_array(self.joint_weights).distance(Vec4::from_array(other.joint_weights))
                <= WEIGHT_THRESHOLD
    }
}
