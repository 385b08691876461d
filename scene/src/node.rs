//! Scene nodes and local transforms

use glam::{Mat4, Quat, Vec3};

use crate::document::{NodeDesc, TransformRepr};

/// Decomposed translation/rotation/scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// `T * R * S`
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Replace every field the override sets.
    pub fn override_with(&self, over: &TransformOverride) -> Self {
        Self {
            translation: over.translation.unwrap_or(self.translation),
            rotation: over.rotation.unwrap_or(self.rotation),
            scale: over.scale.unwrap_or(self.scale),
        }
    }
}

/// Per-node animation output for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformOverride {
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

impl TransformOverride {
    pub fn has_override(&self) -> bool {
        self.translation.is_some() || self.rotation.is_some() || self.scale.is_some()
    }
}

/// A node's stored local transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalTransform {
    Trs(Transform),
    Matrix(Mat4),
}

impl From<TransformRepr> for LocalTransform {
    fn from(repr: TransformRepr) -> Self {
        match repr {
            TransformRepr::Trs {
                translation,
                rotation,
                scale,
            } => Self::Trs(Transform {
                translation,
                rotation,
                scale,
            }),
            TransformRepr::Matrix(m) => Self::Matrix(m),
        }
    }
}

impl LocalTransform {
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            Self::Trs(t) => t.to_matrix(),
            Self::Matrix(m) => *m,
        }
    }

    /// Apply an override. Matrix transforms are kept as-is when the override is
    /// empty; otherwise they are replaced by the override on top of identity.
    pub fn override_with(&self, over: &TransformOverride) -> Self {
        match self {
            Self::Trs(t) => Self::Trs(t.override_with(over)),
            Self::Matrix(_) if !over.has_override() => *self,
            Self::Matrix(_) => Self::Trs(Transform::IDENTITY.override_with(over)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub transform: LocalTransform,
}

impl From<&NodeDesc> for Node {
    fn from(desc: &NodeDesc) -> Self {
        Self {
            name: desc.name.clone(),
            children: desc.children.clone(),
            mesh: desc.mesh,
            skin: desc.skin,
            transform: desc.transform.into(),
        }
    }
}

impl Node {
    /// Local matrix with this frame's override applied. Not cached.
    pub fn local_transform(&self, over: &TransformOverride) -> Mat4 {
        self.transform.override_with(over).to_matrix()
    }
}
