//! Index-based scene document
//!
//! Plain data mirroring the arrays of a glTF file. Every cross reference is an
//! index into one of the `Document` arrays; nothing is validated until a
//! consumer dereferences it. Built by [`crate::import`] or by hand in tests.

use glam::{Mat4, Quat, Vec3};

use crate::error::{Result, SceneError};

/// Raw bytes of one buffer.
#[derive(Debug, Clone, Default)]
pub struct RawBuffer {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    /// `None` means tightly packed.
    pub byte_stride: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl Shape {
    pub fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub count: usize,
    pub component_type: ComponentType,
    pub shape: Shape,
    pub normalized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Vertex attribute semantics this crate reads. Anything else is carried as
/// `Other` and ignored by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Tangent,
    TexCoord(u32),
    Color(u32),
    Joints(u32),
    Weights(u32),
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveDesc {
    pub topology: Topology,
    pub indices: Option<usize>,
    pub attributes: Vec<(Semantic, usize)>,
    pub material: Option<usize>,
}

impl PrimitiveDesc {
    pub fn attribute(&self, semantic: &Semantic) -> Option<usize> {
        self.attributes
            .iter()
            .find(|(s, _)| s == semantic)
            .map(|(_, accessor)| *accessor)
    }

    pub fn is_skinned(&self) -> bool {
        self.attribute(&Semantic::Joints(0)).is_some()
            || self.attribute(&Semantic::Weights(0)).is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDesc {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveDesc>,
}

/// How a node stores its local transform. A node never has both forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformRepr {
    Trs {
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
    Matrix(Mat4),
}

impl Default for TransformRepr {
    fn default() -> Self {
        Self::Trs {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDesc {
    pub name: Option<String>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub transform: TransformRepr,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinDesc {
    pub name: Option<String>,
    pub inverse_bind_matrices: Option<usize>,
    pub joints: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
    MorphWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc {
    pub input: usize,
    pub output: usize,
    pub interpolation: Interpolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDesc {
    pub sampler: usize,
    pub target_node: usize,
    pub path: TargetPath,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationDesc {
    pub name: Option<String>,
    pub samplers: Vec<SamplerDesc>,
    pub channels: Vec<ChannelDesc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDesc {
    pub name: Option<String>,
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub buffers: Vec<RawBuffer>,
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub meshes: Vec<MeshDesc>,
    pub nodes: Vec<NodeDesc>,
    pub skins: Vec<SkinDesc>,
    pub animations: Vec<AnimationDesc>,
    pub scenes: Vec<SceneDesc>,
    pub default_scene: Option<usize>,
    pub material_count: usize,
}

impl Document {
    /// Picks the scene to render: an explicit choice, the only scene, or the
    /// declared default, in that order. Returns its validated root nodes.
    pub fn root_nodes(&self, requested: Option<usize>) -> Result<&[usize]> {
        let index = match requested {
            Some(index) => index,
            None if self.scenes.len() == 1 => 0,
            None if self.scenes.is_empty() => return Err(SceneError::NoScene),
            None => self
                .default_scene
                .ok_or(SceneError::NoDefaultScene(self.scenes.len()))?,
        };

        let scene = self
            .scenes
            .get(index)
            .ok_or_else(|| SceneError::out_of_bounds("scene", index, self.scenes.len()))?;

        if let Some(&bad) = scene.nodes.iter().find(|&&n| n >= self.nodes.len()) {
            return Err(SceneError::out_of_bounds("node", bad, self.nodes.len()));
        }

        Ok(&scene.nodes)
    }

    pub(crate) fn accessor(&self, index: usize) -> Result<&Accessor> {
        self.accessors
            .get(index)
            .ok_or_else(|| SceneError::out_of_bounds("accessor", index, self.accessors.len()))
    }
}
