//! glTF/GLB -> [`Document`]
//!
//! The `gltf` crate does the parsing and buffer resolution (GLB blob, data
//! URIs, external files). This module only copies its index-based arrays into
//! the crate's own plain-data model.

use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use gltf::Gltf;

use crate::document::{
    Accessor, AnimationDesc, BufferView, ChannelDesc, ComponentType, Document, Interpolation,
    MeshDesc, NodeDesc, PrimitiveDesc, RawBuffer, SamplerDesc, SceneDesc, Semantic, Shape,
    SkinDesc, TargetPath, Topology, TransformRepr,
};
use crate::error::{Result, ResultExt};

impl Document {
    /// Parse `.gltf` JSON or `.glb` bytes. External buffer URIs cannot be
    /// resolved without a base path; use [`Document::from_path`] for those.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        from_slice_with_base(bytes, None)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(crate::error::SceneError::from)
            .with_context(|| format!("reading {:?}", path))?;
        from_slice_with_base(&bytes, path.parent())
            .with_context(|| format!("importing {:?}", path))
    }
}

fn from_slice_with_base(bytes: &[u8], base: Option<&Path>) -> Result<Document> {
    let Gltf { document, blob } = Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, base, blob)?;

    let doc = Document {
        buffers: buffers
            .into_iter()
            .map(|data| RawBuffer { data: data.0 })
            .collect(),
        buffer_views: document.views().map(convert_view).collect(),
        accessors: document.accessors().map(convert_accessor).collect(),
        meshes: document.meshes().map(convert_mesh).collect(),
        nodes: document.nodes().map(convert_node).collect(),
        skins: document.skins().map(convert_skin).collect(),
        animations: document.animations().map(convert_animation).collect(),
        scenes: document
            .scenes()
            .map(|scene| SceneDesc {
                name: scene.name().map(str::to_owned),
                nodes: scene.nodes().map(|n| n.index()).collect(),
            })
            .collect(),
        default_scene: document.default_scene().map(|s| s.index()),
        material_count: document.materials().count(),
    };

    tracing::debug!(
        "Imported document: {} buffers, {} accessors, {} meshes, {} nodes, {} skins, {} animations",
        doc.buffers.len(),
        doc.accessors.len(),
        doc.meshes.len(),
        doc.nodes.len(),
        doc.skins.len(),
        doc.animations.len()
    );

    Ok(doc)
}

fn convert_view(view: gltf::buffer::View) -> BufferView {
    BufferView {
        buffer: view.buffer().index(),
        byte_offset: view.offset(),
        byte_length: view.length(),
        byte_stride: view.stride(),
    }
}

fn convert_accessor(accessor: gltf::Accessor) -> Accessor {
    use gltf::accessor::{DataType, Dimensions};

    let component_type = match accessor.data_type() {
        DataType::I8 => ComponentType::I8,
        DataType::U8 => ComponentType::U8,
        DataType::I16 => ComponentType::I16,
        DataType::U16 => ComponentType::U16,
        DataType::U32 => ComponentType::U32,
        DataType::F32 => ComponentType::F32,
    };
    let shape = match accessor.dimensions() {
        Dimensions::Scalar => Shape::Scalar,
        Dimensions::Vec2 => Shape::Vec2,
        Dimensions::Vec3 => Shape::Vec3,
        Dimensions::Vec4 => Shape::Vec4,
        Dimensions::Mat2 => Shape::Mat2,
        Dimensions::Mat3 => Shape::Mat3,
        Dimensions::Mat4 => Shape::Mat4,
    };

    Accessor {
        buffer_view: accessor.view().map(|v| v.index()),
        byte_offset: accessor.offset(),
        count: accessor.count(),
        component_type,
        shape,
        normalized: accessor.normalized(),
    }
}

fn convert_mesh(mesh: gltf::Mesh) -> MeshDesc {
    MeshDesc {
        name: mesh.name().map(str::to_owned),
        primitives: mesh.primitives().map(convert_primitive).collect(),
    }
}

fn convert_primitive(primitive: gltf::Primitive) -> PrimitiveDesc {
    use gltf::mesh::Mode;

    let topology = match primitive.mode() {
        Mode::Points => Topology::Points,
        Mode::Lines => Topology::Lines,
        Mode::LineLoop => Topology::LineLoop,
        Mode::LineStrip => Topology::LineStrip,
        Mode::Triangles => Topology::Triangles,
        Mode::TriangleStrip => Topology::TriangleStrip,
        Mode::TriangleFan => Topology::TriangleFan,
    };

    let attributes = primitive
        .attributes()
        .map(|(semantic, accessor)| {
            let semantic = match semantic {
                gltf::Semantic::Positions => Semantic::Position,
                gltf::Semantic::Normals => Semantic::Normal,
                gltf::Semantic::Tangents => Semantic::Tangent,
                gltf::Semantic::TexCoords(set) => Semantic::TexCoord(set),
                gltf::Semantic::Colors(set) => Semantic::Color(set),
                gltf::Semantic::Joints(set) => Semantic::Joints(set),
                gltf::Semantic::Weights(set) => Semantic::Weights(set),
                #[allow(unreachable_patterns)]
                other => Semantic::Other(format!("{:?}", other)),
            };
            (semantic, accessor.index())
        })
        .collect();

    PrimitiveDesc {
        topology,
        indices: primitive.indices().map(|a| a.index()),
        attributes,
        material: primitive.material().index(),
    }
}

fn convert_node(node: gltf::Node) -> NodeDesc {
    let transform = match node.transform() {
        gltf::scene::Transform::Matrix { matrix } => {
            TransformRepr::Matrix(Mat4::from_cols_array_2d(&matrix))
        }
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => TransformRepr::Trs {
            translation: Vec3::from_array(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from_array(scale),
        },
    };

    NodeDesc {
        name: node.name().map(str::to_owned),
        children: node.children().map(|c| c.index()).collect(),
        mesh: node.mesh().map(|m| m.index()),
        skin: node.skin().map(|s| s.index()),
        transform,
    }
}

fn convert_skin(skin: gltf::Skin) -> SkinDesc {
    SkinDesc {
        name: skin.name().map(str::to_owned),
        inverse_bind_matrices: skin.inverse_bind_matrices().map(|a| a.index()),
        joints: skin.joints().map(|j| j.index()).collect(),
    }
}

fn convert_animation(animation: gltf::Animation) -> AnimationDesc {
    use gltf::animation::{Interpolation as GltfInterpolation, Property};

    let samplers = animation
        .samplers()
        .map(|sampler| SamplerDesc {
            input: sampler.input().index(),
            output: sampler.output().index(),
            interpolation: match sampler.interpolation() {
                GltfInterpolation::Linear => Interpolation::Linear,
                GltfInterpolation::Step => Interpolation::Step,
                GltfInterpolation::CubicSpline => Interpolation::CubicSpline,
            },
        })
        .collect();

    let channels = animation
        .channels()
        .map(|channel| {
            let target = channel.target();
            ChannelDesc {
                sampler: channel.sampler().index(),
                target_node: target.node().index(),
                path: match target.property() {
                    Property::Translation => TargetPath::Translation,
                    Property::Rotation => TargetPath::Rotation,
                    Property::Scale => TargetPath::Scale,
                    Property::MorphTargetWeights => TargetPath::MorphWeights,
                },
            }
        })
        .collect();

    AnimationDesc {
        name: animation.name().map(str::to_owned),
        samplers,
        channels,
    }
}
