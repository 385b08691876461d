//! Incremental glTF document builder.

use glam::{Mat4, Quat, Vec3};
use gltf::binary::{Glb, Header};
use gltf_json as json;
use json::validation::Checked::Valid;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Builds a single-buffer, single-scene glTF root. Every `push_*` call
/// appends one buffer view and one accessor and returns the accessor index.
#[derive(Default)]
pub struct SceneBuilder {
    buffer: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
    nodes: Vec<json::Node>,
    meshes: Vec<json::Mesh>,
    skins: Vec<json::Skin>,
    samplers: Vec<json::animation::Sampler>,
    channels: Vec<json::animation::Channel>,
    animation_name: Option<String>,
    roots: Vec<u32>,
}

fn bounds(values: &[f32], components: usize) -> (json::Value, json::Value) {
    let mut min = vec![f32::MAX; components];
    let mut max = vec![f32::MIN; components];
    for element in values.chunks(components) {
        for (i, &v) in element.iter().enumerate() {
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }
    let to_value = |v: Vec<f32>| {
        json::Value::Array(v.into_iter().map(|x| json::Value::from(x as f64)).collect())
    };
    (to_value(min), to_value(max))
}

impl SceneBuilder {
    fn push<T: bytemuck::Pod>(
        &mut self,
        data: &[T],
        count: usize,
        component_type: json::accessor::ComponentType,
        type_: json::accessor::Type,
        min_max: Option<(json::Value, json::Value)>,
    ) -> u32 {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytemuck::cast_slice(data));
        let length = self.buffer.len() - offset;
        while !self.buffer.len().is_multiple_of(4) {
            self.buffer.push(0);
        }

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: length.into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: None,
        });

        let (min, max) = match min_max {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };
        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(self.views.len() as u32 - 1)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });
        self.accessors.len() as u32 - 1
    }

    pub fn push_positions(&mut self, positions: &[[f32; 3]]) -> u32 {
        let flat: &[f32] = bytemuck::cast_slice(positions);
        let min_max = bounds(flat, 3);
        self.push(
            positions,
            positions.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            Some(min_max),
        )
    }

    pub fn push_vec2(&mut self, values: &[[f32; 2]]) -> u32 {
        self.push(
            values,
            values.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec2,
            None,
        )
    }

    pub fn push_vec4(&mut self, values: &[[f32; 4]]) -> u32 {
        self.push(
            values,
            values.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec4,
            None,
        )
    }

    pub fn push_joints_u8(&mut self, values: &[[u8; 4]]) -> u32 {
        self.push(
            values,
            values.len(),
            json::accessor::ComponentType::U8,
            json::accessor::Type::Vec4,
            None,
        )
    }

    pub fn push_indices_u16(&mut self, values: &[u16]) -> u32 {
        self.push(
            values,
            values.len(),
            json::accessor::ComponentType::U16,
            json::accessor::Type::Scalar,
            None,
        )
    }

    pub fn push_times(&mut self, times: &[f32]) -> u32 {
        let min_max = bounds(times, 1);
        self.push(
            times,
            times.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Scalar,
            Some(min_max),
        )
    }

    pub fn push_mat4(&mut self, matrices: &[Mat4]) -> u32 {
        self.push(
            matrices,
            matrices.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Mat4,
            None,
        )
    }

    /// Adds a mesh with one triangle-list primitive and returns its index.
    pub fn add_mesh(
        &mut self,
        name: &str,
        attributes: &[(json::mesh::Semantic, u32)],
        indices: Option<u32>,
    ) -> u32 {
        let attributes: BTreeMap<_, _> = attributes
            .iter()
            .map(|(semantic, accessor)| (Valid(semantic.clone()), json::Index::new(*accessor)))
            .collect();

        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            primitives: vec![json::mesh::Primitive {
                attributes,
                extensions: Default::default(),
                extras: Default::default(),
                indices: indices.map(json::Index::new),
                material: None,
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
            }],
            weights: None,
        });
        self.meshes.len() as u32 - 1
    }

    pub fn add_node(&mut self, name: &str, children: &[u32], mesh: Option<u32>) -> u32 {
        self.nodes.push(json::Node {
            camera: None,
            children: (!children.is_empty())
                .then(|| children.iter().map(|&c| json::Index::new(c)).collect()),
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: mesh.map(json::Index::new),
            name: Some(name.to_string()),
            rotation: None,
            scale: None,
            translation: None,
            skin: None,
            weights: None,
        });
        self.nodes.len() as u32 - 1
    }

    pub fn set_translation(&mut self, node: u32, translation: Vec3) {
        self.nodes[node as usize].translation = Some(translation.to_array());
    }

    pub fn set_rotation(&mut self, node: u32, rotation: Quat) {
        self.nodes[node as usize].rotation = Some(json::scene::UnitQuaternion(rotation.to_array()));
    }

    pub fn add_skin(&mut self, joints: &[u32], inverse_bind_matrices: Option<u32>) -> u32 {
        self.skins.push(json::Skin {
            extensions: Default::default(),
            extras: Default::default(),
            inverse_bind_matrices: inverse_bind_matrices.map(json::Index::new),
            joints: joints.iter().map(|&j| json::Index::new(j)).collect(),
            name: None,
            skeleton: None,
        });
        self.skins.len() as u32 - 1
    }

    pub fn set_skin(&mut self, node: u32, skin: u32) {
        self.nodes[node as usize].skin = Some(json::Index::new(skin));
    }

    /// Adds a channel to the document's single animation.
    pub fn add_channel(
        &mut self,
        node: u32,
        path: json::animation::Property,
        input: u32,
        output: u32,
        interpolation: json::animation::Interpolation,
    ) {
        self.animation_name.get_or_insert_with(|| "Anim".to_string());
        let sampler = self.samplers.len() as u32;
        self.samplers.push(json::animation::Sampler {
            input: json::Index::new(input),
            interpolation: Valid(interpolation),
            output: json::Index::new(output),
            extensions: Default::default(),
            extras: Default::default(),
        });
        self.channels.push(json::animation::Channel {
            sampler: json::Index::new(sampler),
            target: json::animation::Target {
                node: json::Index::new(node),
                path: Valid(path),
                extensions: Default::default(),
                extras: Default::default(),
            },
            extensions: Default::default(),
            extras: Default::default(),
        });
    }

    pub fn name_animation(&mut self, name: &str) {
        self.animation_name = Some(name.to_string());
    }

    pub fn set_roots(&mut self, roots: &[u32]) {
        self.roots = roots.to_vec();
    }

    pub fn build_glb(self) -> Vec<u8> {
        let animations = match self.animation_name {
            Some(name) => vec![json::Animation {
                channels: self.channels,
                extensions: Default::default(),
                extras: Default::default(),
                name: Some(name),
                samplers: self.samplers,
            }],
            None => Vec::new(),
        };

        let root = json::Root {
            accessors: self.accessors,
            animations,
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some("nether-scene-test".to_string()),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers: vec![json::Buffer {
                byte_length: self.buffer.len().into(),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri: None,
            }],
            buffer_views: self.views,
            cameras: Vec::new(),
            extensions: Default::default(),
            extras: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            images: Vec::new(),
            materials: Vec::new(),
            meshes: self.meshes,
            nodes: self.nodes,
            samplers: Vec::new(),
            scene: Some(json::Index::new(0)),
            scenes: vec![json::Scene {
                extensions: Default::default(),
                extras: Default::default(),
                name: Some("TestScene".to_string()),
                nodes: self.roots.into_iter().map(json::Index::new).collect(),
            }],
            skins: self.skins,
            textures: Vec::new(),
        };

        let json = json::serialize::to_vec(&root).expect("Failed to serialize glTF JSON");

        // the writer recomputes the header and pads both chunks to four bytes
        let glb = Glb {
            header: Header {
                magic: *b"glTF",
                version: 2,
                length: 0,
            },
            json: Cow::Owned(json),
            bin: Some(Cow::Owned(self.buffer)),
        };
        glb.to_vec().expect("Failed to write GLB")
    }
}
