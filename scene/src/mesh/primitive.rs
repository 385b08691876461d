//! Primitive assembly
//!
//! Turns a [`PrimitiveDesc`] into a flat, optimized triangle list:
//!
//! 1. reject non-triangle topologies
//! 2. decode optional indices
//! 3. unpack positions through the indices
//! 4. expand fans and strips into a triangle list
//! 5. decode or synthesize normals
//! 6. decode texcoords
//! 7. compute tangents, orthogonalized against normals
//! 8. check stream lengths
//! 9. zip into vertices (skinned when JOINTS_0/WEIGHTS_0 exist) and optimize
//! 10. project to shadow vertices and optimize again
//! 11. compute bounds

use glam::{Vec2, Vec3, Vec4};

use super::attributes::{bounds, flat_normals, tangents};
use super::optimize::MeshOptimizer;
use super::topology::{rearrange, unpack, validate_count};
use super::vertex::{MeshVertex, RiggedShadowVertex, ShadowVertex, SkinnedVertex, Vertex};
use crate::accessor::{Element, extract, extract_indices};
use crate::document::{ComponentType, Document, PrimitiveDesc, Semantic, Topology};
use crate::error::{Result, ResultExt, SceneError};

/// Axis-aligned bounding box in mesh space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

/// One optimized primitive: the full vertex stream plus a separately welded
/// depth-only stream of shadow vertices `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive<V, S> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
    pub shadow_vertices: Vec<S>,
    pub shadow_indices: Vec<u32>,
    /// Index into the document's material table, not validated here.
    pub material: Option<usize>,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeshPrimitive {
    Static(Primitive<Vertex, ShadowVertex>),
    Skinned(Primitive<SkinnedVertex, RiggedShadowVertex>),
}

impl MeshPrimitive {
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Static(p) => p.vertices.len(),
            Self::Skinned(p) => p.vertices.len(),
        }
    }

    pub fn indices(&self) -> &[u32] {
        match self {
            Self::Static(p) => &p.indices,
            Self::Skinned(p) => &p.indices,
        }
    }

    pub fn shadow_vertex_count(&self) -> usize {
        match self {
            Self::Static(p) => p.shadow_vertices.len(),
            Self::Skinned(p) => p.shadow_vertices.len(),
        }
    }

    pub fn shadow_indices(&self) -> &[u32] {
        match self {
            Self::Static(p) => &p.shadow_indices,
            Self::Skinned(p) => &p.shadow_indices,
        }
    }

    pub fn material(&self) -> Option<usize> {
        match self {
            Self::Static(p) => p.material,
            Self::Skinned(p) => p.material,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Static(p) => p.bounds,
            Self::Skinned(p) => p.bounds,
        }
    }

    pub fn is_skinned(&self) -> bool {
        matches!(self, Self::Skinned(_))
    }
}

/// One loaded mesh: primitives in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<MeshPrimitive>,
}

/// Assemble one primitive.
pub fn assemble<O: MeshOptimizer>(
    doc: &Document,
    desc: &PrimitiveDesc,
    optimizer: &O,
) -> Result<MeshPrimitive> {
    let topology = desc.topology;
    if !matches!(
        topology,
        Topology::Triangles | Topology::TriangleFan | Topology::TriangleStrip
    ) {
        return Err(SceneError::UnsupportedTopology(topology));
    }

    let indices = desc
        .indices
        .map(|index| extract_indices(doc, index))
        .transpose()
        .context("reading indices")?;

    let streams = StreamReader {
        doc,
        desc,
        indices: indices.as_deref(),
    };

    let positions = streams
        .read::<Vec3>(Semantic::Position, "POSITION")?
        .ok_or(SceneError::MissingAttribute("POSITION"))?;

    let normals = match streams.read::<Vec3>(Semantic::Normal, "NORMAL")? {
        Some(normals) => normals.into_iter().map(Vec3::normalize_or_zero).collect(),
        None => flat_normals(&positions),
    };

    let texcoords = streams
        .read::<Vec2>(Semantic::TexCoord(0), "TEXCOORD_0")?
        .ok_or(SceneError::MissingAttribute("TEXCOORD_0"))?;

    check_len("NORMAL", positions.len(), normals.len())?;
    check_len("TEXCOORD_0", positions.len(), texcoords.len())?;

    let tangents = tangents(&positions, &texcoords, &normals);
    check_len("TANGENT", positions.len(), tangents.len())?;

    let surface = positions
        .into_iter()
        .zip(normals)
        .zip(tangents)
        .zip(texcoords)
        .map(|(((position, normal), tangent), texcoord)| Vertex {
            position,
            normal,
            tangent,
            texcoord,
        });

    if !desc.is_skinned() {
        let vertices: Vec<Vertex> = surface.collect();
        return Ok(MeshPrimitive::Static(finish(vertices, desc, optimizer)));
    }

    let joints = streams.joints()?;
    let weights = streams.weights()?;
    let count = surface.len();
    check_len("JOINTS_0", count, joints.len())?;
    check_len("WEIGHTS_0", count, weights.len())?;

    let vertices: Vec<SkinnedVertex> = surface
        .zip(joints)
        .zip(weights)
        .map(|((v, joint_indices), joint_weights)| SkinnedVertex {
            position: v.position,
            normal: v.normal,
            tangent: v.tangent,
            texcoord: v.texcoord,
            joint_indices,
            joint_weights,
        })
        .collect();

    Ok(MeshPrimitive::Skinned(finish(vertices, desc, optimizer)))
}

fn finish<V, S, O>(vertices: Vec<V>, desc: &PrimitiveDesc, optimizer: &O) -> Primitive<V, S>
where
    V: MeshVertex + Into<S>,
    S: MeshVertex,
    O: MeshOptimizer,
{
    let shadow: Vec<S> = vertices.iter().copied().map(Into::into).collect();
    let optimized = optimizer.optimize(vertices);
    let shadow = optimizer.optimize(shadow);
    let (min, max) = bounds(optimized.vertices.iter().map(MeshVertex::position));

    Primitive {
        vertices: optimized.vertices,
        indices: optimized.indices,
        shadow_vertices: shadow.vertices,
        shadow_indices: shadow.indices,
        material: desc.material,
        bounds: Bounds { min, max },
    }
}

fn check_len(attribute: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SceneError::AttributeLengthMismatch {
            attribute,
            expected,
            found,
        })
    }
}

/// Reads per-vertex streams through the primitive's indices and topology.
struct StreamReader<'a> {
    doc: &'a Document,
    desc: &'a PrimitiveDesc,
    indices: Option<&'a [u32]>,
}

impl StreamReader<'_> {
    fn flatten<T: Copy>(&self, values: Vec<T>, name: &'static str) -> Result<Vec<T>> {
        let values = unpack(values, self.indices).with_context(|| format!("reading {}", name))?;
        validate_count(self.desc.topology, values.len())
            .with_context(|| format!("reading {}", name))?;
        Ok(rearrange(values, self.desc.topology))
    }

    fn read<T: Element>(&self, semantic: Semantic, name: &'static str) -> Result<Option<Vec<T>>> {
        let Some(accessor) = self.desc.attribute(&semantic) else {
            return Ok(None);
        };
        let values = extract::<T>(self.doc, accessor).with_context(|| format!("reading {}", name))?;
        self.flatten(values, name).map(Some)
    }

    fn required(&self, semantic: Semantic, name: &'static str) -> Result<usize> {
        self.desc
            .attribute(&semantic)
            .ok_or(SceneError::MissingAttribute(name))
    }

    fn joints(&self) -> Result<Vec<[u32; 4]>> {
        let accessor = self.required(Semantic::Joints(0), "JOINTS_0")?;
        let joints: Vec<[u32; 4]> = match self.doc.accessor(accessor)?.component_type {
            ComponentType::U8 => extract::<[u8; 4]>(self.doc, accessor)
                .context("reading JOINTS_0")?
                .into_iter()
                .map(|j| j.map(u32::from))
                .collect(),
            _ => extract::<[u16; 4]>(self.doc, accessor)
                .context("reading JOINTS_0")?
                .into_iter()
                .map(|j| j.map(u32::from))
                .collect(),
        };
        self.flatten(joints, "JOINTS_0")
    }

    fn weights(&self) -> Result<Vec<[f32; 4]>> {
        let accessor = self.required(Semantic::Weights(0), "WEIGHTS_0")?;
        let weights: Vec<[f32; 4]> = match self.doc.accessor(accessor)?.component_type {
            ComponentType::U8 => extract::<[u8; 4]>(self.doc, accessor)
                .context("reading WEIGHTS_0")?
                .into_iter()
                .map(|w| w.map(|c| c as f32 / u8::MAX as f32))
                .collect(),
            ComponentType::U16 => extract::<[u16; 4]>(self.doc, accessor)
                .context("reading WEIGHTS_0")?
                .into_iter()
                .map(|w| w.map(|c| c as f32 / u16::MAX as f32))
                .collect(),
            _ => extract::<Vec4>(self.doc, accessor)
                .context("reading WEIGHTS_0")?
                .into_iter()
                .map(|w| w.to_array())
                .collect(),
        };
        self.flatten(weights, "WEIGHTS_0")
    }
}

impl MeshPrimitive {
    /// Byte-pack the vertex and index lists, main and shadow, for upload.
    pub fn to_buffers(&self) -> PrimitiveBuffers {
        let (vertex_bytes, shadow_vertex_bytes) = match self {
            Self::Static(p) => (
                bytemuck::cast_slice(&p.vertices).to_vec(),
                bytemuck::cast_slice(&p.shadow_vertices).to_vec(),
            ),
            Self::Skinned(p) => (
                bytemuck::cast_slice(&p.vertices).to_vec(),
                bytemuck::cast_slice(&p.shadow_vertices).to_vec(),
            ),
        };
        let indices = self.indices();
        let shadow_indices = self.shadow_indices();

        PrimitiveBuffers {
            vertex_bytes,
            index_bytes: bytemuck::cast_slice(indices).to_vec(),
            index_count: indices.len() as u32,
            shadow_vertex_bytes,
            shadow_index_bytes: bytemuck::cast_slice(shadow_indices).to_vec(),
            shadow_index_count: shadow_indices.len() as u32,
            material: self.material(),
            bounds: self.bounds(),
            skinned: self.is_skinned(),
        }
    }
}

/// Upload-ready bytes for one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveBuffers {
    /// `Vertex` or `SkinnedVertex` records, `#[repr(C)]` layout.
    pub vertex_bytes: Vec<u8>,
    /// Native-endian `u32` triangle list.
    pub index_bytes: Vec<u8>,
    pub index_count: u32,
    /// `ShadowVertex` or `RiggedShadowVertex` records.
    pub shadow_vertex_bytes: Vec<u8>,
    /// Native-endian `u32` triangle list into the shadow vertices.
    pub shadow_index_bytes: Vec<u8>,
    pub shadow_index_count: u32,
    pub material: Option<usize>,
    pub bounds: Bounds,
    pub skinned: bool,
}
