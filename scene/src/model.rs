//! Loaded scene model
//!
//! [`Model::load`] runs four stages over a [`Document`]:
//!
//! 1. **Node**: copy nodes, pick the scene roots, validate mesh/skin links
//! 2. **Mesh**: assemble every mesh on the rayon pool
//! 3. **Material**: record the material table size
//! 4. **Postprocess**: skins, animations, scene topology
//!
//! After loading, the model is immutable. Per-frame work
//! ([`Model::generate_frame`]) borrows it and allocates fresh outputs.

use glam::Mat4;
use rayon::prelude::*;

use crate::animation::{self, Animation, AnimationKey};
use crate::config::LoadConfig;
use crate::document::{Document, MeshDesc};
use crate::drawdata::{self, Drawdata, PrimitiveRef};
use crate::error::{Result, ResultExt, SceneError};
use crate::mesh::{
    DedupOptimizer, Mesh, MeshOptimizer, PassthroughOptimizer, PrimitiveBuffers, assemble,
};
use crate::node::{Node, TransformOverride};
use crate::progress::{LoadStage, ProgressCell, StageCounter};
use crate::skin::SkinList;
use crate::topology::SceneTopology;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub skins: SkinList,
    pub animations: Vec<Animation>,
    pub topology: SceneTopology,
    pub material_count: usize,
    /// Root nodes of the instantiated scene.
    pub roots: Vec<usize>,
}

/// Everything produced for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Index-parallel to [`Model::nodes`].
    pub world_matrices: Vec<Mat4>,
    /// Index-parallel to the shared [`SkinList`] storage.
    pub joint_matrices: Vec<Mat4>,
    pub drawdata: Vec<Drawdata>,
}

impl Model {
    /// Load with the optimizer selected by `config.deduplicate`.
    pub fn load(
        doc: &Document,
        config: &LoadConfig,
        progress: Option<&ProgressCell>,
    ) -> Result<Self> {
        if config.deduplicate {
            Self::load_with_optimizer(doc, config, &DedupOptimizer, progress)
        } else {
            Self::load_with_optimizer(doc, config, &PassthroughOptimizer, progress)
        }
    }

    pub fn load_with_optimizer<O: MeshOptimizer>(
        doc: &Document,
        config: &LoadConfig,
        optimizer: &O,
        progress: Option<&ProgressCell>,
    ) -> Result<Self> {
        let scratch;
        let progress = match progress {
            Some(cell) => cell,
            None => {
                scratch = ProgressCell::new();
                &scratch
            }
        };

        // Node
        progress.set(LoadStage::Node, None);
        let nodes: Vec<Node> = doc.nodes.iter().map(Node::from).collect();
        validate_node_links(doc, &nodes)?;
        let roots = doc
            .root_nodes(config.scene)
            .context("selecting scene")?
            .to_vec();

        // Mesh
        let meshes = match config.worker_threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| load_meshes(doc, optimizer, progress)),
            None => load_meshes(doc, optimizer, progress),
        }?;

        // Material
        progress.set(LoadStage::Material, None);
        let material_count = doc.material_count;

        // Postprocess
        progress.set(LoadStage::Postprocess, Some(0.0));
        let skins = SkinList::load(doc, nodes.len())?;
        let animations = (0..doc.animations.len())
            .map(|index| {
                Animation::load(doc, index, nodes.len())
                    .with_context(|| format!("loading animation {}", index))
            })
            .collect::<Result<Vec<_>>>()?;
        let topology = SceneTopology::resolve(&nodes, &roots).context("resolving scene topology")?;
        progress.set(LoadStage::Postprocess, Some(1.0));

        tracing::info!(
            "Loaded scene: {} nodes, {} meshes, {} skins, {} animations, {} materials",
            nodes.len(),
            meshes.len(),
            skins.len(),
            animations.len(),
            material_count
        );

        Ok(Self {
            nodes,
            meshes,
            skins,
            animations,
            topology,
            material_count,
            roots,
        })
    }

    /// Override array for this frame; keys are applied in order.
    pub fn evaluate_animations(&self, keys: &[AnimationKey]) -> Result<Vec<TransformOverride>> {
        animation::evaluate(&self.animations, keys, self.nodes.len())
    }

    pub fn world_matrices(&self, root: Mat4, overrides: &[TransformOverride]) -> Vec<Mat4> {
        drawdata::compute_world_matrices(&self.nodes, &self.topology, root, overrides)
    }

    pub fn generate_drawdata(&self, root: Mat4, overrides: &[TransformOverride]) -> Vec<Drawdata> {
        let world = self.world_matrices(root, overrides);
        self.drawdata_for(&world)
    }

    pub fn generate_frame(&self, root: Mat4, overrides: &[TransformOverride]) -> Frame {
        let world_matrices = self.world_matrices(root, overrides);
        let joint_matrices = self.skins.compute_joint_matrices(&world_matrices);
        let drawdata = self.drawdata_for(&world_matrices);
        Frame {
            world_matrices,
            joint_matrices,
            drawdata,
        }
    }

    fn drawdata_for(&self, world: &[Mat4]) -> Vec<Drawdata> {
        drawdata::generate_drawdata(
            &self.nodes,
            &self.meshes,
            &self.topology,
            world,
            self.material_count,
            &self.skins,
        )
    }

    /// Upload-ready bytes for every primitive, in mesh then primitive order.
    pub fn primitive_buffers(&self) -> Vec<(PrimitiveRef, PrimitiveBuffers)> {
        self.meshes
            .iter()
            .enumerate()
            .flat_map(|(mesh, m)| {
                m.primitives.iter().enumerate().map(move |(primitive, p)| {
                    (PrimitiveRef { mesh, primitive }, p.to_buffers())
                })
            })
            .collect()
    }
}

fn validate_node_links(doc: &Document, nodes: &[Node]) -> Result<()> {
    for (index, node) in nodes.iter().enumerate() {
        let links = [
            ("mesh", node.mesh, doc.meshes.len()),
            ("skin", node.skin, doc.skins.len()),
        ];
        for (kind, link, count) in links {
            if let Some(link) = link.filter(|&link| link >= count) {
                return Err(SceneError::out_of_bounds(kind, link, count))
                    .with_context(|| format!("validating node {}", index));
            }
        }
    }
    Ok(())
}

fn load_meshes<O: MeshOptimizer>(
    doc: &Document,
    optimizer: &O,
    progress: &ProgressCell,
) -> Result<Vec<Mesh>> {
    let counter = StageCounter::new(progress, LoadStage::Mesh, doc.meshes.len());

    // Every mesh runs to completion; the first failure in declaration order
    // is reported.
    let results: Vec<Result<Mesh>> = doc
        .meshes
        .par_iter()
        .enumerate()
        .map(|(index, desc)| {
            let mesh = load_mesh(doc, index, desc, optimizer)
                .with_context(|| format!("loading mesh {}", index));
            counter.complete_one();
            mesh
        })
        .collect();

    results.into_iter().collect()
}

fn load_mesh<O: MeshOptimizer>(
    doc: &Document,
    index: usize,
    desc: &MeshDesc,
    optimizer: &O,
) -> Result<Mesh> {
    let primitives = desc
        .primitives
        .iter()
        .enumerate()
        .map(|(primitive, p)| {
            assemble(doc, p, optimizer).with_context(|| format!("assembling primitive {}", primitive))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Mesh {} ({}): {} primitives, {} vertices",
        index,
        desc.name.as_deref().unwrap_or("unnamed"),
        primitives.len(),
        primitives.iter().map(|p| p.vertex_count()).sum::<usize>()
    );

    Ok(Mesh {
        name: desc.name.clone(),
        primitives,
    })
}
