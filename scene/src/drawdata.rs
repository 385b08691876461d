//! Per-frame world matrices and draw lists

use glam::Mat4;

use crate::mesh::Mesh;
use crate::node::{Node, TransformOverride};
use crate::skin::SkinList;
use crate::topology::SceneTopology;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveRef {
    pub mesh: usize,
    pub primitive: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRef {
    /// The primitive declares no material.
    Default,
    Index(usize),
}

/// One renderable primitive instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawdata {
    pub world_matrix: Mat4,
    pub primitive: PrimitiveRef,
    pub material: MaterialRef,
    /// Start of the node's skin in the joint matrix array, for skinned
    /// primitives on skinned nodes.
    pub joint_offset: Option<u32>,
}

/// Resolve a primitive's material against a table of `count` materials.
/// `None` means the reference is dangling.
pub fn resolve_material(material: Option<usize>, count: usize) -> Option<MaterialRef> {
    match material {
        None => Some(MaterialRef::Default),
        Some(index) if index < count => Some(MaterialRef::Index(index)),
        Some(_) => None,
    }
}

/// `world = parent_world * local(override)` in topological order. Parentless
/// nodes start from `root`. Missing overrides count as empty.
pub fn compute_world_matrices(
    nodes: &[Node],
    topology: &SceneTopology,
    root: Mat4,
    overrides: &[TransformOverride],
) -> Vec<Mat4> {
    let mut world = vec![Mat4::IDENTITY; nodes.len()];

    for &index in &topology.topo_order {
        let parent = match topology.parents[index] {
            Some(parent) => world[parent],
            None => root,
        };
        let over = overrides.get(index).copied().unwrap_or_default();
        world[index] = parent * nodes[index].local_transform(&over);
    }

    world
}

/// Draw list for one frame, in topological order.
pub fn generate_drawdata(
    nodes: &[Node],
    meshes: &[Mesh],
    topology: &SceneTopology,
    world: &[Mat4],
    material_count: usize,
    skins: &SkinList,
) -> Vec<Drawdata> {
    let mut drawdata = Vec::new();

    for &index in &topology.topo_order {
        let node = &nodes[index];
        if !topology.renderable[index] {
            continue;
        }
        let Some(mesh_index) = node.mesh else {
            continue;
        };
        let Some(mesh) = meshes.get(mesh_index) else {
            continue;
        };

        let skin_offset = node
            .skin
            .and_then(|s| skins.skins.get(s))
            .map(|s| s.offset as u32);

        for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
            let Some(material) = resolve_material(primitive.material(), material_count) else {
                tracing::debug!(
                    "Skipping mesh {} primitive {}: material {:?} out of range ({} materials)",
                    mesh_index,
                    primitive_index,
                    primitive.material(),
                    material_count
                );
                continue;
            };

            drawdata.push(Drawdata {
                world_matrix: world[index],
                primitive: PrimitiveRef {
                    mesh: mesh_index,
                    primitive: primitive_index,
                },
                material,
                joint_offset: skin_offset.filter(|_| primitive.is_skinned()),
            });
        }
    }

    drawdata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Bounds, MeshPrimitive, Primitive};
    use crate::node::{LocalTransform, Transform};
    use glam::{Quat, Vec3};

    fn node(children: Vec<usize>, mesh: Option<usize>, translation: Vec3) -> Node {
        Node {
            name: None,
            children,
            mesh,
            skin: None,
            transform: LocalTransform::Trs(Transform {
                translation,
                ..Transform::IDENTITY
            }),
        }
    }

    fn mesh(materials: &[Option<usize>]) -> Mesh {
        Mesh {
            name: None,
            primitives: materials
                .iter()
                .map(|&material| {
                    MeshPrimitive::Static(Primitive {
                        vertices: Vec::new(),
                        indices: Vec::new(),
                        shadow_vertices: Vec::new(),
                        shadow_indices: Vec::new(),
                        material,
                        bounds: Bounds {
                            min: Vec3::ZERO,
                            max: Vec3::ZERO,
                        },
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn test_world_matrices_compose_parent_first() {
        let nodes = vec![
            node(vec![1], None, Vec3::X),
            node(vec![], None, Vec3::Y),
        ];
        let topology = SceneTopology::resolve(&nodes, &[0]).unwrap();
        let root = Mat4::from_translation(Vec3::Z);

        let world = compute_world_matrices(&nodes, &topology, root, &[]);
        assert_eq!(world[0].w_axis.truncate(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(world[1].w_axis.truncate(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_overrides_feed_world_matrices() {
        let nodes = vec![node(vec![], None, Vec3::X)];
        let topology = SceneTopology::resolve(&nodes, &[0]).unwrap();
        let overrides = [TransformOverride {
            translation: Some(Vec3::splat(3.0)),
            rotation: Some(Quat::IDENTITY),
            scale: None,
        }];

        let world = compute_world_matrices(&nodes, &topology, Mat4::IDENTITY, &overrides);
        assert_eq!(world[0], Mat4::from_translation(Vec3::splat(3.0)));
    }

    #[test]
    fn test_invalid_material_skips_only_that_primitive() {
        let nodes = vec![node(vec![], Some(0), Vec3::ZERO)];
        let meshes = vec![mesh(&[Some(0), Some(7), None])];
        let topology = SceneTopology::resolve(&nodes, &[0]).unwrap();
        let world = compute_world_matrices(&nodes, &topology, Mat4::IDENTITY, &[]);

        let draws = generate_drawdata(&nodes, &meshes, &topology, &world, 1, &SkinList::default());
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].material, MaterialRef::Index(0));
        assert_eq!(draws[1].material, MaterialRef::Default);
        assert_eq!(draws[1].primitive, PrimitiveRef { mesh: 0, primitive: 2 });
    }

    #[test]
    fn test_unreachable_nodes_not_drawn() {
        // node 1 is parentless but not a scene root
        let nodes = vec![
            node(vec![], Some(0), Vec3::ZERO),
            node(vec![], Some(0), Vec3::ZERO),
        ];
        let meshes = vec![mesh(&[None])];
        let topology = SceneTopology::resolve(&nodes, &[0]).unwrap();
        let world = compute_world_matrices(&nodes, &topology, Mat4::IDENTITY, &[]);

        let draws = generate_drawdata(&nodes, &meshes, &topology, &world, 0, &SkinList::default());
        assert_eq!(draws.len(), 1);
    }

    #[test]
    fn test_resolve_material() {
        assert_eq!(resolve_material(None, 0), Some(MaterialRef::Default));
        assert_eq!(resolve_material(Some(1), 2), Some(MaterialRef::Index(1)));
        assert_eq!(resolve_material(Some(2), 2), None);
    }
}
