//! Programmatic GLB generation for integration tests.
//!
//! Each fixture builds a small scene with [`SceneBuilder`] and returns the
//! GLB bytes:
//! - `Root -> A` with one triangle
//! - a single node spinning 180 degrees about Y
//! - a self-referencing node
//! - a node shared by two parents
//! - a skinned triangle driven by one joint

mod builder;

use builder::SceneBuilder;

use glam::{Mat4, Quat, Vec3};
use gltf_json as json;
use json::animation::{Interpolation, Property};
use json::mesh::Semantic;

/// Translation of node A in [`root_and_child_glb`].
pub const CHILD_TRANSLATION: Vec3 = Vec3::new(1.0, 2.0, 3.0);

/// Rotation of node A in [`root_and_child_glb`].
pub fn child_rotation() -> Quat {
    Quat::from_rotation_z(0.5)
}

/// Bind position of the joint in [`skinned_glb`].
pub const JOINT_BIND: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Adds the unit right triangle (positions + UVs, no indices).
fn add_triangle(builder: &mut SceneBuilder) -> u32 {
    let positions = builder.push_positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let uvs = builder.push_vec2(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    builder.add_mesh(
        "Triangle",
        &[(Semantic::Positions, positions), (Semantic::TexCoords(0), uvs)],
        None,
    )
}

/// `Root{children:[A]}`, `A{mesh:0}` placed by [`CHILD_TRANSLATION`] and
/// [`child_rotation`].
pub fn root_and_child_glb() -> Vec<u8> {
    let mut b = SceneBuilder::default();
    let mesh = add_triangle(&mut b);
    let root = b.add_node("Root", &[1], None);
    let child = b.add_node("A", &[], Some(mesh));
    b.set_translation(child, CHILD_TRANSLATION);
    b.set_rotation(child, child_rotation());
    b.set_roots(&[root]);
    b.build_glb()
}

/// One node rotating from identity to 180 degrees about Y over one second,
/// in an animation named "Spin".
pub fn spin_glb() -> Vec<u8> {
    let mut b = SceneBuilder::default();
    let mesh = add_triangle(&mut b);
    let node = b.add_node("Spinner", &[], Some(mesh));

    let times = b.push_times(&[0.0, 1.0]);
    let rotations = b.push_vec4(&[
        Quat::IDENTITY.to_array(),
        Quat::from_xyzw(0.0, 1.0, 0.0, 0.0).to_array(),
    ]);
    b.add_channel(node, Property::Rotation, times, rotations, Interpolation::Linear);
    b.name_animation("Spin");
    b.set_roots(&[node]);
    b.build_glb()
}

/// `Root{children:[A]}` where A also lists itself as a child.
pub fn self_cycle_glb() -> Vec<u8> {
    let mut b = SceneBuilder::default();
    let root = b.add_node("Root", &[1], None);
    b.add_node("A", &[1], None);
    b.set_roots(&[root]);
    b.build_glb()
}

/// Nodes 0 and 1 both list node 2 as a child.
pub fn shared_child_glb() -> Vec<u8> {
    let mut b = SceneBuilder::default();
    let first = b.add_node("First", &[2], None);
    let second = b.add_node("Second", &[2], None);
    b.add_node("Shared", &[], None);
    b.set_roots(&[first, second]);
    b.build_glb()
}

/// A triangle fully weighted to one joint, with the joint moved up from its
/// bind position by one unit via its node translation.
pub fn skinned_glb() -> Vec<u8> {
    let mut b = SceneBuilder::default();

    let positions = b.push_positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let uvs = b.push_vec2(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    let joints = b.push_joints_u8(&[[0, 0, 0, 0]; 3]);
    let weights = b.push_vec4(&[[1.0, 0.0, 0.0, 0.0]; 3]);
    let indices = b.push_indices_u16(&[0, 1, 2]);
    let ibm = b.push_mat4(&[Mat4::from_translation(JOINT_BIND).inverse()]);

    let mesh = b.add_mesh(
        "SkinnedTriangle",
        &[
            (Semantic::Positions, positions),
            (Semantic::TexCoords(0), uvs),
            (Semantic::Joints(0), joints),
            (Semantic::Weights(0), weights),
        ],
        Some(indices),
    );

    let joint = b.add_node("Joint", &[], None);
    b.set_translation(joint, JOINT_BIND + Vec3::Y);
    let body = b.add_node("Body", &[], Some(mesh));
    let skin = b.add_skin(&[joint], Some(ibm));
    b.set_skin(body, skin);
    b.set_roots(&[joint, body]);
    b.build_glb()
}
