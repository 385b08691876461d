//! Mesh optimizers
//!
//! An optimizer receives a flat triangle list (three vertices per triangle)
//! and returns a vertex list plus matching `u32` indices. [`DedupOptimizer`]
//! merges vertices that satisfy [`MeshVertex::approx_eq`].

use hashbrown::HashMap;

use super::vertex::MeshVertex;

/// Output of a [`MeshOptimizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedMesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

pub trait MeshOptimizer: Send + Sync {
    fn optimize<V: MeshVertex>(&self, vertices: Vec<V>) -> OptimizedMesh<V>;
}

/// Keeps every vertex, indices are `0..n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughOptimizer;

impl MeshOptimizer for PassthroughOptimizer {
    fn optimize<V: MeshVertex>(&self, vertices: Vec<V>) -> OptimizedMesh<V> {
        let indices = (0..vertices.len() as u32).collect();
        OptimizedMesh { vertices, indices }
    }
}

/// Welds approximately equal vertices.
///
/// Candidates are bucketed by the exact bit pattern of position and texcoord
/// (the two fields compared exactly), then matched with the full predicate.
/// Output vertices keep first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupOptimizer;

type BucketKey = [u32; 5];

fn bucket_key<V: MeshVertex>(vertex: &V) -> BucketKey {
    // +0.0 folds -0.0 into the same bucket; the two compare equal as floats
    let p = vertex.position() + 0.0;
    let uv = vertex.texcoord() + 0.0;
    [
        p.x.to_bits(),
        p.y.to_bits(),
        p.z.to_bits(),
        uv.x.to_bits(),
        uv.y.to_bits(),
    ]
}

impl MeshOptimizer for DedupOptimizer {
    fn optimize<V: MeshVertex>(&self, vertices: Vec<V>) -> OptimizedMesh<V> {
        let mut buckets: HashMap<BucketKey, Vec<u32>> = HashMap::new();
        let mut unique: Vec<V> = Vec::with_capacity(vertices.len());
        let mut indices = Vec::with_capacity(vertices.len());

        for vertex in vertices {
            let bucket = buckets.entry(bucket_key(&vertex)).or_default();
            let found = bucket
                .iter()
                .copied()
                .find(|&i| unique[i as usize].approx_eq(&vertex));

            let index = match found {
                Some(index) => index,
                None => {
                    let index = unique.len() as u32;
                    unique.push(vertex);
                    bucket.push(index);
                    index
                }
            };
            indices.push(index);
        }

        OptimizedMesh {
            vertices: unique,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::vertex::Vertex;
    use glam::{Vec2, Vec3};

    fn vertex(position: Vec3, normal: Vec3) -> Vertex {
        Vertex {
            position,
            normal,
            tangent: Vec3::X,
            texcoord: Vec2::ZERO,
        }
    }

    fn quad() -> Vec<Vertex> {
        let a = vertex(Vec3::new(0.0, 0.0, 0.0), Vec3::Z);
        let b = vertex(Vec3::new(1.0, 0.0, 0.0), Vec3::Z);
        let c = vertex(Vec3::new(1.0, 1.0, 0.0), Vec3::Z);
        let d = vertex(Vec3::new(0.0, 1.0, 0.0), Vec3::Z);
        vec![a, b, c, a, c, d]
    }

    #[test]
    fn test_dedup_quad_shares_diagonal() {
        let out = DedupOptimizer.optimize(quad());
        assert_eq!(out.vertices.len(), 4);
        assert_eq!(out.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_dedup_keeps_hard_edges() {
        let mut tris = quad();
        // second triangle faces the other way at the shared corners
        for v in &mut tris[3..] {
            v.normal = -Vec3::Z;
        }
        let out = DedupOptimizer.optimize(tris);
        assert_eq!(out.vertices.len(), 6);
    }

    #[test]
    fn test_dedup_negative_zero() {
        let a = vertex(Vec3::new(0.0, 0.0, 0.0), Vec3::Z);
        let b = vertex(Vec3::new(-0.0, 0.0, 0.0), Vec3::Z);
        let out = DedupOptimizer.optimize(vec![a, b, a]);
        assert_eq!(out.vertices.len(), 1);
        assert_eq!(out.indices, vec![0, 0, 0]);
    }

    #[test]
    fn test_unique_triangle_unchanged() {
        let tri = quad()[..3].to_vec();
        let out = DedupOptimizer.optimize(tri.clone());
        assert_eq!(out.vertices, tri);
        assert_eq!(out.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_passthrough() {
        let out = PassthroughOptimizer.optimize(quad());
        assert_eq!(out.vertices.len(), 6);
        assert_eq!(out.indices, vec![0, 1, 2, 3, 4, 5]);
    }
}
