//! Index unpacking and fan/strip expansion
//!
//! Both steps turn attribute streams into a flat triangle list, one entry per
//! triangle corner. Every attribute of a primitive goes through the same pair
//! of calls so the streams stay aligned.

use crate::document::Topology;
use crate::error::{Result, SceneError};

/// Gather `values[index]` for every index. `None` passes `values` through.
pub fn unpack<T: Copy>(values: Vec<T>, indices: Option<&[u32]>) -> Result<Vec<T>> {
    let Some(indices) = indices else {
        return Ok(values);
    };

    indices
        .iter()
        .map(|&index| {
            values
                .get(index as usize)
                .copied()
                .ok_or(SceneError::VertexIndexOutOfBounds {
                    index,
                    count: values.len(),
                })
        })
        .collect()
}

/// Check that `count` corners form whole triangles for `topology`.
pub fn validate_count(topology: Topology, count: usize) -> Result<()> {
    let valid = match topology {
        Topology::Triangles => count > 0 && count % 3 == 0,
        Topology::TriangleFan | Topology::TriangleStrip => count >= 3,
        other => return Err(SceneError::UnsupportedTopology(other)),
    };

    if valid {
        Ok(())
    } else {
        Err(SceneError::InvalidVertexCount { topology, count })
    }
}

/// Expand a fan or strip into a triangle list. Triangle lists are returned
/// unchanged. The caller validates the count first.
pub fn rearrange<T: Copy>(values: Vec<T>, topology: Topology) -> Vec<T> {
    match topology {
        Topology::TriangleFan => (1..values.len() - 1)
            .flat_map(|i| [values[0], values[i], values[i + 1]])
            .collect(),
        Topology::TriangleStrip => (0..values.len() - 2)
            .flat_map(|i| {
                if i % 2 == 0 {
                    [values[i], values[i + 1], values[i + 2]]
                } else {
                    // flip winding on odd triangles
                    [values[i + 1], values[i], values[i + 2]]
                }
            })
            .collect(),
        _ => values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn signed_area(tri: &[Vec2]) -> f32 {
        0.5 * (tri[1] - tri[0]).perp_dot(tri[2] - tri[0])
    }

    #[test]
    fn test_unpack_gathers_by_index() {
        let values = vec!['a', 'b', 'c'];
        let out = unpack(values, Some(&[2, 0, 0, 1])).unwrap();
        assert_eq!(out, vec!['c', 'a', 'a', 'b']);
    }

    #[test]
    fn test_unpack_without_indices_is_identity() {
        let out = unpack(vec![1, 2, 3], None).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_unpack_out_of_range_index() {
        let err = unpack(vec![1, 2, 3], Some(&[0, 3])).unwrap_err();
        assert!(matches!(
            err,
            SceneError::VertexIndexOutOfBounds { index: 3, count: 3 }
        ));
    }

    #[test]
    fn test_fan_expansion() {
        let out = rearrange(vec![0, 1, 2, 3, 4], Topology::TriangleFan);
        assert_eq!(out, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn test_strip_expansion_alternates_winding() {
        let out = rearrange(vec![0, 1, 2, 3, 4], Topology::TriangleStrip);
        assert_eq!(out, vec![0, 1, 2, 2, 1, 3, 2, 3, 4]);
    }

    #[test]
    fn test_expansion_counts() {
        for n in 3..10 {
            let values: Vec<usize> = (0..n).collect();
            assert_eq!(rearrange(values.clone(), Topology::TriangleFan).len(), 3 * (n - 2));
            assert_eq!(rearrange(values, Topology::TriangleStrip).len(), 3 * (n - 2));
        }
    }

    #[test]
    fn test_strip_preserves_area_and_facing() {
        // unit-width strip zig-zagging along x: 0,0 0,1 1,0 1,1 2,0 2,1
        let strip: Vec<Vec2> = (0..6)
            .map(|i| Vec2::new((i / 2) as f32, (i % 2) as f32))
            .collect();
        let tris = rearrange(strip, Topology::TriangleStrip);

        let areas: Vec<f32> = tris.chunks(3).map(signed_area).collect();
        let total: f32 = areas.iter().map(|a| a.abs()).sum();
        assert!((total - 2.0).abs() < 1e-6);
        // all triangles share one facing
        assert!(areas.iter().all(|a| a.signum() == areas[0].signum()));
    }

    #[test]
    fn test_fan_preserves_area() {
        // unit square as a fan
        let fan = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let tris = rearrange(fan, Topology::TriangleFan);
        let total: f32 = tris.chunks(3).map(signed_area).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count(Topology::Triangles, 6).is_ok());
        assert!(validate_count(Topology::Triangles, 4).is_err());
        assert!(validate_count(Topology::Triangles, 0).is_err());
        assert!(validate_count(Topology::TriangleFan, 2).is_err());
        assert!(validate_count(Topology::TriangleStrip, 3).is_ok());
        assert!(matches!(
            validate_count(Topology::Lines, 6),
            Err(SceneError::UnsupportedTopology(Topology::Lines))
        ));
    }
}
