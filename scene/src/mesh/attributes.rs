//! Derived vertex attributes: flat normals, tangents, bounds

use glam::{Mat2, Vec2, Vec3};

/// Bounds whose smallest extent is below this fraction of the largest are
/// inflated.
const DEGENERATE_RATIO: f32 = 0.0001;

/// Half-extent given to a degenerate axis, as a fraction of the largest extent.
const INFLATE_RATIO: f32 = 0.0005;

/// One face normal per triangle, repeated for its three corners.
pub fn flat_normals(positions: &[Vec3]) -> Vec<Vec3> {
    positions
        .chunks_exact(3)
        .flat_map(|tri| {
            let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
            [n; 3]
        })
        .collect()
}

/// Per-corner tangents for a flat triangle list, orthogonalized against the
/// matching normal.
pub fn tangents(positions: &[Vec3], texcoords: &[Vec2], normals: &[Vec3]) -> Vec<Vec3> {
    let face_tangents = positions
        .chunks_exact(3)
        .zip(texcoords.chunks_exact(3))
        .flat_map(|(p, uv)| [face_tangent([p[0], p[1], p[2]], [uv[0], uv[1], uv[2]]); 3]);

    face_tangents
        .zip(normals)
        .map(|(tangent, &normal)| normal.cross(tangent.cross(normal)).normalize_or_zero())
        .collect()
}

fn face_tangent(p: [Vec3; 3], uv: [Vec2; 3]) -> Vec3 {
    let e1 = p[1] - p[0];
    let e2 = p[2] - p[0];
    let duv = Mat2::from_cols(uv[1] - uv[0], uv[2] - uv[0]);

    let det = duv.determinant();
    if det.abs() <= f32::EPSILON {
        // no usable UV mapping
        return e1.normalize_or_zero();
    }

    let inv = duv.inverse();
    (e1 * inv.x_axis.x + e2 * inv.x_axis.y).normalize_or_zero()
}

/// Axis-aligned bounds of `positions`, inflated on degenerate axes.
pub fn bounds(positions: impl IntoIterator<Item = Vec3>) -> (Vec3, Vec3) {
    let (min, max) = positions.into_iter().fold(
        (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
        |(min, max), p| (min.min(p), max.max(p)),
    );
    if min.x > max.x {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    inflate_degenerate(min, max)
}

pub fn inflate_degenerate(min: Vec3, max: Vec3) -> (Vec3, Vec3) {
    let extent = max - min;
    let max_dim = extent.max_element();
    let min_dim = extent.min_element();

    if min_dim >= DEGENERATE_RATIO * max_dim {
        return (min, max);
    }

    let center = (min + max) * 0.5;
    let half = Vec3::splat(INFLATE_RATIO * max_dim);
    (min.min(center - half), max.max(center + half))
}
