//! Value types a sampler can interpolate

use glam::{Quat, Vec3};

pub trait AnimValue: Copy + std::fmt::Debug + Send + Sync {
    fn lerp(a: Self, b: Self, t: f32) -> Self;

    /// Cubic Hermite blend of `(v0, out0)` and `(v1, in1)` over a segment of
    /// length `dt`, with normalized position `u`.
    fn hermite(v0: Self, out0: Self, v1: Self, in1: Self, dt: f32, u: f32) -> Self;
}

fn hermite_basis(u: f32) -> [f32; 4] {
    let u2 = u * u;
    let u3 = u2 * u;
    [
        2.0 * u3 - 3.0 * u2 + 1.0,
        u3 - 2.0 * u2 + u,
        -2.0 * u3 + 3.0 * u2,
        u3 - u2,
    ]
}

impl AnimValue for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }

    fn hermite(v0: Self, out0: Self, v1: Self, in1: Self, dt: f32, u: f32) -> Self {
        let [h00, h10, h01, h11] = hermite_basis(u);
        v0 * h00 + out0 * (h10 * dt) + v1 * h01 + in1 * (h11 * dt)
    }
}

impl AnimValue for Quat {
    /// Shortest-arc slerp.
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        let b = if a.dot(b) < 0.0 { -b } else { b };
        a.slerp(b, t).normalize()
    }

    fn hermite(v0: Self, out0: Self, v1: Self, in1: Self, dt: f32, u: f32) -> Self {
        let [h00, h10, h01, h11] = hermite_basis(u);
        let blended = v0 * h00 + out0 * (h10 * dt) + v1 * h01 + in1 * (h11 * dt);
        blended.normalize()
    }
}
