//! Keyframe samplers

use super::interpolation::AnimValue;
use crate::document::Interpolation;
use crate::error::{Result, SceneError};

/// Control point of a cubic spline keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicKeyframe<T> {
    pub in_tangent: T,
    pub value: T,
    pub out_tangent: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sampler<T> {
    Linear(Vec<(f32, T)>),
    Step(Vec<(f32, T)>),
    CubicSpline(Vec<(f32, CubicKeyframe<T>)>),
}

fn sort_keyframes<K>(mut keyframes: Vec<(f32, K)>) -> Vec<(f32, K)> {
    keyframes.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyframes
}

impl<T: AnimValue> Sampler<T> {
    /// Build from raw input/output accessor data.
    ///
    /// Linear and step take one value per timestamp. Cubic splines take
    /// `(in_tangent, value, out_tangent)` triplets and need two keyframes.
    pub fn from_raw(timestamps: Vec<f32>, values: Vec<T>, mode: Interpolation) -> Result<Self> {
        if let Some(bad) = timestamps.iter().position(|t| t.is_nan()) {
            return Err(SceneError::InvalidSampler(format!(
                "timestamp {} is NaN",
                bad
            )));
        }

        match mode {
            Interpolation::Linear | Interpolation::Step => {
                if timestamps.len() != values.len() {
                    return Err(SceneError::InvalidSampler(format!(
                        "{} timestamps but {} values",
                        timestamps.len(),
                        values.len()
                    )));
                }
                if timestamps.is_empty() {
                    return Err(SceneError::InvalidSampler("no keyframes".into()));
                }

                let keyframes = sort_keyframes(timestamps.into_iter().zip(values).collect());
                Ok(if mode == Interpolation::Linear {
                    Self::Linear(keyframes)
                } else {
                    Self::Step(keyframes)
                })
            }
            Interpolation::CubicSpline => {
                if timestamps.len() * 3 != values.len() {
                    return Err(SceneError::InvalidSampler(format!(
                        "{} timestamps need {} cubic spline values, got {}",
                        timestamps.len(),
                        timestamps.len() * 3,
                        values.len()
                    )));
                }
                if timestamps.len() < 2 {
                    return Err(SceneError::InvalidSampler(
                        "cubic spline needs at least 2 keyframes".into(),
                    ));
                }

                let keyframes = timestamps
                    .into_iter()
                    .zip(values.chunks_exact(3))
                    .map(|(t, v)| {
                        (
                            t,
                            CubicKeyframe {
                                in_tangent: v[0],
                                value: v[1],
                                out_tangent: v[2],
                            },
                        )
                    })
                    .collect();
                Ok(Self::CubicSpline(sort_keyframes(keyframes)))
            }
        }
    }

    pub fn keyframe_count(&self) -> usize {
        match self {
            Self::Linear(k) | Self::Step(k) => k.len(),
            Self::CubicSpline(k) => k.len(),
        }
    }

    /// Time of the last keyframe.
    pub fn end_time(&self) -> f32 {
        match self {
            Self::Linear(k) | Self::Step(k) => k.last().map_or(0.0, |k| k.0),
            Self::CubicSpline(k) => k.last().map_or(0.0, |k| k.0),
        }
    }

    /// Sample at `time`, clamping outside the keyframe range.
    pub fn evaluate(&self, time: f32) -> T {
        match self {
            Self::Linear(keys) => match segment(keys, time) {
                Segment::Clamped(i) => keys[i].1,
                Segment::Between(i, u) => T::lerp(keys[i].1, keys[i + 1].1, u),
            },
            Self::Step(keys) => match segment(keys, time) {
                Segment::Clamped(i) | Segment::Between(i, _) => keys[i].1,
            },
            Self::CubicSpline(keys) => match segment(keys, time) {
                Segment::Clamped(i) => keys[i].1.value,
                Segment::Between(i, u) => {
                    let (t0, k0) = keys[i];
                    let (t1, k1) = keys[i + 1];
                    T::hermite(k0.value, k0.out_tangent, k1.value, k1.in_tangent, t1 - t0, u)
                }
            },
        }
    }
}

enum Segment {
    Clamped(usize),
    /// Keyframe `i` and `i + 1`, normalized position in between.
    Between(usize, f32),
}

/// Upper-bound search over keyframe times. `keys` is non-empty.
fn segment<K>(keys: &[(f32, K)], time: f32) -> Segment {
    let upper = keys.partition_point(|(t, _)| *t <= time);

    if upper == 0 {
        return Segment::Clamped(0);
    }
    if upper == keys.len() {
        return Segment::Clamped(keys.len() - 1);
    }

    let i = upper - 1;
    let (t0, t1) = (keys[i].0, keys[upper].0);
    Segment::Between(i, (time - t0) / (t1 - t0))
}
