//! Animation channels: a sampler bound to one node property

use glam::{Quat, Vec3};

use super::interpolation::AnimValue;
use super::sampler::Sampler;
use crate::node::TransformOverride;

#[derive(Debug, Clone, PartialEq)]
pub struct Channel<T> {
    pub target_node: usize,
    pub sampler: Sampler<T>,
}

impl<T: AnimValue> Channel<T> {
    pub fn new(target_node: usize, sampler: Sampler<T>) -> Self {
        Self {
            target_node,
            sampler,
        }
    }

    fn sample_into(
        &self,
        overrides: &mut [TransformOverride],
        time: f32,
        field: impl FnOnce(&mut TransformOverride) -> &mut Option<T>,
    ) {
        // targets are validated at load
        if let Some(over) = overrides.get_mut(self.target_node) {
            *field(over) = Some(self.sampler.evaluate(time));
        }
    }
}

/// The closed set of channel kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationChannel {
    Translation(Channel<Vec3>),
    Rotation(Channel<Quat>),
    Scale(Channel<Vec3>),
}

impl AnimationChannel {
    pub fn target_node(&self) -> usize {
        match self {
            Self::Translation(c) | Self::Scale(c) => c.target_node,
            Self::Rotation(c) => c.target_node,
        }
    }

    pub fn end_time(&self) -> f32 {
        match self {
            Self::Translation(c) | Self::Scale(c) => c.sampler.end_time(),
            Self::Rotation(c) => c.sampler.end_time(),
        }
    }

    /// Write the sampled value into the target's override, replacing any
    /// value already set for that field.
    pub fn apply(&self, overrides: &mut [TransformOverride], time: f32) {
        match self {
            Self::Translation(c) => c.sample_into(overrides, time, |o| &mut o.translation),
            Self::Rotation(c) => c.sample_into(overrides, time, |o| &mut o.rotation),
            Self::Scale(c) => c.sample_into(overrides, time, |o| &mut o.scale),
        }
    }
}
