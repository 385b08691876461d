//! Keyframe animation
//!
//! Samplers interpolate keyframes, channels bind a sampler to one node
//! property, and an [`Animation`] applies all its channels to a per-frame
//! [`TransformOverride`] array.

mod channel;
mod interpolation;
mod sampler;

pub use channel::{AnimationChannel, Channel};
pub use interpolation::AnimValue;
pub use sampler::{CubicKeyframe, Sampler};

use glam::{Quat, Vec3};

use crate::accessor::{Element, extract};
use crate::document::{ChannelDesc, Document, TargetPath};
use crate::error::{Result, ResultExt, SceneError};
use crate::node::TransformOverride;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: Option<String>,
    pub channels: Vec<AnimationChannel>,
}

impl Animation {
    /// Load animation `index`, validating channel targets against
    /// `node_count`. Morph target weight channels are skipped.
    pub fn load(doc: &Document, index: usize, node_count: usize) -> Result<Self> {
        let desc = doc
            .animations
            .get(index)
            .ok_or_else(|| SceneError::out_of_bounds("animation", index, doc.animations.len()))?;

        let mut channels = Vec::with_capacity(desc.channels.len());
        for (channel_index, channel) in desc.channels.iter().enumerate() {
            let loaded = load_channel(doc, index, channel, node_count)
                .with_context(|| format!("loading channel {}", channel_index))?;
            channels.extend(loaded);
        }

        Ok(Self {
            name: desc.name.clone(),
            channels,
        })
    }

    /// Sample every channel at `time`, in declaration order.
    pub fn apply(&self, overrides: &mut [TransformOverride], time: f32) {
        for channel in &self.channels {
            channel.apply(overrides, time);
        }
    }

    /// Largest keyframe time over all channels.
    pub fn duration(&self) -> f32 {
        self.channels
            .iter()
            .map(AnimationChannel::end_time)
            .fold(0.0, f32::max)
    }
}

fn load_channel(
    doc: &Document,
    animation: usize,
    channel: &ChannelDesc,
    node_count: usize,
) -> Result<Option<AnimationChannel>> {
    let samplers = &doc.animations[animation].samplers;
    let sampler = samplers
        .get(channel.sampler)
        .ok_or_else(|| SceneError::out_of_bounds("sampler", channel.sampler, samplers.len()))?;

    if channel.target_node >= node_count {
        return Err(SceneError::out_of_bounds(
            "node",
            channel.target_node,
            node_count,
        ));
    }

    fn sampler_of<T: AnimValue + Element>(
        doc: &Document,
        desc: &crate::document::SamplerDesc,
    ) -> Result<Sampler<T>> {
        let times = extract::<f32>(doc, desc.input).context("reading sampler input")?;
        let values = extract::<T>(doc, desc.output).context("reading sampler output")?;
        Sampler::from_raw(times, values, desc.interpolation)
    }

    let target = channel.target_node;
    Ok(Some(match channel.path {
        TargetPath::Translation => {
            AnimationChannel::Translation(Channel::new(target, sampler_of::<Vec3>(doc, sampler)?))
        }
        TargetPath::Rotation => {
            AnimationChannel::Rotation(Channel::new(target, sampler_of::<Quat>(doc, sampler)?))
        }
        TargetPath::Scale => {
            AnimationChannel::Scale(Channel::new(target, sampler_of::<Vec3>(doc, sampler)?))
        }
        TargetPath::MorphWeights => {
            tracing::warn!(
                "Skipping morph target weight channel on node {} (not supported)",
                target
            );
            return Ok(None);
        }
    }))
}

/// Selects an animation by position or by name.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationSelector {
    Index(usize),
    Name(String),
}

impl From<usize> for AnimationSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for AnimationSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

/// One animation to play this frame, and where in it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationKey {
    pub animation: AnimationSelector,
    pub time: f32,
}

impl AnimationKey {
    pub fn new(animation: impl Into<AnimationSelector>, time: f32) -> Self {
        Self {
            animation: animation.into(),
            time,
        }
    }
}

pub fn find_animation<'a>(
    animations: &'a [Animation],
    selector: &AnimationSelector,
) -> Result<&'a Animation> {
    match selector {
        AnimationSelector::Index(i) => animations
            .get(*i)
            .ok_or_else(|| SceneError::AnimationNotFound(format!("#{}", i))),
        AnimationSelector::Name(name) => animations
            .iter()
            .find(|a| a.name.as_deref() == Some(name.as_str()))
            .ok_or_else(|| SceneError::AnimationNotFound(name.clone())),
    }
}

/// Fresh override array for `node_count` nodes with every key applied in order.
pub fn evaluate(
    animations: &[Animation],
    keys: &[AnimationKey],
    node_count: usize,
) -> Result<Vec<TransformOverride>> {
    let mut overrides = vec![TransformOverride::default(); node_count];
    for key in keys {
        find_animation(animations, &key.animation)?.apply(&mut overrides, key.time);
    }
    Ok(overrides)
}
