//! Skins and joint matrices
//!
//! All skins share one contiguous storage; each [`Skin`] is an `(offset, len)`
//! range into it. Joint matrices come out in the same layout, so a skin's
//! matrices start at its `offset`.

use glam::Mat4;

use crate::accessor::extract;
use crate::document::Document;
use crate::error::{Result, ResultExt, SceneError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skin {
    pub offset: usize,
    pub len: usize,
}

/// Borrowed view of one skin's joints and inverse bind matrices.
#[derive(Debug, Clone, Copy)]
pub struct SkinRef<'a> {
    pub joints: &'a [usize],
    pub inverse_bind_matrices: &'a [Mat4],
}

impl SkinRef<'_> {
    /// `world[joint[i]] * inverse_bind[i]` for each joint.
    pub fn compute_joint_matrices(&self, world: &[Mat4]) -> Vec<Mat4> {
        self.joints
            .iter()
            .zip(self.inverse_bind_matrices)
            .map(|(&joint, ibm)| world[joint] * *ibm)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinList {
    pub skins: Vec<Skin>,
    joints: Vec<usize>,
    inverse_bind_matrices: Vec<Mat4>,
}

impl SkinList {
    /// Load every skin in the document. Joint indices are validated against
    /// `node_count`.
    pub fn load(doc: &Document, node_count: usize) -> Result<Self> {
        let mut list = Self::default();
        for index in 0..doc.skins.len() {
            list.load_skin(doc, index, node_count)
                .with_context(|| format!("loading skin {}", index))?;
        }
        Ok(list)
    }

    fn load_skin(&mut self, doc: &Document, index: usize, node_count: usize) -> Result<()> {
        let desc = &doc.skins[index];
        let joint_count = desc.joints.len();

        if let Some(&bad) = desc.joints.iter().find(|&&j| j >= node_count) {
            return Err(SceneError::out_of_bounds("node", bad, node_count));
        }

        let matrices = match desc.inverse_bind_matrices {
            Some(accessor) => {
                let mut matrices = extract::<Mat4>(doc, accessor)?;
                if matrices.len() < joint_count {
                    return Err(SceneError::MissingInverseBindMatrices {
                        skin: index,
                        matrices: matrices.len(),
                        joints: joint_count,
                    });
                }
                if matrices.len() > joint_count {
                    tracing::warn!(
                        "Skin {} has {} inverse bind matrices for {} joints, ignoring the rest",
                        index,
                        matrices.len(),
                        joint_count
                    );
                    matrices.truncate(joint_count);
                }
                matrices
            }
            None => vec![Mat4::IDENTITY; joint_count],
        };

        self.skins.push(Skin {
            offset: self.joints.len(),
            len: joint_count,
        });
        self.joints.extend_from_slice(&desc.joints);
        self.inverse_bind_matrices.extend(matrices);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.skins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SkinRef<'_>> {
        let skin = self.skins.get(index)?;
        let range = skin.offset..skin.offset + skin.len;
        Some(SkinRef {
            joints: &self.joints[range.clone()],
            inverse_bind_matrices: &self.inverse_bind_matrices[range],
        })
    }

    pub fn total_joints(&self) -> usize {
        self.joints.len()
    }

    /// Joint matrices for every skin, index-parallel to the shared storage.
    pub fn compute_joint_matrices(&self, world: &[Mat4]) -> Vec<Mat4> {
        self.joints
            .iter()
            .zip(&self.inverse_bind_matrices)
            .map(|(&joint, ibm)| world[joint] * *ibm)
            .collect()
    }
}
