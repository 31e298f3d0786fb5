//! Skeleton hierarchy and bone transforms.
//!
//! A [`SkeletonHierarchy`] is an ordered bone list where every bone's parent
//! comes before the bone itself. That ordering is validated on construction,
//! so every ancestor walk terminates and a single forward pass over the bones
//! always sees parents before children.

pub mod transform;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RetargetError};
pub use transform::Transform;

/// Per-bone definition used to build a hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneDef {
    pub name: String,
    pub parent: Option<usize>,
    /// Reference (bind) pose, relative to the parent bone
    pub reference: Transform,
}

impl BoneDef {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>, reference: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            reference,
        }
    }
}

/// Read-only view over a skeleton: bone names, parent links and reference pose.
#[derive(Debug, Clone, Default)]
pub struct SkeletonHierarchy {
    pub name: String,
    bone_names: Vec<String>,
    parent_indices: Vec<Option<usize>>,
    reference_pose: Vec<Transform>,
    name_to_index: FxHashMap<String, usize>,
}

impl SkeletonHierarchy {
    /// Builds a hierarchy, rejecting any bone whose parent index is not
    /// strictly lower than its own.
    ///
    /// If a bone name appears more than once, lookups by name resolve to the
    /// first occurrence.
    pub fn new(name: &str, bones: Vec<BoneDef>) -> Result<Self> {
        let mut bone_names = Vec::with_capacity(bones.len());
        let mut parent_indices = Vec::with_capacity(bones.len());
        let mut reference_pose = Vec::with_capacity(bones.len());
        let mut name_to_index = FxHashMap::default();

        for (index, bone) in bones.into_iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= index {
                    return Err(RetargetError::InvalidHierarchy {
                        bone: bone.name,
                        index,
                        parent,
                    });
                }
            }

            name_to_index.entry(bone.name.clone()).or_insert(index);
            bone_names.push(bone.name);
            parent_indices.push(bone.parent);
            reference_pose.push(bone.reference);
        }

        Ok(Self {
            name: name.to_string(),
            bone_names,
            parent_indices,
            reference_pose,
            name_to_index,
        })
    }

    #[inline]
    #[must_use]
    pub fn num_bones(&self) -> usize {
        self.bone_names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bone_names.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn bone_names(&self) -> &[String] {
        &self.bone_names
    }

    #[inline]
    #[must_use]
    pub fn bone_name(&self, index: usize) -> Option<&str> {
        self.bone_names.get(index).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn find_bone_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.parent_indices.get(index).copied().flatten()
    }

    /// Reference pose, relative to each bone's parent.
    #[inline]
    #[must_use]
    pub fn reference_pose(&self) -> &[Transform] {
        &self.reference_pose
    }

    #[inline]
    #[must_use]
    pub fn reference_transform(&self, index: usize) -> Option<&Transform> {
        self.reference_pose.get(index)
    }

    /// Name of the first bone, which is always a root.
    #[must_use]
    pub fn root_bone_name(&self) -> Option<&str> {
        self.bone_name(0)
    }

    /// Iterates from `index` up to its root, `index` included.
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let start = (index < self.num_bones()).then_some(index);
        std::iter::successors(start, move |&current| self.parent_index(current))
    }

    /// Reference pose in component space.
    #[must_use]
    pub fn reference_component_pose(&self) -> Vec<Transform> {
        let mut pose: Vec<Transform> = Vec::with_capacity(self.num_bones());
        for (index, local) in self.reference_pose.iter().enumerate() {
            let world = match self.parent_index(index) {
                Some(parent) => pose[parent].mul_transform(local),
                None => *local,
            };
            pose.push(world);
        }
        pose
    }
}
