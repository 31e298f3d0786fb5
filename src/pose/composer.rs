//! Pose Composer
//!
//! Walks a bone's ancestor chain and composes local transforms into a
//! component-space transform. Costs O(depth) per call.

use crate::animation::TrackStore;
use crate::pose::ComponentPose;
use crate::skeleton::{SkeletonHierarchy, Transform};

/// Component-space transform of `bone_index` at `frame`.
///
/// Bones with a track contribute that frame's translation and rotation (unit
/// scale, animated scale is not an input here). Bones without a track, or whose
/// track has no key at `frame`, contribute their reference-pose local.
#[must_use]
pub fn compose_world_transform(
    hierarchy: &SkeletonHierarchy,
    tracks: &TrackStore,
    bone_index: usize,
    frame: usize,
) -> Transform {
    let mut current = Transform::IDENTITY;
    for index in hierarchy.ancestors(bone_index) {
        let animated = hierarchy
            .bone_name(index)
            .and_then(|name| tracks.get(name))
            .and_then(|track| track.local_transform(frame));
        let local = match animated {
            Some(local) => local,
            None => reference_local(hierarchy, index),
        };
        // child first, then outward
        current = local.mul_transform(&current);
    }
    current
}

/// Component-space reference transform of `bone_index`, scale forced to one.
///
/// Ignores tracks entirely, so the result does not depend on the frame.
#[must_use]
pub fn compose_reference_world_transform(hierarchy: &SkeletonHierarchy, bone_index: usize) -> Transform {
    hierarchy
        .ancestors(bone_index)
        .fold(Transform::IDENTITY, |current, index| {
            reference_local(hierarchy, index).mul_transform(&current)
        })
        .with_scale(glam::Vec3::ONE)
}

/// Full component-space pose of `hierarchy` at `frame`.
///
/// Bones named in `tracks` take the animated path, all others the reference path.
#[must_use]
pub fn compose_component_pose(hierarchy: &SkeletonHierarchy, tracks: &TrackStore, frame: usize) -> ComponentPose {
    hierarchy
        .bone_names()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if tracks.contains(name) {
                compose_world_transform(hierarchy, tracks, index, frame)
            } else {
                compose_reference_world_transform(hierarchy, index)
            }
        })
        .collect()
}

#[inline]
fn reference_local(hierarchy: &SkeletonHierarchy, index: usize) -> Transform {
    hierarchy.reference_transform(index).copied().unwrap_or_default()
}
