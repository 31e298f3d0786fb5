//! Local-Space Converter

use crate::pose::ComponentPose;
use crate::skeleton::{SkeletonHierarchy, Transform};

/// Converts a component-space pose to parent-relative transforms.
///
/// Output has the same length and order as `component_pose`. Parentless bones
/// keep their component transform. Only `component_pose` is read, so
/// processing order does not matter. A bone whose parent index falls outside
/// the pose is treated as parentless.
#[must_use]
pub fn to_local_pose(hierarchy: &SkeletonHierarchy, component_pose: &[Transform]) -> ComponentPose {
    component_pose
        .iter()
        .enumerate()
        .map(|(index, component)| {
            match hierarchy.parent_index(index).and_then(|parent| component_pose.get(parent)) {
                Some(parent) => component.relative_to(parent),
                None => *component,
            }
        })
        .collect()
}
