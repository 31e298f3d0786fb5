//! Pose composition and space conversion.
//!
//! - [`composer`]: local tracks / reference pose → component space, one bone at a time
//! - [`local_space`]: component-space pose → parent-relative pose

pub mod composer;
pub mod local_space;

pub use composer::{compose_component_pose, compose_reference_world_transform, compose_world_transform};
pub use local_space::to_local_pose;

use crate::skeleton::Transform;

/// One transform per bone, indexed like the skeleton it belongs to.
pub type ComponentPose = Vec<Transform>;
