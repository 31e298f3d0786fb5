#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod errors;
pub mod pose;
pub mod retarget;
pub mod skeleton;

pub use animation::{AnimationClip, BoneTrack, ClipTiming, MorphCurves, TrackStore};
pub use assets::{AnimationParser, GltfAsset, ParsedAnimation};
pub use config::{RetargetConfig, SkeletalAnimationConfig};
pub use errors::{Result, RetargetError};
pub use pose::{compose_world_transform, to_local_pose, ComponentPose};
pub use retarget::{
    load_and_retarget_animation_by_name, retarget_animation, NameMatchRetargeter, RetargetDriver, Retargeter,
    RetargeterSettings,
};
pub use skeleton::{BoneDef, SkeletonHierarchy, Transform};
