//! End-to-end flow: parse, sanitize, retarget, bake.

use crate::animation::{sanitize_tracks_with, AnimationClip, ClipTiming};
use crate::assets::parser::AnimationParser;
use crate::config::SkeletalAnimationConfig;
use crate::errors::{Result, RetargetError};
use crate::retarget::driver::RetargetDriver;
use crate::retarget::solver::{Retargeter, RetargeterSettings};
use crate::skeleton::SkeletonHierarchy;

/// Loads the animation `name` from `parser`, retargets it from `source` onto
/// `dest` with `solver` and bakes the result for `dest`.
///
/// Nothing is baked unless every step succeeds.
pub fn load_and_retarget_animation_by_name<P, R>(
    parser: &P,
    name: &str,
    source: &SkeletonHierarchy,
    dest: &SkeletonHierarchy,
    solver: &mut R,
    settings: &RetargeterSettings,
    config: &SkeletalAnimationConfig,
    case_sensitive: bool,
) -> Result<AnimationClip>
where
    P: AnimationParser + ?Sized,
    R: Retargeter + ?Sized,
{
    if source.is_empty() {
        return Err(RetargetError::MissingInput("source skeleton"));
    }
    if dest.is_empty() {
        return Err(RetargetError::MissingInput("destination skeleton"));
    }

    let parsed = parser.load_animation_by_name_as_tracks_and_morph_targets(name, config, case_sensitive)?;
    let timing = ClipTiming::from_duration(parsed.duration, config.sample_rate())?;

    let sanitized = sanitize_tracks_with(&parsed.tracks, |bone_name, track| {
        parser.sanitize_bone_track(source, bone_name, timing.frame_count, track, config)
    })?;

    let mut driver = RetargetDriver::initialize(source, dest, solver, settings)?;
    let retargeted = driver.run(sanitized, timing);

    parser.load_skeletal_animation_from_tracks_and_morph_targets(
        name,
        dest,
        &retargeted,
        &parsed.morph_curves,
        parsed.duration,
        config,
    )
}
