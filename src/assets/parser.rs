//! Asset parser contract used by the retargeting pipeline.

use crate::animation::{bake_tracks, sanitize_bone_track, AnimationClip, BoneTrack, MorphCurves, TrackStore};
use crate::config::SkeletalAnimationConfig;
use crate::errors::Result;
use crate::skeleton::SkeletonHierarchy;

/// A clip decoded into per-frame bone tracks.
#[derive(Debug, Clone, Default)]
pub struct ParsedAnimation {
    pub tracks: TrackStore,
    pub morph_curves: MorphCurves,
    /// Seconds
    pub duration: f32,
}

/// Source of animation data.
///
/// Only loading is format specific; sanitation and baking default to the
/// crate's own implementations.
pub trait AnimationParser {
    /// Decodes the animation called `name` into per-frame tracks sampled at
    /// `config.frames_per_second`.
    ///
    /// Fails with `AnimationNotFound` when no animation matches.
    fn load_animation_by_name_as_tracks_and_morph_targets(
        &self,
        name: &str,
        config: &SkeletalAnimationConfig,
        case_sensitive: bool,
    ) -> Result<ParsedAnimation>;

    fn sanitize_bone_track(
        &self,
        hierarchy: &SkeletonHierarchy,
        bone_name: &str,
        frame_count: usize,
        track: &mut BoneTrack,
        config: &SkeletalAnimationConfig,
    ) -> Result<()> {
        sanitize_bone_track(hierarchy, bone_name, frame_count, track, config)
    }

    fn load_skeletal_animation_from_tracks_and_morph_targets(
        &self,
        name: &str,
        dest: &SkeletonHierarchy,
        tracks: &TrackStore,
        morph_curves: &MorphCurves,
        duration: f32,
        config: &SkeletalAnimationConfig,
    ) -> Result<AnimationClip> {
        bake_tracks(name, dest, tracks, morph_curves, duration, config)
    }
}
