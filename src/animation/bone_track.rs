//! Per-frame bone tracks.
//!
//! Unlike [`KeyframeTrack`](crate::animation::KeyframeTrack), which stores
//! arbitrary keyframe times, a [`BoneTrack`] holds exactly one sample per frame
//! of a uniformly sampled clip. This is the representation the retargeting
//! pipeline reads and rewrites in place.

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RetargetError};
use crate::skeleton::Transform;

/// Position, rotation and scale keys of one bone, one entry per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneTrack {
    pub pos_keys: Vec<Vec3>,
    pub rot_keys: Vec<Quat>,
    pub scale_keys: Vec<Vec3>,
}

impl BoneTrack {
    #[must_use]
    pub fn new(pos_keys: Vec<Vec3>, rot_keys: Vec<Quat>, scale_keys: Vec<Vec3>) -> Self {
        Self {
            pos_keys,
            rot_keys,
            scale_keys,
        }
    }

    /// A track holding `transform` for `frame_count` frames.
    #[must_use]
    pub fn constant(transform: &Transform, frame_count: usize) -> Self {
        Self {
            pos_keys: vec![transform.translation; frame_count],
            rot_keys: vec![transform.rotation; frame_count],
            scale_keys: vec![transform.scale; frame_count],
        }
    }

    /// Number of frames for which every key array has a sample.
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.pos_keys
            .len()
            .min(self.rot_keys.len())
            .min(self.scale_keys.len())
    }

    #[inline]
    #[must_use]
    pub fn has_frame(&self, frame: usize) -> bool {
        frame < self.num_frames()
    }

    /// Animated local transform at `frame`: translation and rotation only, unit scale.
    #[must_use]
    pub fn local_transform(&self, frame: usize) -> Option<Transform> {
        let translation = *self.pos_keys.get(frame)?;
        let rotation = *self.rot_keys.get(frame)?;
        Some(Transform::from_translation_rotation(translation, rotation))
    }
}

/// Morph target curves: curve name to `(time, weight)` keys.
pub type MorphCurves = FxHashMap<String, Vec<(f32, f32)>>;

/// Bone name to per-frame track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackStore {
    tracks: FxHashMap<String, BoneTrack>,
}

impl TrackStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bone: impl Into<String>, track: BoneTrack) -> Option<BoneTrack> {
        self.tracks.insert(bone.into(), track)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, bone: &str) -> Option<&BoneTrack> {
        self.tracks.get(bone)
    }

    #[inline]
    pub fn get_mut(&mut self, bone: &str) -> Option<&mut BoneTrack> {
        self.tracks.get_mut(bone)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, bone: &str) -> bool {
        self.tracks.contains_key(bone)
    }

    pub fn remove(&mut self, bone: &str) -> Option<BoneTrack> {
        self.tracks.remove(bone)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BoneTrack)> {
        self.tracks.iter()
    }

    /// Bone names in sorted order, for deterministic processing.
    #[must_use]
    pub fn sorted_bone_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tracks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<(String, BoneTrack)> for TrackStore {
    fn from_iter<I: IntoIterator<Item = (String, BoneTrack)>>(iter: I) -> Self {
        Self {
            tracks: iter.into_iter().collect(),
        }
    }
}

/// Frame count and duration of a uniformly sampled clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTiming {
    pub frame_count: usize,
    /// Clip duration in seconds
    pub duration: f32,
}

impl ClipTiming {
    /// `max(trunc(duration * fps), 1)` frames.
    ///
    /// # Errors
    /// Returns [`RetargetError::InvalidDuration`] for a negative duration or
    /// when `duration * fps` is not finite.
    pub fn from_duration(duration: f32, frames_per_second: f32) -> Result<Self> {
        let frames = duration * frames_per_second;
        if duration < 0.0 || !frames.is_finite() {
            return Err(RetargetError::InvalidDuration(duration));
        }
        Ok(Self {
            frame_count: (frames.max(0.0) as usize).max(1),
            duration,
        })
    }
}
