use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::binding::TargetPath;
use crate::animation::bone_track::{BoneTrack, TrackStore};
use crate::animation::tracks::{KeyframeCursor, KeyframeTrack};
use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMeta {
    /// Bone name, or morph curve name for weight tracks
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    Scalar(KeyframeTrack<f32>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
            TrackData::Scalar(track) => track.end_time(),
        }
    }
}

/// A complete track: metadata plus keyframe data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    /// Skeleton the clip's bone tracks are authored for
    pub skeleton: String,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Builds a clip whose duration is the latest keyframe time of any track.
    #[must_use]
    pub fn new(name: String, skeleton: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            skeleton,
            tracks,
        }
    }

    /// Builds a clip with an explicit duration.
    #[must_use]
    pub fn with_duration(name: String, skeleton: String, duration: f32, tracks: Vec<Track>) -> Self {
        Self {
            name,
            duration,
            skeleton,
            tracks,
        }
    }

    #[must_use]
    pub fn find_track(&self, node_name: &str, target: TargetPath) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.meta.node_name == node_name && t.meta.target == target)
    }

    /// Samples every bone track at `frame / fps` for `frame in 0..frame_count`.
    ///
    /// Components a bone has no channel for are left empty, so sanitation can
    /// fill them from the reference pose. Weight tracks are ignored.
    #[must_use]
    pub fn to_bone_tracks(&self, frame_count: usize, fps: f32) -> TrackStore {
        let mut store = TrackStore::new();
        for track in &self.tracks {
            let target = track.meta.target;
            if target == TargetPath::Weights {
                continue;
            }
            let bone_name = track.meta.node_name.as_str();
            let mut bone_track = store.remove(bone_name).unwrap_or_default();

            let sampled = match (target, &track.data) {
                (TargetPath::Translation, TrackData::Vector3(keys)) => {
                    sample_frames(keys, frame_count, fps).map(|v| bone_track.pos_keys = v)
                }
                (TargetPath::Scale, TrackData::Vector3(keys)) => {
                    sample_frames(keys, frame_count, fps).map(|v| bone_track.scale_keys = v)
                }
                (TargetPath::Rotation, TrackData::Quaternion(keys)) => {
                    sample_frames(keys, frame_count, fps).map(|q| bone_track.rot_keys = q)
                }
                _ => None,
            };
            if sampled.is_none() {
                log::warn!("Skipping malformed {target:?} track for {bone_name}");
            }

            if bone_track != BoneTrack::default() {
                store.insert(bone_name, bone_track);
            }
        }
        store
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn sample_frames<T: Interpolatable>(track: &KeyframeTrack<T>, frame_count: usize, fps: f32) -> Option<Vec<T>> {
    let mut cursor = KeyframeCursor::default();
    (0..frame_count)
        .map(|frame| track.sample_with_cursor(frame as f32 / fps, &mut cursor))
        .collect()
}
