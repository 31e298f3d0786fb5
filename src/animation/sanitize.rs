//! Track sanitation: bring parsed bone tracks to exactly `frame_count` keys
//! and reject tracks the skeleton cannot play.

use crate::animation::bone_track::{BoneTrack, TrackStore};
use crate::config::SkeletalAnimationConfig;
use crate::errors::{Result, RetargetError};
use crate::skeleton::SkeletonHierarchy;

/// Sanitizes one bone track in place.
///
/// - Fails if the bone is unknown to `hierarchy`, `frame_count` is 0, or any key
///   is non-finite.
/// - Empty key arrays are filled from the bone's reference pose.
/// - Short arrays are padded with their last key; long arrays are truncated.
/// - `remove_*` config flags replace the matching component with the reference pose.
/// - Rotations are normalized.
pub fn sanitize_bone_track(
    hierarchy: &SkeletonHierarchy,
    bone_name: &str,
    frame_count: usize,
    track: &mut BoneTrack,
    config: &SkeletalAnimationConfig,
) -> Result<()> {
    let Some(bone_index) = hierarchy.find_bone_index(bone_name) else {
        return Err(RetargetError::sanitation(
            bone_name,
            format!("bone not found in skeleton {}", hierarchy.name),
        ));
    };
    if frame_count == 0 {
        return Err(RetargetError::sanitation(bone_name, "frame count is zero"));
    }

    if track.pos_keys.iter().any(|v| !v.is_finite())
        || track.scale_keys.iter().any(|v| !v.is_finite())
        || track.rot_keys.iter().any(|q| !q.is_finite())
    {
        return Err(RetargetError::sanitation(bone_name, "track contains non-finite keys"));
    }
    if track.rot_keys.iter().any(|q| q.length_squared() <= f32::EPSILON) {
        return Err(RetargetError::sanitation(bone_name, "track contains a zero-length rotation"));
    }

    let reference = hierarchy
        .reference_transform(bone_index)
        .copied()
        .unwrap_or_default();

    if config.remove_translations {
        track.pos_keys.clear();
    }
    if config.remove_rotations {
        track.rot_keys.clear();
    }
    if config.remove_scales {
        track.scale_keys.clear();
    }

    fit_keys(&mut track.pos_keys, frame_count, reference.translation);
    fit_keys(&mut track.rot_keys, frame_count, reference.rotation);
    fit_keys(&mut track.scale_keys, frame_count, reference.scale);

    for rotation in &mut track.rot_keys {
        *rotation = rotation.normalize();
    }

    Ok(())
}

/// Sanitizes every track of `tracks` into a new store.
///
/// `tracks` is never modified; on the first failure nothing is returned.
pub fn sanitize_tracks(
    hierarchy: &SkeletonHierarchy,
    tracks: &TrackStore,
    frame_count: usize,
    config: &SkeletalAnimationConfig,
) -> Result<TrackStore> {
    sanitize_tracks_with(tracks, |bone_name, track| {
        sanitize_bone_track(hierarchy, bone_name, frame_count, track, config)
    })
}

/// Like [`sanitize_tracks`], with a caller-supplied per-track step.
///
/// Tracks are visited in sorted bone-name order.
pub fn sanitize_tracks_with<F>(tracks: &TrackStore, mut sanitize: F) -> Result<TrackStore>
where
    F: FnMut(&str, &mut BoneTrack) -> Result<()>,
{
    let mut sanitized = TrackStore::new();
    for bone_name in tracks.sorted_bone_names() {
        let Some(track) = tracks.get(bone_name) else {
            continue;
        };
        let mut track = track.clone();
        if let Err(err) = sanitize(bone_name, &mut track) {
            log::warn!("Unable to sanitize bone track {bone_name} for the retargeter");
            return Err(err);
        }
        sanitized.insert(bone_name, track);
    }
    Ok(sanitized)
}

fn fit_keys<T: Copy>(keys: &mut Vec<T>, frame_count: usize, fallback: T) {
    let fill = keys.last().copied().unwrap_or(fallback);
    keys.resize(frame_count, fill);
}
