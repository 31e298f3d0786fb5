//! Baking: per-frame bone tracks → [`AnimationClip`] for a destination skeleton.

use glam::Vec3;

use crate::animation::binding::TargetPath;
use crate::animation::bone_track::{MorphCurves, TrackStore};
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::config::SkeletalAnimationConfig;
use crate::errors::{Result, RetargetError};
use crate::skeleton::SkeletonHierarchy;

/// Bakes `tracks` into a clip with linear keys at `frame / fps`.
///
/// Bones are emitted in `dest` order; tracks for bones `dest` does not know are
/// dropped. Morph curves become weight tracks unless the config removes them.
pub fn bake_tracks(
    name: &str,
    dest: &SkeletonHierarchy,
    tracks: &TrackStore,
    morph_curves: &MorphCurves,
    duration: f32,
    config: &SkeletalAnimationConfig,
) -> Result<AnimationClip> {
    if dest.is_empty() {
        return Err(RetargetError::MissingInput("destination skeleton"));
    }

    let fps = config.sample_rate();
    let mut baked = Vec::with_capacity(tracks.len() * 3 + morph_curves.len());

    for bone_name in tracks.sorted_bone_names() {
        if dest.find_bone_index(bone_name).is_none() {
            log::warn!("Dropping track {bone_name}: bone not found in skeleton {}", dest.name);
        }
    }

    for (bone_index, bone_name) in dest.bone_names().iter().enumerate() {
        let Some(track) = tracks.get(bone_name) else {
            continue;
        };
        let frames = track.num_frames();
        if frames == 0 {
            continue;
        }
        let times: Vec<f32> = (0..frames).map(|f| f as f32 / fps).collect();

        let mut positions = track.pos_keys[..frames].to_vec();
        if config.remove_root_motion && dest.parent_index(bone_index).is_none() {
            let reference = dest
                .reference_transform(bone_index)
                .map_or(Vec3::ZERO, |t| t.translation);
            positions.fill(reference);
        }

        baked.push(Track {
            meta: TrackMeta {
                node_name: bone_name.clone(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(times.clone(), positions, InterpolationMode::Linear)),
        });
        baked.push(Track {
            meta: TrackMeta {
                node_name: bone_name.clone(),
                target: TargetPath::Rotation,
            },
            data: TrackData::Quaternion(KeyframeTrack::new(
                times.clone(),
                track.rot_keys[..frames].to_vec(),
                InterpolationMode::Linear,
            )),
        });
        baked.push(Track {
            meta: TrackMeta {
                node_name: bone_name.clone(),
                target: TargetPath::Scale,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                times,
                track.scale_keys[..frames].to_vec(),
                InterpolationMode::Linear,
            )),
        });
    }

    if !config.remove_morph_targets {
        let mut curve_names: Vec<&String> = morph_curves.keys().collect();
        curve_names.sort_unstable();
        for curve_name in curve_names {
            let keys = &morph_curves[curve_name];
            if keys.is_empty() {
                continue;
            }
            let (times, values): (Vec<f32>, Vec<f32>) = keys.iter().copied().unzip();
            baked.push(Track {
                meta: TrackMeta {
                    node_name: curve_name.clone(),
                    target: TargetPath::Weights,
                },
                data: TrackData::Scalar(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
            });
        }
    }

    log::debug!("Baked {} tracks for skeleton {}", baked.len(), dest.name);
    Ok(AnimationClip::with_duration(
        name.to_string(),
        dest.name.clone(),
        duration,
        baked,
    ))
}
