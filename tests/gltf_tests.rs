//! glTF Loader Tests
//!
//! Tests for:
//! - Buffer resolution from base64 data URIs
//! - Skin → SkeletonHierarchy conversion (parent-first reordering)
//! - Animation channel decoding and per-frame resampling
//! - Full load → retarget → bake flow on a loaded asset

use base64::Engine;
use glam::{Quat, Vec3};
use serde_json::json;

use gltf_retarget::animation::TargetPath;
use gltf_retarget::assets::{AnimationParser, GltfAsset};
use gltf_retarget::config::SkeletalAnimationConfig;
use gltf_retarget::errors::RetargetError;
use gltf_retarget::retarget::{load_and_retarget_animation_by_name, NameMatchRetargeter, RetargeterSettings};

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn push_floats(buffer: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buffer.extend_from_slice(&v.to_le_bytes());
    }
}

/// Two-joint skin "Rig" (joints listed child first) and a "Walk" animation
/// moving Hips up and rotating Spine.
fn rig_gltf() -> Vec<u8> {
    rig_gltf_with_times([0.0, 1.0])
}

fn rig_gltf_with_times(times: [f32; 2]) -> Vec<u8> {
    let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
    let mut data = Vec::new();
    push_floats(&mut data, &times);
    push_floats(&mut data, &[0.0, 0.0, 1.0, 0.0, 0.0, 3.0]);
    push_floats(&mut data, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, half_sqrt2, half_sqrt2]);
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&data)
    );

    let doc = json!({
        "asset": { "version": "2.0" },
        "nodes": [
            { "name": "Armature", "children": [1] },
            { "name": "Hips", "translation": [0.0, 0.0, 1.0], "children": [2] },
            { "name": "Spine", "translation": [0.0, 1.0, 0.0] }
        ],
        "skins": [ { "name": "Rig", "joints": [2, 1] } ],
        "buffers": [ { "byteLength": data.len(), "uri": uri } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 32 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC4" }
        ],
        "animations": [ {
            "name": "Walk",
            "channels": [
                { "sampler": 0, "target": { "node": 1, "path": "translation" } },
                { "sampler": 1, "target": { "node": 2, "path": "rotation" } }
            ],
            "samplers": [
                { "input": 0, "output": 1, "interpolation": "LINEAR" },
                { "input": 0, "output": 2, "interpolation": "LINEAR" }
            ]
        } ]
    });
    serde_json::to_vec(&doc).unwrap()
}

fn load_rig() -> GltfAsset {
    GltfAsset::from_slice(&rig_gltf(), None).unwrap()
}

// ============================================================================
// Document
// ============================================================================

#[test]
fn lists_skins_and_animations() {
    let asset = load_rig();
    assert_eq!(asset.skin_names(), vec!["Rig".to_string()]);
    assert_eq!(asset.animation_names(), vec!["Walk".to_string()]);
}

#[test]
fn external_buffer_without_base_path_fails() {
    let doc = json!({
        "asset": { "version": "2.0" },
        "buffers": [ { "byteLength": 4, "uri": "rig.bin" } ]
    });
    let result = GltfAsset::from_slice(&serde_json::to_vec(&doc).unwrap(), None);
    assert!(matches!(result, Err(RetargetError::GltfError(_))));
}

// ============================================================================
// Skeletons
// ============================================================================

#[test]
fn skin_joints_reordered_parent_first() {
    let asset = load_rig();
    let skeleton = asset.skeleton("Rig").unwrap();

    assert_eq!(skeleton.name, "Rig");
    assert_eq!(skeleton.bone_names(), ["Hips".to_string(), "Spine".to_string()]);
    assert_eq!(skeleton.parent_index(0), None);
    assert_eq!(skeleton.parent_index(1), Some(0));
    assert!(vec3_approx(skeleton.reference_pose()[1].translation, Vec3::Y));

    let by_index = asset.skeleton_by_index(0).unwrap();
    assert_eq!(by_index.bone_names(), skeleton.bone_names());
}

#[test]
fn unknown_skin_is_missing_input() {
    let asset = load_rig();
    assert!(matches!(asset.skeleton("Nope"), Err(RetargetError::MissingInput(_))));
    assert!(asset.skeleton_by_index(3).is_err());
}

// ============================================================================
// Animations
// ============================================================================

#[test]
fn animation_resampled_into_bone_tracks() {
    let asset = load_rig();
    let config = SkeletalAnimationConfig {
        frames_per_second: 2.0,
        ..Default::default()
    };

    let parsed = asset
        .load_animation_by_name_as_tracks_and_morph_targets("walk", &config, false)
        .unwrap();

    assert!((parsed.duration - 1.0).abs() < EPSILON);
    assert_eq!(parsed.tracks.len(), 2);
    assert!(parsed.morph_curves.is_empty());

    let hips = parsed.tracks.get("Hips").unwrap();
    assert_eq!(hips.pos_keys.len(), 2);
    assert!(vec3_approx(hips.pos_keys[0], Vec3::new(0.0, 0.0, 1.0)));
    assert!(vec3_approx(hips.pos_keys[1], Vec3::new(0.0, 0.0, 2.0)));
    assert!(hips.rot_keys.is_empty());

    let spine = parsed.tracks.get("Spine").unwrap();
    let expected = Quat::IDENTITY.slerp(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), 0.5);
    assert!(spine.rot_keys[1].abs_diff_eq(expected, EPSILON));
}

#[test]
fn animation_lookup_respects_case_sensitivity() {
    let asset = load_rig();
    let config = SkeletalAnimationConfig::default();

    let result = asset.load_animation_by_name_as_tracks_and_morph_targets("walk", &config, true);
    assert!(matches!(result, Err(RetargetError::AnimationNotFound(ref name)) if name == "walk"));
    assert!(asset
        .load_animation_by_name_as_tracks_and_morph_targets("Walk", &config, true)
        .is_ok());
}

#[test]
fn loaded_clip_keeps_source_channels() {
    let asset = load_rig();
    let (clip, _) = asset.load_animation_clip("Walk", true).unwrap();
    assert_eq!(clip.tracks.len(), 2);
    assert!(clip.find_track("Hips", TargetPath::Translation).is_some());
    assert!(clip.find_track("Spine", TargetPath::Rotation).is_some());
}

#[test]
fn non_finite_keyframe_time_is_rejected() {
    let asset = GltfAsset::from_slice(&rig_gltf_with_times([0.0, f32::INFINITY]), None).unwrap();
    let rig = asset.skeleton("Rig").unwrap();

    assert!(matches!(asset.load_animation_clip("Walk", true), Err(RetargetError::GltfError(_))));

    let result = load_and_retarget_animation_by_name(
        &asset,
        "Walk",
        &rig,
        &rig,
        &mut NameMatchRetargeter::new(),
        &RetargeterSettings::default(),
        &SkeletalAnimationConfig::default(),
        true,
    );
    assert!(matches!(result, Err(RetargetError::GltfError(_))));
}

// ============================================================================
// Load → Retarget → Bake
// ============================================================================

#[test]
fn retarget_loaded_animation_onto_same_rig() {
    let asset = load_rig();
    let rig = asset.skeleton("Rig").unwrap();
    let mut solver = NameMatchRetargeter::new();
    let config = SkeletalAnimationConfig {
        frames_per_second: 4.0,
        ..Default::default()
    };

    let clip = load_and_retarget_animation_by_name(
        &asset,
        "Walk",
        &rig,
        &rig,
        &mut solver,
        &RetargeterSettings::default(),
        &config,
        true,
    )
    .unwrap();

    assert_eq!(clip.skeleton, "Rig");
    assert_eq!(clip.tracks.len(), 6);
    assert!(clip.find_track("Spine", TargetPath::Scale).is_some());
}
