//! Animation Data Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation
//! - Interpolatable trait implementations (f32, Vec3, Quat)
//! - KeyframeCursor sequential access and binary search fallback
//! - AnimationClip duration and per-frame resampling into bone tracks
//! - Baking bone tracks into a clip for a destination skeleton

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};

use gltf_retarget::animation::{
    bake_tracks, AnimationClip, BoneTrack, InterpolationMode, Interpolatable, KeyframeCursor, KeyframeTrack,
    MorphCurves, TargetPath, Track, TrackData, TrackMeta, TrackStore,
};
use gltf_retarget::config::SkeletalAnimationConfig;
use gltf_retarget::errors::RetargetError;
use gltf_retarget::skeleton::{BoneDef, SkeletonHierarchy, Transform};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn sample_at(track: &KeyframeTrack<f32>, time: f32, cursor: &mut KeyframeCursor) -> f32 {
    track.sample_with_cursor(time, cursor).expect("well-formed track")
}

// ============================================================================
// KeyframeTrack: Linear Interpolation (f32)
// ============================================================================

#[test]
fn track_linear_f32_midpoint() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    let val = sample_at(&track, 0.5, &mut cursor);
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn track_linear_f32_exact_keyframe() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 10.0, 20.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_at(&track, 0.0, &mut cursor), 0.0));
    assert!(approx(sample_at(&track, 1.0, &mut cursor), 10.0));
    assert!(approx(sample_at(&track, 2.0, &mut cursor), 20.0));
}

#[test]
fn track_linear_f32_clamps_outside_range() {
    let track = KeyframeTrack::new(vec![1.0, 2.0], vec![10.0_f32, 20.0], InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_at(&track, 0.5, &mut cursor), 10.0));
    assert!(approx(sample_at(&track, 5.0, &mut cursor), 20.0));
}

#[test]
fn track_empty_or_malformed_samples_none() {
    let empty: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    assert!(empty.sample(0.0).is_none());

    // CubicSpline needs three values per key
    let malformed = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 1.0], InterpolationMode::CubicSpline);
    assert!(!malformed.is_well_formed());
    let mut cursor = KeyframeCursor::default();
    assert!(malformed.sample_with_cursor(0.5, &mut cursor).is_none());
}

// ============================================================================
// KeyframeTrack: Step / Vec3 / Quat
// ============================================================================

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 100.0, 200.0],
        InterpolationMode::Step,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_at(&track, 0.5, &mut cursor), 0.0));
    assert!(approx(sample_at(&track, 0.99, &mut cursor), 0.0));
    assert!(approx(sample_at(&track, 1.0, &mut cursor), 100.0));
    assert!(approx(sample_at(&track, 1.5, &mut cursor), 100.0));
}

#[test]
fn track_linear_vec3() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 20.0, 30.0)],
        InterpolationMode::Linear,
    );

    let val = track.sample(0.5).unwrap();
    assert!(vec3_approx(val, Vec3::new(5.0, 10.0, 15.0)));
}

#[test]
fn track_linear_quat_slerp() {
    let q0 = Quat::IDENTITY;
    let q1 = Quat::from_rotation_y(PI);

    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![q0, q1], InterpolationMode::Linear);

    let val = track.sample(0.5).unwrap();
    let angle = val.angle_between(q0.slerp(q1, 0.5));
    assert!(angle < 0.01, "Quaternion slerp mismatch: angle={angle}");
}

// ============================================================================
// KeyframeTrack: Cubic Spline Interpolation
// ============================================================================

#[test]
fn track_cubic_f32_endpoints() {
    // values = [in_tangent0, value0, out_tangent0, in_tangent1, value1, out_tangent1]
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 1.0, 1.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    let mut cursor = KeyframeCursor::default();
    let v0 = sample_at(&track, 0.0, &mut cursor);
    assert!(approx(v0, 0.0), "got {v0}");
    let v1 = sample_at(&track, 1.0, &mut cursor);
    assert!(approx(v1, 10.0), "got {v1}");
}

#[test]
fn track_cubic_f32_smooth_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 0.0, 0.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    // zero tangents: hermite midpoint is the plain average
    let val = track.sample(0.5).unwrap();
    assert!((val - 5.0).abs() < 1.0, "Cubic midpoint expected ~5.0, got {val}");
}

// ============================================================================
// KeyframeCursor
// ============================================================================

#[test]
fn sample_matches_cursor_across_all_times() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![0.0_f32, 10.0, 5.0, 20.0, 15.0],
        InterpolationMode::Linear,
    );
    let mut cursor = KeyframeCursor::default();
    for i in 0..=40 {
        let t = i as f32 * 0.1;
        let val_cursor = sample_at(&track, t, &mut cursor);
        let val_sample = track.sample(t).unwrap();
        assert!(
            approx(val_sample, val_cursor),
            "t={t}: sample()={val_sample} != sample_with_cursor()={val_cursor}"
        );
    }
}

#[test]
fn cursor_forward_then_jump_back() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![0.0_f32, 10.0, 20.0, 30.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_at(&track, 2.5, &mut cursor), 25.0));
    assert_eq!(cursor.last_index, 2);

    assert!(approx(sample_at(&track, 0.5, &mut cursor), 5.0));
    assert_eq!(cursor.last_index, 0);
}

#[test]
fn cursor_single_keyframe() {
    let track = KeyframeTrack::new(vec![0.0], vec![42.0_f32], InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    assert!(approx(sample_at(&track, 5.0, &mut cursor), 42.0));
}

// ============================================================================
// Interpolatable Implementations
// ============================================================================

#[test]
fn interpolatable_f32_linear() {
    assert!(approx(f32::interpolate_linear(0.0, 10.0, 0.25), 2.5));
}

#[test]
fn interpolatable_quat_linear_is_slerp() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_y(FRAC_PI_2);
    let result = Quat::interpolate_linear(a, b, 0.5);

    let angle = result.angle_between(a.slerp(b, 0.5));
    assert!(angle < 0.01, "Slerp mismatch: angle={angle}");
}

// ============================================================================
// AnimationClip
// ============================================================================

fn translation_track(node: &str, times: Vec<f32>, values: Vec<Vec3>) -> Track {
    Track {
        meta: TrackMeta {
            node_name: node.to_string(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

fn rotation_track(node: &str, times: Vec<f32>, values: Vec<Quat>) -> Track {
    Track {
        meta: TrackMeta {
            node_name: node.to_string(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

#[test]
fn clip_auto_duration() {
    let clip = AnimationClip::new(
        "test".to_string(),
        String::new(),
        vec![
            translation_track("a", vec![0.0, 1.5], vec![Vec3::ZERO, Vec3::X]),
            rotation_track("b", vec![0.0, 3.0], vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)]),
        ],
    );

    assert!(approx(clip.duration, 3.0), "got {}", clip.duration);
    assert!(clip.find_track("b", TargetPath::Rotation).is_some());
    assert!(clip.find_track("b", TargetPath::Translation).is_none());
}

#[test]
fn clip_empty_tracks_zero_duration() {
    let clip = AnimationClip::new("empty".to_string(), String::new(), vec![]);
    assert!(approx(clip.duration, 0.0));
}

#[test]
fn clip_to_bone_tracks_samples_each_frame() {
    let clip = AnimationClip::new(
        "walk".to_string(),
        String::new(),
        vec![
            translation_track("hips", vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)]),
            rotation_track("spine", vec![0.0], vec![Quat::from_rotation_x(0.5)]),
        ],
    );

    let store = clip.to_bone_tracks(5, 4.0);
    assert_eq!(store.len(), 2);

    let hips = store.get("hips").unwrap();
    assert_eq!(hips.pos_keys.len(), 5);
    assert!(vec3_approx(hips.pos_keys[2], Vec3::new(0.0, 0.0, 2.0)));
    assert!(vec3_approx(hips.pos_keys[4], Vec3::new(0.0, 0.0, 4.0)));
    // no channel: left for sanitation to fill
    assert!(hips.rot_keys.is_empty());
    assert!(hips.scale_keys.is_empty());

    let spine = store.get("spine").unwrap();
    assert_eq!(spine.rot_keys.len(), 5);
    assert!(spine.pos_keys.is_empty());
}

#[test]
fn clip_json_roundtrip_keeps_tracks() {
    let clip = AnimationClip::new(
        "idle".to_string(),
        "rig".to_string(),
        vec![translation_track("root", vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::Y])],
    );
    let json = clip.to_json().unwrap();
    let back = AnimationClip::from_json(&json).unwrap();
    assert_eq!(back.name, "idle");
    assert_eq!(back.skeleton, "rig");
    assert_eq!(back.tracks.len(), 1);
    assert!(approx(back.duration, 1.0));
}

// ============================================================================
// Baking
// ============================================================================

fn two_bone_rig() -> SkeletonHierarchy {
    SkeletonHierarchy::new(
        "rig",
        vec![
            BoneDef::new("root", None, Transform::from_translation(Vec3::new(0.0, 0.0, 1.0))),
            BoneDef::new("spine", Some(0), Transform::from_translation(Vec3::Y)),
        ],
    )
    .unwrap()
}

#[test]
fn bake_emits_trs_tracks_in_dest_order() {
    let rig = two_bone_rig();
    let mut tracks = TrackStore::new();
    tracks.insert("spine", BoneTrack::constant(&Transform::from_translation(Vec3::Y), 3));
    tracks.insert("root", BoneTrack::constant(&Transform::IDENTITY, 3));
    tracks.insert("tail", BoneTrack::constant(&Transform::IDENTITY, 3));

    let config = SkeletalAnimationConfig::default();
    let clip = bake_tracks("baked", &rig, &tracks, &MorphCurves::default(), 0.1, &config).unwrap();

    assert_eq!(clip.skeleton, "rig");
    assert!(approx(clip.duration, 0.1));
    // unknown bone "tail" dropped
    assert_eq!(clip.tracks.len(), 6);
    assert_eq!(clip.tracks[0].meta.node_name, "root");
    assert_eq!(clip.tracks[3].meta.node_name, "spine");

    let TrackData::Vector3(positions) = &clip.find_track("spine", TargetPath::Translation).unwrap().data else {
        panic!("translation track should hold Vec3 keys");
    };
    assert_eq!(positions.times.len(), 3);
    assert!(approx(positions.times[2], 2.0 / 30.0));
    assert_eq!(positions.interpolation, InterpolationMode::Linear);
}

#[test]
fn bake_remove_root_motion_pins_root_to_reference() {
    let rig = two_bone_rig();
    let mut tracks = TrackStore::new();
    tracks.insert(
        "root",
        BoneTrack::new(
            vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)],
            vec![Quat::IDENTITY; 2],
            vec![Vec3::ONE; 2],
        ),
    );

    let config = SkeletalAnimationConfig {
        remove_root_motion: true,
        ..Default::default()
    };
    let clip = bake_tracks("baked", &rig, &tracks, &MorphCurves::default(), 0.1, &config).unwrap();

    let TrackData::Vector3(positions) = &clip.find_track("root", TargetPath::Translation).unwrap().data else {
        panic!("translation track should hold Vec3 keys");
    };
    for value in &positions.values {
        assert!(vec3_approx(*value, Vec3::new(0.0, 0.0, 1.0)));
    }
}

#[test]
fn bake_morph_curves_follow_config() {
    let rig = two_bone_rig();
    let mut curves = MorphCurves::default();
    curves.insert("Face_0".to_string(), vec![(0.0, 0.0), (1.0, 1.0)]);

    let clip = bake_tracks("baked", &rig, &TrackStore::new(), &curves, 1.0, &SkeletalAnimationConfig::default()).unwrap();
    assert!(clip.find_track("Face_0", TargetPath::Weights).is_some());

    let config = SkeletalAnimationConfig {
        remove_morph_targets: true,
        ..Default::default()
    };
    let clip = bake_tracks("baked", &rig, &TrackStore::new(), &curves, 1.0, &config).unwrap();
    assert!(clip.tracks.is_empty());
}

#[test]
fn bake_rejects_empty_destination() {
    let empty = SkeletonHierarchy::default();
    let result = bake_tracks(
        "baked",
        &empty,
        &TrackStore::new(),
        &MorphCurves::default(),
        1.0,
        &SkeletalAnimationConfig::default(),
    );
    assert!(matches!(result, Err(RetargetError::MissingInput(_))));
}
