mod values;
pub mod bake;
pub mod binding;
pub mod bone_track;
pub mod clip;
pub mod sanitize;
pub mod tracks;

pub use bake::bake_tracks;
pub use binding::TargetPath;
pub use bone_track::{BoneTrack, ClipTiming, MorphCurves, TrackStore};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use sanitize::{sanitize_bone_track, sanitize_tracks, sanitize_tracks_with};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
