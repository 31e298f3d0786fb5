//! Retarget Driver
//!
//! Orchestrates the frame loop:
//!
//! 1. compose the source component-space pose from tracks and reference pose
//! 2. refresh solver settings and profile from the asset
//! 3. run the solver
//! 4. convert the target pose to local space
//! 5. write position, rotation and scale keys back into the track store
//!
//! Frames run strictly in order. The solver's planting state is reset once,
//! before frame 0, and never again during the loop.

use glam::Vec3;

use crate::animation::{sanitize_tracks, ClipTiming, TrackStore};
use crate::config::SkeletalAnimationConfig;
use crate::errors::{Result, RetargetError};
use crate::pose::{compose_reference_world_transform, compose_world_transform, to_local_pose, ComponentPose};
use crate::retarget::solver::{RetargetSide, Retargeter, RetargeterSettings};
use crate::skeleton::{SkeletonHierarchy, Transform};

/// Where a target bone's local transform is written and what overrides apply.
#[derive(Debug, Clone)]
struct WriteBackSlot {
    bone_name: String,
    target_index: usize,
    /// Matching bone in the destination skeleton
    dest_index: Option<usize>,
    /// Bone carries the source root's name: translation replaced by the destination height
    is_source_root: bool,
}

/// Drives an initialized [`Retargeter`] over a whole clip.
pub struct RetargetDriver<'a, R: Retargeter + ?Sized> {
    source: &'a SkeletonHierarchy,
    dest: &'a SkeletonHierarchy,
    solver: &'a mut R,
    settings: &'a RetargeterSettings,
    /// Solver source bones, resolved against `source`
    source_bones: Vec<(String, Option<usize>)>,
    write_back: Vec<WriteBackSlot>,
}

impl<'a, R: Retargeter + ?Sized> RetargetDriver<'a, R> {
    /// Validates inputs and initializes `solver`.
    ///
    /// Fails with `MissingInput` for empty skeletons and `SolverInitFailed` when
    /// the solver does not come up.
    pub fn initialize(
        source: &'a SkeletonHierarchy,
        dest: &'a SkeletonHierarchy,
        solver: &'a mut R,
        settings: &'a RetargeterSettings,
    ) -> Result<Self> {
        if source.is_empty() {
            return Err(RetargetError::MissingInput("source skeleton"));
        }
        if dest.is_empty() {
            return Err(RetargetError::MissingInput("destination skeleton"));
        }

        let profile = settings.profile();
        if let Err(err) = solver.initialize(source, dest, settings, &profile) {
            log::warn!("Unable to initialize the retargeter: {err}");
            return Err(match err {
                RetargetError::SolverInitFailed(_) => err,
                other => RetargetError::SolverInitFailed(other.to_string()),
            });
        }
        if !solver.is_initialized() {
            log::warn!("Unable to initialize the retargeter");
            return Err(RetargetError::SolverInitFailed(
                "solver reported not initialized".to_string(),
            ));
        }

        let solver_source = solver.skeleton(RetargetSide::Source);
        let source_bones = solver_source
            .bone_names()
            .iter()
            .map(|name| (name.clone(), source.find_bone_index(name)))
            .collect();
        let source_root = solver_source.root_bone_name().map(str::to_string);

        let write_back = solver
            .skeleton(RetargetSide::Target)
            .bone_names()
            .iter()
            .enumerate()
            .map(|(target_index, name)| {
                let dest_index = dest.find_bone_index(name);
                if dest_index.is_none() {
                    log::warn!("Target bone {name} not found in destination skeleton {}", dest.name);
                }
                WriteBackSlot {
                    bone_name: name.clone(),
                    target_index,
                    dest_index,
                    is_source_root: source_root.as_deref() == Some(name.as_str()),
                }
            })
            .collect();

        Ok(Self {
            source,
            dest,
            solver,
            settings,
            source_bones,
            write_back,
        })
    }

    /// Retargets every frame of `tracks` and returns the rewritten store.
    ///
    /// `tracks` must already be sanitized to `timing.frame_count` keys; shorter
    /// tracks are skipped for the frames they lack.
    pub fn run(&mut self, mut tracks: TrackStore, timing: ClipTiming) -> TrackStore {
        log::info!(
            "Retargeting {} frames: {} source bones -> {} target bones",
            timing.frame_count,
            self.source_bones.len(),
            self.write_back.len()
        );

        self.solver.reset_planting();

        let mut source_pose: ComponentPose = vec![Transform::IDENTITY; self.source_bones.len()];
        for frame in 0..timing.frame_count {
            self.compose_source_pose(&tracks, frame, &mut source_pose);

            self.solver.copy_settings_from_asset(self.settings);
            let profile = self.settings.profile();

            // Timestamp kept as frame * duration.
            let time = frame as f32 * timing.duration;
            let target_pose = self.solver.run_retargeter(&source_pose, &[], time, &profile).to_vec();

            let local_pose = to_local_pose(self.solver.skeleton(RetargetSide::Target), &target_pose);

            self.write_back_frame(&mut tracks, &local_pose, frame);
        }

        tracks
    }

    fn compose_source_pose(&self, tracks: &TrackStore, frame: usize, pose: &mut ComponentPose) {
        for (slot, (name, source_index)) in pose.iter_mut().zip(&self.source_bones) {
            *slot = match source_index {
                Some(index) if tracks.contains(name) => {
                    compose_world_transform(self.source, tracks, *index, frame)
                }
                Some(index) => compose_reference_world_transform(self.source, *index),
                None => Transform::IDENTITY,
            };
        }
    }

    fn write_back_frame(&self, tracks: &mut TrackStore, local_pose: &[Transform], frame: usize) {
        let dest_pose = self.dest.reference_pose();

        for slot in &self.write_back {
            let Some(track) = tracks.get_mut(&slot.bone_name) else {
                continue;
            };
            if !track.has_frame(frame) {
                continue;
            }
            let Some(local) = local_pose.get(slot.target_index) else {
                continue;
            };

            let local = local.with_normalized_rotation();
            track.pos_keys[frame] = local.translation;
            track.rot_keys[frame] = local.rotation;

            let Some(dest_reference) = slot.dest_index.and_then(|i| dest_pose.get(i)) else {
                continue;
            };
            if slot.is_source_root {
                track.pos_keys[frame] = Vec3::new(0.0, 0.0, dest_reference.translation.z);
            }
            track.scale_keys[frame] = dest_reference.scale;
        }
    }
}

/// Sanitizes `tracks` against `source`, initializes `solver` and retargets
/// every frame.
///
/// Either returns a complete track set or fails before any frame is processed;
/// `tracks` itself is never modified.
pub fn retarget_animation<R: Retargeter + ?Sized>(
    source: &SkeletonHierarchy,
    dest: &SkeletonHierarchy,
    tracks: &TrackStore,
    timing: ClipTiming,
    solver: &mut R,
    settings: &RetargeterSettings,
    config: &SkeletalAnimationConfig,
) -> Result<TrackStore> {
    if source.is_empty() {
        return Err(RetargetError::MissingInput("source skeleton"));
    }
    if dest.is_empty() {
        return Err(RetargetError::MissingInput("destination skeleton"));
    }

    let sanitized = sanitize_tracks(source, tracks, timing.frame_count, config)?;

    let mut driver = RetargetDriver::initialize(source, dest, solver, settings)?;
    Ok(driver.run(sanitized, timing))
}
