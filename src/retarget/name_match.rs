//! Name-matching FK retargeter.
//!
//! Bones are paired by name. For a matched bone the source's component-space
//! rotation change relative to its reference pose is transferred onto the
//! target's reference pose:
//!
//! `target_rot = source_rot * source_ref_rot⁻¹ * target_ref_rot`
//!
//! Unmatched target bones follow their parent with their reference local
//! rotation. Translations are rebuilt by forward kinematics from the target's
//! reference locals, except the root, which follows the source root scaled by
//! the profile's translation multiplier. No IK is performed.

use crate::errors::{Result, RetargetError};
use crate::retarget::solver::{IkGoal, RetargetProfile, RetargetSide, Retargeter, RetargeterSettings};
use crate::skeleton::{SkeletonHierarchy, Transform};

#[derive(Debug, Default)]
pub struct NameMatchRetargeter {
    source: SkeletonHierarchy,
    target: SkeletonHierarchy,
    source_reference: Vec<Transform>,
    target_reference: Vec<Transform>,
    /// Target bone index to matching source bone index
    bone_map: Vec<Option<usize>>,
    /// Target root height / source root height
    height_ratio: f32,
    settings: RetargeterSettings,
    output: Vec<Transform>,
    initialized: bool,
}

impl NameMatchRetargeter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of target bones with a source counterpart.
    #[must_use]
    pub fn matched_bones(&self) -> usize {
        self.bone_map.iter().filter(|m| m.is_some()).count()
    }

    fn root_translation_scale(&self, profile: &RetargetProfile) -> f32 {
        if profile.auto_scale_translation {
            self.height_ratio * profile.translation_scale
        } else {
            profile.translation_scale
        }
    }
}

impl Retargeter for NameMatchRetargeter {
    fn initialize(
        &mut self,
        source: &SkeletonHierarchy,
        target: &SkeletonHierarchy,
        settings: &RetargeterSettings,
        _profile: &RetargetProfile,
    ) -> Result<()> {
        self.initialized = false;

        let bone_map: Vec<Option<usize>> = target
            .bone_names()
            .iter()
            .map(|name| source.find_bone_index(name))
            .collect();
        if bone_map.iter().all(Option::is_none) {
            return Err(RetargetError::SolverInitFailed(format!(
                "no bone of {} matches a bone of {}",
                target.name, source.name
            )));
        }

        self.source_reference = source.reference_component_pose();
        self.target_reference = target.reference_component_pose();

        let source_height = self.source_reference.first().map_or(0.0, |t| t.translation.length());
        let target_height = self.target_reference.first().map_or(0.0, |t| t.translation.length());
        self.height_ratio = if source_height > f32::EPSILON {
            target_height / source_height
        } else {
            1.0
        };

        self.source = source.clone();
        self.target = target.clone();
        self.bone_map = bone_map;
        self.settings = settings.clone();
        self.output = self.target_reference.clone();
        self.initialized = true;

        log::debug!(
            "NameMatchRetargeter: {}/{} target bones matched, height ratio {:.3}",
            self.matched_bones(),
            self.target.num_bones(),
            self.height_ratio
        );
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn skeleton(&self, side: RetargetSide) -> &SkeletonHierarchy {
        match side {
            RetargetSide::Source => &self.source,
            RetargetSide::Target => &self.target,
        }
    }

    fn copy_settings_from_asset(&mut self, settings: &RetargeterSettings) {
        self.settings.clone_from(settings);
    }

    fn run_retargeter(
        &mut self,
        source_pose: &[Transform],
        _goals: &[IkGoal],
        _time: f32,
        profile: &RetargetProfile,
    ) -> &[Transform] {
        if !self.initialized {
            return &self.output;
        }

        let root_scale = self.root_translation_scale(profile);

        for index in 0..self.target.num_bones() {
            let target_ref = self.target_reference[index];
            let local_ref = self.target.reference_transform(index).copied().unwrap_or_default();
            let parent = self.target.parent_index(index).map(|p| self.output[p]);

            let matched = self.bone_map[index]
                .and_then(|s| Some((source_pose.get(s)?, self.source_reference.get(s)?)));

            let rotation = match (matched, parent) {
                (Some((source, source_ref)), _) => {
                    source.rotation * source_ref.rotation.inverse() * target_ref.rotation
                }
                (None, Some(parent)) => parent.rotation * local_ref.rotation,
                (None, None) => target_ref.rotation,
            };
            let rotation = target_ref.rotation.slerp(rotation, profile.rotation_alpha).normalize();

            let (translation, scale) = match parent {
                Some(parent) => (parent.transform_point(local_ref.translation), parent.scale * local_ref.scale),
                None => {
                    let translation = matched.map_or(target_ref.translation, |(source, _)| {
                        source.translation * root_scale
                    });
                    (translation, target_ref.scale)
                }
            };

            self.output[index] = Transform::new(translation, rotation, scale);
        }

        &self.output
    }
}
