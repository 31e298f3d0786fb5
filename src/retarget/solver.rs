//! Retargeting solver contract.
//!
//! The driver treats the solver as a black box: it hands over a full
//! source-skeleton component-space pose and gets a full target-skeleton
//! component-space pose back. How the solver maps one to the other is its own
//! business.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::skeleton::{SkeletonHierarchy, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetargetSide {
    Source,
    Target,
}

/// Externally supplied IK goal override.
#[derive(Debug, Clone, PartialEq)]
pub struct IkGoal {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    /// Blend between the solver's own goal (0) and this override (1)
    pub alpha: f32,
}

/// Asset-level solver settings; the authoritative source a [`RetargetProfile`]
/// is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetargeterSettings {
    /// Multiplier applied to the root translation
    pub translation_scale: f32,
    /// Derive the root translation multiplier from the reference root heights
    pub auto_scale_translation: bool,
    /// Blend from the target reference rotation (0) to the retargeted rotation (1)
    pub rotation_alpha: f32,
}

impl Default for RetargeterSettings {
    fn default() -> Self {
        Self {
            translation_scale: 1.0,
            auto_scale_translation: false,
            rotation_alpha: 1.0,
        }
    }
}

impl RetargeterSettings {
    /// Overwrites `profile` with the asset settings.
    pub fn fill_profile(&self, profile: &mut RetargetProfile) {
        profile.translation_scale = self.translation_scale;
        profile.auto_scale_translation = self.auto_scale_translation;
        profile.rotation_alpha = self.rotation_alpha.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn profile(&self) -> RetargetProfile {
        let mut profile = RetargetProfile::default();
        self.fill_profile(&mut profile);
        profile
    }
}

/// Run-time settings passed to every solver invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetargetProfile {
    pub translation_scale: f32,
    pub auto_scale_translation: bool,
    pub rotation_alpha: f32,
}

impl Default for RetargetProfile {
    fn default() -> Self {
        RetargeterSettings::default().profile()
    }
}

/// Retargeting solver capability.
pub trait Retargeter {
    /// Prepares the solver for `source` → `target`.
    fn initialize(
        &mut self,
        source: &SkeletonHierarchy,
        target: &SkeletonHierarchy,
        settings: &RetargeterSettings,
        profile: &RetargetProfile,
    ) -> Result<()>;

    fn is_initialized(&self) -> bool;

    /// Skeleton the solver reads (source) or writes (target) poses for.
    fn skeleton(&self, side: RetargetSide) -> &SkeletonHierarchy;

    /// Clears continuity state carried between consecutive frames.
    fn reset_planting(&mut self) {}

    /// Re-reads run-time settings from the asset; must be idempotent.
    fn copy_settings_from_asset(&mut self, _settings: &RetargeterSettings) {}

    /// Maps a source component-space pose (source skeleton order) to a target
    /// component-space pose (target skeleton order).
    fn run_retargeter(
        &mut self,
        source_pose: &[Transform],
        goals: &[IkGoal],
        time: f32,
        profile: &RetargetProfile,
    ) -> &[Transform];
}
