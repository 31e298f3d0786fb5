//! Configuration
//!
//! Settings are plain serde structs. Every field has a default, so a config
//! file only has to name what it changes:
//!
//! ```json
//! {
//!   "animation": { "frames_per_second": 60.0, "remove_morph_targets": true },
//!   "retargeter": { "auto_scale_translation": true }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::retarget::RetargeterSettings;

/// How clips are sampled, sanitized and baked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkeletalAnimationConfig {
    /// Sampling rate used to turn keyframe curves into per-frame tracks
    pub frames_per_second: f32,
    /// Pin the root bone's translation keys to its reference translation when baking
    pub remove_root_motion: bool,
    /// Replace translation keys with the reference pose during sanitation
    pub remove_translations: bool,
    /// Replace rotation keys with the reference pose during sanitation
    pub remove_rotations: bool,
    /// Replace scale keys with the reference pose during sanitation
    pub remove_scales: bool,
    /// Drop morph target curves when baking
    pub remove_morph_targets: bool,
}

impl Default for SkeletalAnimationConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 30.0,
            remove_root_motion: false,
            remove_translations: false,
            remove_rotations: false,
            remove_scales: false,
            remove_morph_targets: false,
        }
    }
}

impl SkeletalAnimationConfig {
    /// Sampling rate, falling back to the default for non-positive or non-finite values.
    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        if self.frames_per_second.is_finite() && self.frames_per_second > 0.0 {
            self.frames_per_second
        } else {
            Self::default().frames_per_second
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetargetConfig {
    pub animation: SkeletalAnimationConfig,
    pub retargeter: RetargeterSettings,
}

impl RetargetConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded retarget config from {}", path.display());
        Ok(config)
    }
}
