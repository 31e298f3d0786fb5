//! Error Types
//!
//! This module defines the error type returned by every fallible operation in
//! the crate.
//!
//! # Overview
//!
//! [`RetargetError`] covers:
//! - Missing or empty inputs (skeletons, clips)
//! - Animation lookup failures
//! - Track sanitation failures and unusable clip durations
//! - Solver initialization failures
//! - Asset decoding errors (glTF, data URIs, JSON, I/O)
//!
//! None of these are fatal: a failed retarget request produces no output and
//! can be re-issued with corrected inputs.
//!
//! ```rust,ignore
//! use gltf_retarget::errors::{RetargetError, Result};
//!
//! fn load() -> Result<()> {
//!     Err(RetargetError::MissingInput("source skeleton"))
//! }
//! ```

use thiserror::Error;

/// The error type for retargeting and asset operations.
#[derive(Error, Debug)]
pub enum RetargetError {
    // ========================================================================
    // Pipeline Errors
    // ========================================================================
    /// A required input is absent or empty.
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    /// No animation with the requested name exists in the asset.
    #[error("Animation not found: {0}")]
    AnimationNotFound(String),

    /// A bone track could not be sanitized against the skeleton.
    #[error("Unable to sanitize bone track {bone}: {reason}")]
    TrackSanitationFailed {
        /// Name of the offending bone track
        bone: String,
        /// What was wrong with it
        reason: String,
    },

    /// The retargeting solver refused to initialize.
    #[error("Unable to initialize the retargeter: {0}")]
    SolverInitFailed(String),

    /// A clip duration that cannot be sampled into frames.
    #[error("Invalid clip duration: {0}s")]
    InvalidDuration(f32),

    /// A skeleton violates the parent-before-child ordering.
    #[error("Invalid hierarchy: bone {bone} (index {index}) has parent index {parent}")]
    InvalidHierarchy {
        /// Name of the offending bone
        bone: String,
        /// Index of the offending bone
        index: usize,
        /// Its declared parent index
        parent: usize,
    },

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// glTF parsing or layout error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<gltf::Error> for RetargetError {
    fn from(err: gltf::Error) -> Self {
        RetargetError::GltfError(err.to_string())
    }
}

impl From<base64::DecodeError> for RetargetError {
    fn from(err: base64::DecodeError) -> Self {
        RetargetError::DataUriError(err.to_string())
    }
}

impl RetargetError {
    pub(crate) fn sanitation(bone: &str, reason: impl Into<String>) -> Self {
        RetargetError::TrackSanitationFailed {
            bone: bone.to_string(),
            reason: reason.into(),
        }
    }
}

/// Alias for `Result<T, RetargetError>`.
pub type Result<T> = std::result::Result<T, RetargetError>;
