use serde::{Deserialize, Serialize};

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPath {
    Translation, // Maps to bone local translation
    Rotation,    // Maps to bone local rotation
    Scale,       // Maps to bone local scale
    Weights,     // Maps to a morph target weight curve
}
