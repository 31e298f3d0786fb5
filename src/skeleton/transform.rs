use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Bone transform (translation, rotation, scale).
///
/// Composition follows the parent-first convention: `parent.mul_transform(child)`
/// yields the child expressed in the parent's space, i.e. the child is applied
/// first and the parent second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Translation and rotation only, unit scale.
    #[must_use]
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Composes `child` (expressed relative to `self`) into `self`'s space.
    #[must_use]
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Expresses `self` relative to `parent`.
    ///
    /// Exact inverse of [`Transform::mul_transform`]:
    /// `parent.mul_transform(&self.relative_to(parent)) == self` for any
    /// parent with non-zero scale.
    #[must_use]
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        let inv_rotation = parent.rotation.inverse();
        let inv_scale = safe_recip(parent.scale);
        Transform {
            translation: (inv_rotation * (self.translation - parent.translation)) * inv_scale,
            rotation: inv_rotation * self.rotation,
            scale: self.scale * inv_scale,
        }
    }

    /// Inverse transform; exact for uniform scale.
    #[must_use]
    pub fn inverse(&self) -> Transform {
        Transform::IDENTITY.relative_to(self)
    }

    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_normalized_rotation(mut self) -> Self {
        self.rotation = self.rotation.normalize();
        self
    }

    /// Component-wise comparison with a tolerance, rotations compared up to sign.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Transform, max_abs_diff: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn safe_recip(v: Vec3) -> Vec3 {
    let recip = |c: f32| if c.abs() > f32::EPSILON { 1.0 / c } else { 0.0 };
    Vec3::new(recip(v.x), recip(v.y), recip(v.z))
}
