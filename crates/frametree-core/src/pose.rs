//! Rigid-body pose algebra.
//!
//! A [`RigidPose`] is a translation plus a unit-quaternion rotation.  Read
//! `a_pose_b` as "the pose of frame B expressed in frame A": applying it to a
//! point given in B's coordinates yields the same point in A's coordinates.
//!
//! ```text
//! a_pose_b.compose(b_pose_c) == a_pose_c
//! a_pose_b.inverse()         == b_pose_a
//! ```
//!
//! Rotations are renormalized every time they are read so that drift from
//! long composition chains never accumulates.  A quaternion whose norm is
//! zero (or NaN / infinite) cannot be renormalized and yields
//! [`TreeError::DegenerateRotation`].
//!
//! # Example
//!
//! ```rust
//! use frametree_core::pose::{Quaternion, RigidPose, Vec3};
//!
//! let body_pose_arm = RigidPose::new(Vec3::new(0.0, 1.0, 0.0), Quaternion::identity());
//! let arm_pose_hand = RigidPose::new(Vec3::new(1.0, 0.0, 0.0), Quaternion::identity());
//!
//! let body_pose_hand = body_pose_arm.compose(&arm_pose_hand).unwrap();
//! assert!((body_pose_hand.translation.x - 1.0).abs() < 1e-12);
//! assert!((body_pose_hand.translation.y - 1.0).abs() < 1e-12);
//! ```

use std::ops::{Add, Neg, Sub};

use frametree_types::TreeError;
use serde::{Deserialize, Serialize};

/// Norm below which a quaternion is considered degenerate.
const MIN_QUATERNION_NORM: f64 = 1e-12;

// ────────────────────────────────────────────────────────────────────────────
// Vec3
// ────────────────────────────────────────────────────────────────────────────

/// A 3-D vector (translation or point).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quaternion
// ────────────────────────────────────────────────────────────────────────────

/// A rotation quaternion stored as `(x, y, z, w)`.
///
/// The identity rotation is `(0, 0, 0, 1)`.  Operations that depend on unit
/// norm go through [`Quaternion::normalized`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Create a quaternion from its vector part `(x, y, z)` and scalar `w`.
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// The identity rotation (no rotation).
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Rotation of `angle` radians about `axis` (right-hand rule).
    ///
    /// The axis does not need to be unit length; a zero axis yields
    /// [`TreeError::DegenerateRotation`].
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Result<Self, TreeError> {
        let len = axis.norm();
        if !(len.is_finite() && len > MIN_QUATERNION_NORM) {
            return Err(TreeError::DegenerateRotation);
        }
        let (s, c) = (angle * 0.5).sin_cos();
        let k = s / len;
        Ok(Self::new(axis.x * k, axis.y * k, axis.z * k, c))
    }

    /// Rotation of `yaw` radians about +Z.
    pub fn from_yaw(yaw: f64) -> Self {
        let (s, c) = (yaw * 0.5).sin_cos();
        Self::new(0.0, 0.0, s, c)
    }

    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Rescale to unit norm.
    pub fn normalized(self) -> Result<Self, TreeError> {
        let n = self.norm();
        if !(n.is_finite() && n > MIN_QUATERNION_NORM) {
            return Err(TreeError::DegenerateRotation);
        }
        Ok(Self::new(self.x / n, self.y / n, self.z / n, self.w / n))
    }

    /// Hamilton product: `self` followed by `rhs` in the frame chain sense,
    /// i.e. `a_q_b * b_q_c = a_q_c`.
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }

    /// Conjugate (== inverse for a unit quaternion).
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotate a vector by this quaternion: p' = q * p * q*.
    ///
    /// Assumes unit norm; callers normalize first.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Self::new(v.x, v.y, v.z, 0.0);
        let rotated = self.mul(p).mul(self.conjugate());
        Vec3::new(rotated.x, rotated.y, rotated.z)
    }

    /// Heading about +Z in `(-π, π]`.
    pub fn yaw(self) -> f64 {
        let siny_cosp = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy_cosp = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        siny_cosp.atan2(cosy_cosp)
    }

    /// Geodesic angle in `[0, π]` between two rotations.
    ///
    /// `q` and `-q` describe the same rotation and give an angle of zero.
    /// Degenerate inputs produce NaN.
    pub fn angle_to(self, other: Self) -> f64 {
        let dot = self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w;
        let cos_half = (dot.abs() / (self.norm() * other.norm())).min(1.0);
        2.0 * cos_half.acos()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RigidPose
// ────────────────────────────────────────────────────────────────────────────

/// A rigid-body transform: rotation followed by translation.
///
/// For `a_pose_b`, a point `p_b` in frame B maps into frame A as
/// `rotation.rotate(p_b) + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidPose {
    pub translation: Vec3,
    pub rotation: Quaternion,
}

impl RigidPose {
    pub fn new(translation: Vec3, rotation: Quaternion) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// The identity transform (no translation, no rotation).
    pub fn identity() -> Self {
        Self::new(Vec3::zero(), Quaternion::identity())
    }

    /// A pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quaternion::identity())
    }

    /// A pure rotation.
    pub fn from_rotation(rotation: Quaternion) -> Self {
        Self::new(Vec3::zero(), rotation)
    }

    /// Same pose with its rotation rescaled to unit norm.
    pub fn normalized(&self) -> Result<Self, TreeError> {
        Ok(Self::new(self.translation, self.rotation.normalized()?))
    }

    /// Compose two poses.
    ///
    /// If `self` = `a_pose_b` and `other` = `b_pose_c`, the result is
    /// `a_pose_c`.
    pub fn compose(&self, other: &Self) -> Result<Self, TreeError> {
        let qa = self.rotation.normalized()?;
        let qb = other.rotation.normalized()?;
        let translation = self.translation + qa.rotate(other.translation);
        let rotation = qa.mul(qb).normalized()?;
        Ok(Self::new(translation, rotation))
    }

    /// Invert: `a_pose_b` becomes `b_pose_a`.
    pub fn inverse(&self) -> Result<Self, TreeError> {
        let q_inv = self.rotation.normalized()?.conjugate();
        Ok(Self::new(q_inv.rotate(-self.translation), q_inv))
    }

    /// Map a point given in the child frame into the parent frame.
    pub fn transform_point(&self, point: Vec3) -> Result<Vec3, TreeError> {
        let q = self.rotation.normalized()?;
        Ok(q.rotate(point) + self.translation)
    }

    /// Projection onto the XY plane: translation x/y and yaw of the rotation.
    pub fn to_planar(&self) -> PlanarPose {
        PlanarPose {
            x: self.translation.x,
            y: self.translation.y,
            angle: self.rotation.yaw(),
        }
    }

    /// True when `other` lies within `max_translation` (metres, Euclidean)
    /// and `max_angle` (radians, geodesic) of `self`.
    pub fn is_within_threshold(&self, other: &Self, max_translation: f64, max_angle: f64) -> bool {
        let distance = (self.translation - other.translation).norm();
        let angle = self.rotation.angle_to(other.rotation);
        distance <= max_translation && angle <= max_angle
    }
}

/// A pose projected onto the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPose {
    pub x: f64,
    pub y: f64,
    /// Heading about +Z (radians).
    pub angle: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Free-function forms
// ────────────────────────────────────────────────────────────────────────────

/// `compose(a_pose_b, b_pose_c) == a_pose_c`.
pub fn compose(a_pose_b: &RigidPose, b_pose_c: &RigidPose) -> Result<RigidPose, TreeError> {
    a_pose_b.compose(b_pose_c)
}

/// `invert(a_pose_b) == b_pose_a`.
pub fn invert(a_pose_b: &RigidPose) -> Result<RigidPose, TreeError> {
    a_pose_b.inverse()
}

pub fn identity() -> RigidPose {
    RigidPose::identity()
}

/// Apply `pose` to `point`.
pub fn apply(pose: &RigidPose, point: Vec3) -> Result<Vec3, TreeError> {
    pose.transform_point(point)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
