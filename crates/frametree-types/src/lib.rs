//! Shared vocabulary for frame trees: frame names, the well-known frame
//! constants and the error types every query and diagnostic returns.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Identifier of a coordinate frame (e.g. `"body"`, `"odom"`, `"hand"`).
///
/// Frame names are the lookup key for every tree query.  A valid name is
/// non-empty; an empty name is representable so that a malformed snapshot
/// can still be deserialized and reported on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameName(String);

impl FrameName {
    /// Wrap any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name is the empty string (never valid inside a tree).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FrameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FrameName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FrameName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FrameName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FrameName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for FrameName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FrameName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Names that robot snapshot producers conventionally publish.
///
/// The tree treats these as ordinary identifiers; they exist so callers do
/// not scatter string literals.
pub mod frames {
    /// The robot body frame.
    pub const BODY: &str = "body";
    /// Inertial frame anchored by visual odometry.
    pub const VISION: &str = "vision";
    /// Inertial frame anchored by kinematic odometry.
    pub const ODOM: &str = "odom";
    /// Estimated ground plane beneath the robot.
    pub const GROUND_PLANE: &str = "gpe";
    /// Gravity-aligned body frame with zero roll and pitch.
    pub const FLAT_BODY: &str = "flat_body";
    /// Gripper / end-effector frame.
    pub const HAND: &str = "hand";
}

/// Why a single snapshot edge was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeDefect {
    /// `parent_frame_name` is empty.
    EmptyParent,
    /// The child key itself is empty.
    EmptyChild,
    /// The edge rotation has zero or non-finite norm.
    DegenerateRotation,
    /// A translation component is NaN or infinite.
    NonFiniteTranslation,
}

impl fmt::Display for EdgeDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EdgeDefect::EmptyParent => "empty parent frame name",
            EdgeDefect::EmptyChild => "empty child frame name",
            EdgeDefect::DegenerateRotation => "degenerate rotation",
            EdgeDefect::NonFiniteTranslation => "non-finite translation",
        };
        f.write_str(text)
    }
}

/// Every failure a frame tree can report.
///
/// `NoRoot`, `MultipleRoots`, `CycleDetected` and `MalformedEdge` are
/// structural: they are raised while building and no tree is produced.
/// `UnknownFrame` is a normal per-query outcome.  `DegenerateRotation` comes
/// from the pose algebra when fed a zero-norm quaternion.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeError {
    #[error("snapshot has no root frame")]
    NoRoot,

    #[error("snapshot has more than one root frame: {}", join_names(.names))]
    MultipleRoots { names: Vec<FrameName> },

    #[error("ancestry of frame '{frame}' does not reach a root (cycle)")]
    CycleDetected { frame: FrameName },

    #[error("malformed edge for frame '{frame}': {defect}")]
    MalformedEdge { frame: FrameName, defect: EdgeDefect },

    #[error("unknown frame '{name}'")]
    UnknownFrame { name: FrameName },

    #[error("rotation quaternion has zero or non-finite norm")]
    DegenerateRotation,
}

impl TreeError {
    /// True for errors that prevent a tree from being built at all.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TreeError::NoRoot
                | TreeError::MultipleRoots { .. }
                | TreeError::CycleDetected { .. }
                | TreeError::MalformedEdge { .. }
        )
    }
}

fn join_names(names: &[FrameName]) -> String {
    names
        .iter()
        .map(FrameName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
