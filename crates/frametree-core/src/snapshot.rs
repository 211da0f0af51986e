//! Input shape of a frame tree: one parent edge per child frame.
//!
//! A snapshot is a plain map from child frame name to [`ParentEdge`].  Any
//! name that appears only as a `parent_frame_name` is the implicit root.

use std::collections::HashMap;

use frametree_types::FrameName;
use serde::{Deserialize, Serialize};

use crate::pose::RigidPose;

/// The edge stored under a child frame's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentEdge {
    /// Frame the child is expressed in.
    pub parent_frame_name: FrameName,
    /// Pose of the child expressed in the parent's coordinates.
    #[serde(default)]
    pub parent_pose_child: RigidPose,
}

impl ParentEdge {
    pub fn new(parent_frame_name: impl Into<FrameName>, parent_pose_child: RigidPose) -> Self {
        Self {
            parent_frame_name: parent_frame_name.into(),
            parent_pose_child,
        }
    }
}

/// Child frame name → edge to its parent.
pub type EdgeMap = HashMap<FrameName, ParentEdge>;

/// Build an [`EdgeMap`] from `(child, parent, parent_pose_child)` triples.
///
/// Later triples for the same child replace earlier ones, matching map
/// insertion semantics.
pub fn edge_map<I, C, P>(triples: I) -> EdgeMap
where
    I: IntoIterator<Item = (C, P, RigidPose)>,
    C: Into<FrameName>,
    P: Into<FrameName>,
{
    triples
        .into_iter()
        .map(|(child, parent, pose)| (child.into(), ParentEdge::new(parent, pose)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Vec3;

    #[test]
    fn edge_map_keys_by_child() {
        let map = edge_map([
            ("hand", "shoulder", RigidPose::identity()),
            ("shoulder", "body", RigidPose::identity()),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["hand"].parent_frame_name, "shoulder");
    }

    #[test]
    fn edge_map_last_duplicate_wins() {
        let map = edge_map([
            ("camera", "body", RigidPose::identity()),
            (
                "camera",
                "head",
                RigidPose::from_translation(Vec3::new(0.1, 0.0, 0.0)),
            ),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["camera"].parent_frame_name, "head");
    }

    #[test]
    fn parent_edge_pose_defaults_to_identity() {
        let edge: ParentEdge = serde_json::from_str(r#"{"parent_frame_name":"body"}"#).unwrap();
        assert_eq!(edge.parent_pose_child, RigidPose::identity());
    }
}
