//! Validated frame tree and transform resolver.
//!
//! [`FrameTree::build`] turns a snapshot [`EdgeMap`] into an immutable arena:
//! frame names are interned into indices (sorted by name), each frame keeps
//! the index of its parent, and the pose of every frame relative to the root
//! is computed once, top-down, while building.  A query is then two table
//! lookups, one inversion and one composition:
//!
//! ```text
//! target_pose_source = root_pose(target)⁻¹ ∘ root_pose(source)
//! ```
//!
//! The tree holds no interior mutability, so a single instance can be shared
//! across threads (`Arc<FrameTree>` or scoped borrows) and queried in
//! parallel.
//!
//! # Example
//!
//! ```rust
//! use frametree_core::pose::{RigidPose, Vec3};
//! use frametree_core::snapshot::edge_map;
//! use frametree_core::tree::FrameTree;
//!
//! let edges = edge_map([
//!     ("hand", "shoulder", RigidPose::from_translation(Vec3::new(1.0, 0.0, 0.0))),
//!     ("shoulder", "body", RigidPose::from_translation(Vec3::new(0.0, 1.0, 0.0))),
//! ]);
//! let tree = FrameTree::build(&edges).unwrap();
//!
//! let body_pose_hand = tree.resolve("hand", "body").unwrap();
//! assert!((body_pose_hand.translation.x - 1.0).abs() < 1e-12);
//! assert!((body_pose_hand.translation.y - 1.0).abs() < 1e-12);
//! ```

use std::collections::{HashMap, VecDeque};

use frametree_types::{FrameName, TreeError, frames};
use tracing::debug;

use crate::pose::{PlanarPose, RigidPose, Vec3};
use crate::snapshot::{EdgeMap, ParentEdge};
use crate::validate::analyze;

// ────────────────────────────────────────────────────────────────────────────
// Edge view
// ────────────────────────────────────────────────────────────────────────────

/// A borrowed `(child, parent, parent_pose_child)` relation of a built tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<'a> {
    pub child: &'a FrameName,
    pub parent: &'a FrameName,
    /// Pose of `child` expressed in `parent` (rotation normalized).
    pub parent_pose_child: &'a RigidPose,
}

// ────────────────────────────────────────────────────────────────────────────
// FrameTree
// ────────────────────────────────────────────────────────────────────────────

/// An immutable, validated tree of named frames.
#[derive(Debug, Clone)]
pub struct FrameTree {
    /// Frame names, sorted; position is the frame's index.
    names: Vec<FrameName>,
    index: HashMap<FrameName, usize>,
    /// `None` only for the root.
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Edge pose of each frame in its parent; identity for the root.
    parent_pose_child: Vec<RigidPose>,
    /// Pose of each frame in the root.
    root_pose: Vec<RigidPose>,
    depth: Vec<usize>,
    root: usize,
}

impl FrameTree {
    /// Validate `edges` and build the tree.
    ///
    /// Fails with the first problem [`validate`][crate::validate::validate]
    /// would report.
    pub fn build(edges: &EdgeMap) -> Result<Self, TreeError> {
        let analysis = analyze(edges);
        if let Some(first) = analysis.errors.first() {
            debug!(
                error = %first,
                problems = analysis.errors.len(),
                "frame tree rejected"
            );
            return Err(first.clone());
        }
        let root_name = analysis.root.ok_or(TreeError::NoRoot)?;

        let mut names: Vec<FrameName> = edges.keys().cloned().collect();
        names.push(root_name.clone());
        names.sort();

        let index: HashMap<FrameName, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let root = index[&root_name];

        let n = names.len();
        let mut parents = vec![None; n];
        let mut children = vec![Vec::new(); n];
        let mut parent_pose_child = vec![RigidPose::identity(); n];

        for (i, name) in names.iter().enumerate() {
            let Some(ParentEdge {
                parent_frame_name,
                parent_pose_child: pose,
            }) = edges.get(name)
            else {
                continue;
            };
            // Every parent name is a key or the root once the analysis passed.
            let parent = index[parent_frame_name];
            parents[i] = Some(parent);
            children[parent].push(i);
            parent_pose_child[i] = pose.normalized()?;
        }

        // Top-down pass: every parent is finalised before its children.
        let mut root_pose = vec![RigidPose::identity(); n];
        let mut depth = vec![0; n];
        let mut queue = VecDeque::from([root]);
        while let Some(frame) = queue.pop_front() {
            for &child in &children[frame] {
                root_pose[child] = root_pose[frame].compose(&parent_pose_child[child])?;
                depth[child] = depth[frame] + 1;
                queue.push_back(child);
            }
        }

        debug!(frames = n, root = %root_name, "frame tree built");

        Ok(Self {
            names,
            index,
            parents,
            children,
            parent_pose_child,
            root_pose,
            depth,
            root,
        })
    }

    // ── Structure ───────────────────────────────────────────────────────────

    /// The single frame without a parent.
    pub fn root(&self) -> &FrameName {
        &self.names[self.root]
    }

    /// Number of known frames (children plus the root).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a built tree.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All known frame names in sorted order.
    pub fn frames(&self) -> impl Iterator<Item = &FrameName> {
        self.names.iter()
    }

    /// The parent of `name`, or `None` for the root.
    pub fn parent(&self, name: &str) -> Result<Option<&FrameName>, TreeError> {
        let i = self.index_of(name)?;
        Ok(self.parents[i].map(|p| &self.names[p]))
    }

    /// Direct children of `name`, sorted.
    pub fn children(&self, name: &str) -> Result<Vec<&FrameName>, TreeError> {
        let i = self.index_of(name)?;
        Ok(self.children[i].iter().map(|&c| &self.names[c]).collect())
    }

    /// Number of edges between `name` and the root.
    pub fn depth(&self, name: &str) -> Result<usize, TreeError> {
        Ok(self.depth[self.index_of(name)?])
    }

    /// `name` followed by each of its ancestors, ending with the root.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&FrameName>, TreeError> {
        let start = self.index_of(name)?;
        let mut chain = Vec::with_capacity(self.depth[start] + 1);
        let mut current = Some(start);
        while let Some(i) = current {
            chain.push(&self.names[i]);
            current = self.parents[i];
        }
        Ok(chain)
    }

    /// The edge stored for `name`, or `None` for the root.
    pub fn edge(&self, name: &str) -> Result<Option<Edge<'_>>, TreeError> {
        let i = self.index_of(name)?;
        Ok(self.edge_at(i))
    }

    /// Every edge, in child-name order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        (0..self.names.len()).filter_map(|i| self.edge_at(i))
    }

    /// Reconstruct the snapshot this tree was built from (rotations
    /// normalized).
    pub fn to_edge_map(&self) -> EdgeMap {
        self.edges()
            .map(|e| {
                (
                    e.child.clone(),
                    ParentEdge::new(e.parent.clone(), *e.parent_pose_child),
                )
            })
            .collect()
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Pose of `name` expressed in the root frame.
    pub fn root_pose(&self, name: &str) -> Result<RigidPose, TreeError> {
        Ok(self.root_pose[self.index_of(name)?])
    }

    /// Pose of `source` expressed in `target`'s coordinates
    /// (`target_pose_source`).
    ///
    /// Returns [`TreeError::UnknownFrame`] for a name that is not part of the
    /// tree; `source` is checked first.
    pub fn resolve(&self, source: &str, target: &str) -> Result<RigidPose, TreeError> {
        let s = self.index_of(source)?;
        let t = self.index_of(target)?;
        if s == t {
            return Ok(RigidPose::identity());
        }
        self.root_pose[t].inverse()?.compose(&self.root_pose[s])
    }

    /// Express `point`, given in `source` coordinates, in `target`
    /// coordinates.
    pub fn transform_point(
        &self,
        source: &str,
        target: &str,
        point: Vec3,
    ) -> Result<Vec3, TreeError> {
        self.resolve(source, target)?.transform_point(point)
    }

    /// Ground-plane projection of [`resolve`][Self::resolve].
    pub fn resolve_planar(&self, source: &str, target: &str) -> Result<PlanarPose, TreeError> {
        Ok(self.resolve(source, target)?.to_planar())
    }

    /// Pose of the `"body"` frame in the `"vision"` frame.
    pub fn vision_pose_body(&self) -> Result<RigidPose, TreeError> {
        self.resolve(frames::BODY, frames::VISION)
    }

    /// Pose of the `"body"` frame in the `"odom"` frame.
    pub fn odom_pose_body(&self) -> Result<RigidPose, TreeError> {
        self.resolve(frames::BODY, frames::ODOM)
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn index_of(&self, name: &str) -> Result<usize, TreeError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TreeError::UnknownFrame {
                name: FrameName::new(name),
            })
    }

    fn edge_at(&self, i: usize) -> Option<Edge<'_>> {
        self.parents[i].map(|p| Edge {
            child: &self.names[i],
            parent: &self.names[p],
            parent_pose_child: &self.parent_pose_child[i],
        })
    }
}

impl TryFrom<&EdgeMap> for FrameTree {
    type Error = TreeError;

    fn try_from(edges: &EdgeMap) -> Result<Self, Self::Error> {
        Self::build(edges)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Free-function forms
// ────────────────────────────────────────────────────────────────────────────

/// Validate `edges` and build a [`FrameTree`].
pub fn build(edges: &EdgeMap) -> Result<FrameTree, TreeError> {
    FrameTree::build(edges)
}

/// Pose of `source` expressed in `target` (see [`FrameTree::resolve`]).
pub fn resolve(tree: &FrameTree, source: &str, target: &str) -> Result<RigidPose, TreeError> {
    tree.resolve(source, target)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
