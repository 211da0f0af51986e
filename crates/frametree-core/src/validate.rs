//! Structural diagnostics for frame snapshots.
//!
//! [`validate`] inspects an [`EdgeMap`] and lists *every* problem that would
//! stop it from forming a single rooted tree.  The builder runs the same
//! analysis and fails on the first entry; a diagnostic tool can print the
//! whole list instead.
//!
//! Problems are reported in three groups, names sorted within each group:
//!
//! 1. [`TreeError::MalformedEdge`] – an edge that is unusable on its own
//!    (empty names, degenerate rotation, non-finite translation).  An edge
//!    with an empty name is left out of the remaining checks; a bad pose
//!    still links its child to its parent.
//! 2. [`TreeError::CycleDetected`] – a child whose `child → parent` walk does
//!    not reach a parentless frame within `N` steps, `N` being the number of
//!    distinct frame names.
//! 3. [`TreeError::NoRoot`] / [`TreeError::MultipleRoots`] – the snapshot does
//!    not have exactly one root candidate.
//!
//! # Example
//!
//! ```rust
//! use frametree_core::pose::RigidPose;
//! use frametree_core::snapshot::edge_map;
//! use frametree_core::validate::validate;
//! use frametree_types::TreeError;
//!
//! let edges = edge_map([
//!     ("a", "b", RigidPose::identity()),
//!     ("b", "a", RigidPose::identity()),
//!     ("c", "x", RigidPose::identity()),
//! ]);
//!
//! let problems = validate(&edges);
//! assert_eq!(problems.len(), 2);
//! assert!(problems.iter().all(|p| matches!(p, TreeError::CycleDetected { .. })));
//! ```

use std::collections::{BTreeSet, HashMap};

use frametree_types::{EdgeDefect, FrameName, TreeError};
use tracing::trace;

use crate::snapshot::{EdgeMap, ParentEdge};

/// Result of analysing a snapshot: every problem found, plus the root when
/// exactly one candidate exists.
#[derive(Debug, Default)]
pub(crate) struct Analysis {
    pub(crate) errors: Vec<TreeError>,
    pub(crate) root: Option<FrameName>,
}

/// List every structural problem in `edges`.
///
/// An empty result means [`build`][crate::tree::build] will succeed.
pub fn validate(edges: &EdgeMap) -> Vec<TreeError> {
    analyze(edges).errors
}

pub(crate) fn analyze(edges: &EdgeMap) -> Analysis {
    let mut children: Vec<(&FrameName, &ParentEdge)> = edges.iter().collect();
    children.sort_by(|a, b| a.0.cmp(b.0));

    let mut errors = Vec::new();

    // ── Edge-local defects ──────────────────────────────────────────────────
    let mut linked: HashMap<&str, &str> = HashMap::with_capacity(children.len());
    for &(child, edge) in &children {
        let defects = edge_defects(child, edge);
        let names_intact = !defects
            .iter()
            .any(|d| matches!(d, EdgeDefect::EmptyChild | EdgeDefect::EmptyParent));
        if names_intact {
            linked.insert(child.as_str(), edge.parent_frame_name.as_str());
        }
        errors.extend(defects.into_iter().map(|defect| TreeError::MalformedEdge {
            frame: child.clone(),
            defect,
        }));
    }

    // ── Cycles ──────────────────────────────────────────────────────────────
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for (&child, &parent) in &linked {
        names.insert(child);
        names.insert(parent);
    }
    let bound = names.len();

    let mut reaches_root: HashMap<&str, bool> = HashMap::with_capacity(linked.len());
    for &(child, _) in &children {
        if !linked.contains_key(child.as_str()) {
            continue;
        }
        if !walk_reaches_root(child.as_str(), &linked, bound, &mut reaches_root) {
            errors.push(TreeError::CycleDetected {
                frame: child.clone(),
            });
        }
    }

    // ── Roots ───────────────────────────────────────────────────────────────
    let candidates: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !linked.contains_key(name))
        .collect();

    let root = match candidates.as_slice() {
        [] => {
            errors.push(TreeError::NoRoot);
            None
        }
        [only] => Some(FrameName::new(*only)),
        many => {
            errors.push(TreeError::MultipleRoots {
                names: many.iter().map(|n| FrameName::new(*n)).collect(),
            });
            None
        }
    };

    trace!(
        edges = edges.len(),
        frames = names.len(),
        problems = errors.len(),
        "snapshot analysed"
    );

    Analysis { errors, root }
}

fn edge_defects(child: &FrameName, edge: &ParentEdge) -> Vec<EdgeDefect> {
    let mut defects = Vec::new();
    if child.is_empty() {
        defects.push(EdgeDefect::EmptyChild);
    }
    if edge.parent_frame_name.is_empty() {
        defects.push(EdgeDefect::EmptyParent);
    }
    if !edge.parent_pose_child.translation.is_finite() {
        defects.push(EdgeDefect::NonFiniteTranslation);
    }
    if edge.parent_pose_child.rotation.normalized().is_err() {
        defects.push(EdgeDefect::DegenerateRotation);
    }
    defects
}

/// Follow `start → parent → …` for at most `bound` steps.
///
/// Every frame visited is memoised with the verdict so each frame is walked
/// once across the whole snapshot.
fn walk_reaches_root<'a>(
    start: &'a str,
    parent_of: &HashMap<&'a str, &'a str>,
    bound: usize,
    memo: &mut HashMap<&'a str, bool>,
) -> bool {
    let mut path: Vec<&'a str> = Vec::new();
    let mut current = start;
    let verdict = loop {
        if let Some(&known) = memo.get(current) {
            break known;
        }
        let Some(&parent) = parent_of.get(current) else {
            // No edge of its own: a root candidate.
            break true;
        };
        if path.len() >= bound {
            break false;
        }
        path.push(current);
        current = parent;
    };
    for frame in path {
        memo.insert(frame, verdict);
    }
    verdict
}
