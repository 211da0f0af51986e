//! `frametree-core` – rigid-body frame tree.
//!
//! Builds, validates and queries a snapshot of named coordinate frames in
//! which every frame but one (the root) is attached to a parent by a known
//! rigid pose.  From that sparse description the pose between *any* two
//! frames can be derived.
//!
//! # Modules
//!
//! - [`pose`] – [`RigidPose`][pose::RigidPose]: translation + unit quaternion
//!   with composition, inversion and point transformation.
//! - [`snapshot`] – [`EdgeMap`][snapshot::EdgeMap]: the child → parent input
//!   mapping.
//! - [`validate`] – [`validate`][validate::validate]: lists every structural
//!   problem in a snapshot (malformed edges, cycles, missing or multiple
//!   roots).
//! - [`tree`] – [`FrameTree`][tree::FrameTree]: the immutable validated tree
//!   and its resolver.

pub mod pose;
pub mod snapshot;
pub mod tree;
pub mod validate;

pub use frametree_types::{EdgeDefect, FrameName, TreeError, frames};
pub use pose::{PlanarPose, Quaternion, RigidPose, Vec3};
pub use snapshot::{EdgeMap, ParentEdge, edge_map};
pub use tree::{Edge, FrameTree, build, resolve};
pub use validate::validate;
