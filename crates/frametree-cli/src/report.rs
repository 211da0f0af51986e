//! Plain-text rendering of poses, diagnostics and tree hierarchies.
//!
//! Everything here returns `String`s without colour so the output can be
//! asserted on; `main` adds styling.

use frametree_core::{FrameTree, PlanarPose, RigidPose, TreeError};

use crate::config::{AngleUnit, Config};

fn angle(value: f64, cfg: &Config) -> String {
    let p = cfg.precision;
    match cfg.angle_unit {
        AngleUnit::Radians => format!("{value:.p$} rad"),
        AngleUnit::Degrees => format!("{:.p$}°", value.to_degrees()),
    }
}

pub fn pose(pose: &RigidPose, cfg: &Config) -> String {
    let p = cfg.precision;
    let t = pose.translation;
    let q = pose.rotation;
    format!(
        "translation ({:.p$}, {:.p$}, {:.p$})  rotation xyzw ({:.p$}, {:.p$}, {:.p$}, {:.p$})  yaw {}",
        t.x,
        t.y,
        t.z,
        q.x,
        q.y,
        q.z,
        q.w,
        angle(q.yaw(), cfg)
    )
}

pub fn planar(pose: &PlanarPose, cfg: &Config) -> String {
    let p = cfg.precision;
    format!(
        "x {:.p$}  y {:.p$}  angle {}",
        pose.x,
        pose.y,
        angle(pose.angle, cfg)
    )
}

/// One line per diagnostic, numbered from 1.
pub fn diagnostics(problems: &[TreeError]) -> Vec<String> {
    problems
        .iter()
        .enumerate()
        .map(|(i, problem)| format!("{:>3}. {problem}", i + 1))
        .collect()
}

/// Indented hierarchy starting at the root, children sorted by name.
pub fn hierarchy(tree: &FrameTree) -> Vec<String> {
    let mut lines = Vec::with_capacity(tree.len());
    // Depth-first with an explicit stack; children pushed in reverse so they
    // pop in sorted order.
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((frame, level)) = stack.pop() {
        lines.push(format!("{}{frame}", "  ".repeat(level)));
        if let Ok(children) = tree.children(frame.as_str()) {
            stack.extend(children.into_iter().rev().map(|c| (c, level + 1)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use frametree_core::{FrameName, Quaternion, Vec3, build, edge_map};
    use std::f64::consts::FRAC_PI_2;

    fn cfg(unit: AngleUnit, precision: usize) -> Config {
        Config {
            angle_unit: unit,
            precision,
            ..Config::default()
        }
    }

    #[test]
    fn pose_uses_precision_and_unit() {
        let p = RigidPose::new(Vec3::new(1.0, -1.0, 0.5), Quaternion::from_yaw(FRAC_PI_2));
        let text = pose(&p, &cfg(AngleUnit::Degrees, 2));
        assert!(text.starts_with("translation (1.00, -1.00, 0.50)"), "got: {text}");
        assert!(text.ends_with("yaw 90.00°"), "got: {text}");

        let text = pose(&RigidPose::identity(), &cfg(AngleUnit::Radians, 1));
        assert!(text.contains("rotation xyzw (0.0, 0.0, 0.0, 1.0)"), "got: {text}");
        assert!(text.ends_with("yaw 0.0 rad"), "got: {text}");
    }

    #[test]
    fn planar_formats_all_fields() {
        let text = planar(
            &PlanarPose {
                x: 2.0,
                y: 3.0,
                angle: 0.25,
            },
            &cfg(AngleUnit::Radians, 2),
        );
        assert_eq!(text, "x 2.00  y 3.00  angle 0.25 rad");
    }

    #[test]
    fn diagnostics_are_numbered() {
        let lines = diagnostics(&[
            TreeError::NoRoot,
            TreeError::CycleDetected {
                frame: FrameName::new("a"),
            },
        ]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. "));
        assert!(lines[1].contains("'a'"));
    }

    #[test]
    fn hierarchy_is_indented_and_sorted() {
        let tree = build(&edge_map([
            ("shoulder", "body", RigidPose::identity()),
            ("hand", "shoulder", RigidPose::identity()),
            ("head", "body", RigidPose::identity()),
        ]))
        .unwrap();
        assert_eq!(
            hierarchy(&tree),
            vec!["body", "  head", "  shoulder", "    hand"]
        );
    }
}
