//! Loads an [`EdgeMap`] from a `.json` or `.toml` file.
//!
//! Both formats hold a single table keyed by child frame name:
//!
//! ```toml
//! [hand]
//! parent_frame_name = "shoulder"
//! parent_pose_child = { translation = { x = 1.0, y = 0.0, z = 0.0 } }
//!
//! [shoulder]
//! parent_frame_name = "body"
//! parent_pose_child.translation = { x = 0.0, y = 1.0, z = 0.0 }
//! ```
//!
//! Omitted poses (or pose components) default to identity.

use std::fs;
use std::path::Path;

use frametree_core::EdgeMap;
use tracing::debug;

use crate::error::CliError;

pub fn load(path: &Path) -> Result<EdgeMap, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let raw = || {
        fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let edges: EdgeMap = match extension.as_deref() {
        Some("json") => serde_json::from_str(&raw()?).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Some("toml") => toml::from_str(&raw()?).map_err(|source| CliError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
        _ => {
            return Err(CliError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    debug!(path = %path.display(), edges = edges.len(), "snapshot loaded");
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frametree_core::{Quaternion, Vec3};

    #[test]
    fn loads_json_snapshot() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("snap.json");
        fs::write(
            &path,
            r#"{
                "hand": {
                    "parent_frame_name": "shoulder",
                    "parent_pose_child": {
                        "translation": {"x": 1.0, "y": 0.0, "z": 0.0},
                        "rotation": {"x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0}
                    }
                },
                "shoulder": {"parent_frame_name": "body"}
            }"#,
        )
        .expect("write");

        let edges = load(&path).expect("load");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges["hand"].parent_frame_name, "shoulder");
        assert_eq!(
            edges["hand"].parent_pose_child.translation,
            Vec3::new(1.0, 0.0, 0.0)
        );
        assert_eq!(
            edges["shoulder"].parent_pose_child.rotation,
            Quaternion::identity()
        );
    }

    #[test]
    fn loads_toml_snapshot() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("snap.TOML");
        fs::write(
            &path,
            r#"
[hand]
parent_frame_name = "shoulder"
parent_pose_child = { translation = { x = 1.0, y = 0.0, z = 0.0 } }

["arm0.link_sh0"]
parent_frame_name = "body"
parent_pose_child.rotation = { x = 0.0, y = 0.0, z = 0.7071067811865476, w = 0.7071067811865476 }
"#,
        )
        .expect("write");

        let edges = load(&path).expect("load");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges["arm0.link_sh0"].parent_frame_name, "body");
        assert_eq!(
            edges["arm0.link_sh0"].parent_pose_child.translation,
            Vec3::zero()
        );
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load(Path::new("/tmp/snapshot.yaml")).unwrap_err();
        assert!(matches!(err, CliError::UnsupportedFormat { .. }));
    }

    #[test]
    fn reports_missing_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn reports_malformed_json() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"hand\": 3}").expect("write");
        assert!(matches!(load(&path), Err(CliError::Json { .. })));
    }
}
