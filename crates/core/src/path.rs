//! Dataset path mapping
//!
//! Pure functions converting local filesystem paths to and from remote
//! object-key prefixes relative to a dataset root, and validating that a
//! candidate path lies within that root.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path, resolving `.` and `..` components without
/// touching the filesystem.
///
/// `..` segments that would climb above the root of an absolute path are
/// dropped; on a relative path they are preserved at the front.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir),
            },
            _ => out.push(component),
        }
    }
    out
}

/// Component-wise relative path from `base` to `target`.
///
/// Both paths must already be normalized absolute paths. The shared prefix
/// is stripped and each remaining `base` component becomes a `..` segment.
/// Equal paths yield an empty path.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push(Component::ParentDir);
    }
    for component in &target[common..] {
        out.push(component.as_os_str());
    }
    out
}

/// Strict containment test: `child` lies within (or equals) `root` when the
/// relative path from `root` to `child` does not begin with a `..` segment.
pub fn is_within(root: &Path, child: &Path) -> bool {
    !relative_path(root, child).starts_with("..")
}

/// Resolve user path arguments against `cwd`.
///
/// An empty argument list denotes the current directory itself. Arguments
/// are resolved lexically; no existence check happens here (push and pull
/// have different existence requirements).
pub fn to_absolute_paths(args: &[String], cwd: &Path) -> Vec<PathBuf> {
    if args.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        args.iter().map(|arg| normalize(&cwd.join(arg))).collect()
    }
}

/// Validate that every resolved path is contained in the dataset root,
/// additionally requiring local existence when `require_exists` is set
/// (push). Collects every violation before failing and reports the
/// original argument strings, not the resolved paths.
pub fn validate_within_root(
    root: &Path,
    args: &[String],
    abs_paths: &[PathBuf],
    require_exists: bool,
) -> Result<(), Vec<String>> {
    let mut invalid = Vec::new();
    for (i, abs_path) in abs_paths.iter().enumerate() {
        let ok = is_within(root, abs_path) && (!require_exists || abs_path.exists());
        if !ok {
            // args is empty when the single implicit "." argument is in play
            invalid.push(args.get(i).cloned().unwrap_or_else(|| ".".to_owned()));
        }
    }
    if invalid.is_empty() { Ok(()) } else { Err(invalid) }
}

/// Remote object-key prefix of each absolute path, relative to the dataset
/// root, using forward slashes regardless of the local path convention.
/// The root itself maps to the empty string, never `"."`.
pub fn to_remote_prefixes(root: &Path, abs_paths: &[PathBuf]) -> Vec<String> {
    abs_paths
        .iter()
        .map(|abs_path| {
            relative_path(root, abs_path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_normalize_removes_dot_segments() {
        assert_eq!(normalize(Path::new("/a/./b")), PathBuf::from("/a/b"));
        assert_eq!(normalize(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/..")), PathBuf::from("/a"));
    }

    #[test]
    fn test_normalize_does_not_climb_above_root() {
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent_on_relative_paths() {
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_relative_path_inside() {
        assert_eq!(
            relative_path(Path::new("/data"), Path::new("/data/raw/img.png")),
            PathBuf::from("raw/img.png")
        );
    }

    #[test]
    fn test_relative_path_equal_is_empty() {
        assert_eq!(
            relative_path(Path::new("/data"), Path::new("/data")),
            PathBuf::new()
        );
    }

    #[test]
    fn test_relative_path_outside() {
        assert_eq!(
            relative_path(Path::new("/data"), Path::new("/other")),
            PathBuf::from("../other")
        );
        assert_eq!(
            relative_path(Path::new("/data/raw"), Path::new("/data")),
            PathBuf::from("..")
        );
    }

    #[test]
    fn test_is_within() {
        assert!(is_within(Path::new("/data"), Path::new("/data")));
        assert!(is_within(Path::new("/data"), Path::new("/data/raw")));
        assert!(!is_within(Path::new("/data"), Path::new("/other")));
        assert!(!is_within(Path::new("/data"), Path::new("/")));
        // the sibling reached through the root must also be rejected
        assert!(!is_within(
            Path::new("/data"),
            &normalize(Path::new("/data/../sibling"))
        ));
    }

    #[test]
    fn test_is_within_accepts_dotted_sibling_names() {
        // "..data" is an ordinary name, not a traversal segment
        assert!(is_within(Path::new("/data"), Path::new("/data/..cache")));
    }

    #[test]
    fn test_to_absolute_paths_empty_args_is_cwd() {
        let paths = to_absolute_paths(&[], Path::new("/data/raw"));
        assert_eq!(paths, vec![PathBuf::from("/data/raw")]);
    }

    #[test]
    fn test_to_absolute_paths_resolves_relative_to_cwd() {
        let paths = to_absolute_paths(&s(&["img.png", "./sub/x", "../up"]), Path::new("/data/raw"));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/data/raw/img.png"),
                PathBuf::from("/data/raw/sub/x"),
                PathBuf::from("/data/up"),
            ]
        );
    }

    #[test]
    fn test_to_absolute_paths_keeps_absolute_arguments() {
        let paths = to_absolute_paths(&s(&["/data/raw/a"]), Path::new("/elsewhere"));
        assert_eq!(paths, vec![PathBuf::from("/data/raw/a")]);
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let root = Path::new("/data");
        let args = s(&["./ok", "../escape", "./also/ok"]);
        let abs = to_absolute_paths(&args, root);

        let invalid = validate_within_root(root, &args, &abs, false).unwrap_err();
        assert_eq!(invalid, vec!["../escape".to_string()]);
    }

    #[test]
    fn test_validate_requires_existence_for_push() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("present"), b"x").unwrap();

        let args = s(&["present", "missing"]);
        let abs = to_absolute_paths(&args, root);

        assert!(validate_within_root(root, &args, &abs, false).is_ok());
        let invalid = validate_within_root(root, &args, &abs, true).unwrap_err();
        assert_eq!(invalid, vec!["missing".to_string()]);
    }

    #[test]
    fn test_remote_prefixes_are_forward_slash_relative() {
        let root = Path::new("/data");
        let prefixes = to_remote_prefixes(
            root,
            &[
                PathBuf::from("/data/raw/img.png"),
                PathBuf::from("/data/raw"),
            ],
        );
        assert_eq!(prefixes, vec!["raw/img.png".to_string(), "raw".to_string()]);
        assert!(prefixes.iter().all(|p| !p.starts_with('/')));
        assert!(prefixes.iter().all(|p| !p.split('/').any(|c| c == "..")));
    }

    #[test]
    fn test_remote_prefix_of_root_is_empty_string() {
        let prefixes = to_remote_prefixes(Path::new("/data"), &[PathBuf::from("/data")]);
        assert_eq!(prefixes, vec![String::new()]);
    }
}
