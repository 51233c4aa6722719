//! Candidate discovery
//!
//! Every regular file under the root is a candidate, including hidden files
//! and files excluded by `.gitignore`: image folders are not source trees, so
//! none of the walker's standard filters apply. Symlinks to regular files are
//! candidates too; symlinked directories are only descended when following
//! links. Deciding what is an image is left to the validity filter.

use super::types::Warning;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Collect all regular files under `root`.
///
/// Walk errors (unreadable directories, broken links) are returned as
/// warnings instead of aborting the enumeration.
pub fn enumerate_files(root: &Path, follow_symlinks: bool) -> (Vec<PathBuf>, Vec<Warning>) {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(follow_symlinks)
        .build();

    let mut files = Vec::new();
    let mut warnings = Vec::new();

    for entry in walker {
        match entry {
            Ok(entry) => {
                let is_file = entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file() || (ft.is_symlink() && entry.path().is_file()));
                if is_file {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                tracing::warn!("Walk error: {}", e);
                warnings.push(Warning {
                    message: format!("Walk error: {e}"),
                });
            }
        }
    }

    (files, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_enumerates_nested_and_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("top.png"), b"x").unwrap();
        fs::write(root.join("a/b/c/deep.jpg"), b"x").unwrap();
        fs::write(root.join(".hidden/secret.bmp"), b"x").unwrap();
        fs::write(root.join(".gitignore"), "*.png\n").unwrap();

        let (mut files, warnings) = enumerate_files(root, false);
        files.sort();

        assert!(warnings.is_empty());
        let mut expected = vec![
            root.join(".gitignore"),
            root.join(".hidden/secret.bmp"),
            root.join("a/b/c/deep.jpg"),
            root.join("top.png"),
        ];
        expected.sort();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_directories_are_not_candidates() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("empty/dir.png")).unwrap();

        let (files, _) = enumerate_files(temp_dir.path(), false);
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_candidates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        let outside = temp_dir.path().join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(outside.join("nested")).unwrap();
        fs::write(outside.join("target.png"), b"x").unwrap();
        fs::write(outside.join("nested/inner.png"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.join("target.png"), root.join("link.png")).unwrap();
        std::os::unix::fs::symlink(outside.join("nested"), root.join("dir-link")).unwrap();
        std::os::unix::fs::symlink(outside.join("gone.png"), root.join("dangling.png")).unwrap();

        let (files, _) = enumerate_files(&root, false);
        assert_eq!(files, vec![root.join("link.png")]);

        let (mut followed, _) = enumerate_files(&root, true);
        followed.sort();
        let mut expected = vec![root.join("dir-link/inner.png"), root.join("link.png")];
        expected.sort();
        assert_eq!(followed, expected);
    }

    #[test]
    fn test_missing_root_yields_warning() {
        let (files, warnings) = enumerate_files(Path::new("/no/such/root/for/scan-image"), false);
        assert!(files.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
