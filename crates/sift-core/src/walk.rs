//! Log file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, SiftError};

/// Enumerates candidate log files under `root`, sorted by path.
///
/// Regular files and symlinks that resolve to regular files are included.
/// Symlinked directories are never followed, so link cycles cannot loop.
/// A subdirectory that cannot be read is logged and skipped.
///
/// # Errors
///
/// Returns [`SiftError::DirectoryUnreadable`] if `root` cannot be opened,
/// or [`SiftError::NotADirectory`] if it is a file.
pub fn discover_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|source| SiftError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(SiftError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if is_log_candidate(&entry) {
                    files.push(entry.into_path());
                }
            }
            // The root itself could not be listed
            Err(e) if e.depth() == 0 => {
                return Err(SiftError::DirectoryUnreadable {
                    path: root.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                let path = e.path().unwrap_or(root);
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
            }
        }
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "discovered log files");
    Ok(files)
}

fn is_log_candidate(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        true
    } else if file_type.is_symlink() {
        // fs::metadata follows the link
        fs::metadata(entry.path()).is_ok_and(|m| m.is_file())
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, "").expect("write file");
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn recursive_walk_is_sorted() {
        let dir = TempDir::new().expect("temp dir");
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("a.json"));
        touch(&dir.path().join("sub/deeper/c.xml"));
        fs::create_dir_all(dir.path().join("empty")).expect("mkdir");

        let files = discover_files(dir.path(), true).expect("walk");
        assert_eq!(
            names(dir.path(), &files),
            vec!["a.json", "b.txt", "sub/deeper/c.xml"]
        );
    }

    #[test]
    fn flat_walk_ignores_subdirectories() {
        let dir = TempDir::new().expect("temp dir");
        touch(&dir.path().join("top.txt"));
        touch(&dir.path().join("sub/nested.txt"));

        let files = discover_files(dir.path(), false).expect("walk");
        assert_eq!(names(dir.path(), &files), vec!["top.txt"]);
    }

    #[test]
    fn missing_root_is_unreadable() {
        let dir = TempDir::new().expect("temp dir");
        let result = discover_files(&dir.path().join("nope"), true);
        assert!(matches!(result, Err(SiftError::DirectoryUnreadable { .. })));
    }

    #[test]
    fn file_root_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("single.txt");
        touch(&file);
        let result = discover_files(&file, true);
        assert!(matches!(result, Err(SiftError::NotADirectory(_))));
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let files = discover_files(dir.path(), true).expect("walk");
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("temp dir");
        touch(&dir.path().join("ok.txt"));
        let locked = dir.path().join("locked");
        touch(&locked.join("secret.txt"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        // Root ignores permission bits, so only check when the lock holds.
        let enforced = fs::read_dir(&locked).is_err();
        let files = discover_files(dir.path(), true).expect("walk");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        let found = names(dir.path(), &files);
        assert!(found.contains(&"ok.txt".to_string()));
        if enforced {
            assert_eq!(found, vec!["ok.txt"]);
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_to_files_included_directory_links_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().expect("temp dir");
        let outside = TempDir::new().expect("temp dir");
        touch(&outside.path().join("linked.txt"));
        touch(&outside.path().join("inner/hidden.txt"));

        symlink(outside.path().join("linked.txt"), dir.path().join("link.txt"))
            .expect("file symlink");
        symlink(outside.path().join("inner"), dir.path().join("dirlink")).expect("dir symlink");
        symlink(dir.path(), dir.path().join("loop")).expect("loop symlink");

        let files = discover_files(dir.path(), true).expect("walk");
        assert_eq!(names(dir.path(), &files), vec!["link.txt"]);
    }
}
