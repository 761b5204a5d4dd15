//! Duplicate detection against the files already in the target directory.
//!
//! Every check rescans the directory and rehashes each regular file; nothing
//! is cached between calls.

use std::path::Path;

use tracing::debug;

use super::hash::ContentDigest;

/// Returns the name of the first file in `dir` whose content digest equals `candidate`.
///
/// The scan is non-recursive and follows the directory listing order, so with
/// several identical files the first one listed wins. A missing directory has
/// no duplicates; entries that cannot be read are skipped.
#[must_use]
pub fn find_duplicate(dir: &Path, candidate: &ContentDigest) -> Option<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "target directory not readable, no duplicates");
            return None;
        }
    };

    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match ContentDigest::of_file(&path) {
            Ok(existing) if existing == *candidate => {
                let name = entry.file_name().to_string_lossy().into_owned();
                debug!(existing = %name, digest = %candidate, "duplicate content found");
                return Some(name);
            }
            Ok(_) => {}
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable file");
            }
        }
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_duplicate_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let digest = ContentDigest::of_bytes(b"image bytes");
        assert_eq!(find_duplicate(temp_dir.path(), &digest), None);
    }

    #[test]
    fn test_find_duplicate_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let digest = ContentDigest::of_bytes(b"image bytes");
        assert_eq!(
            find_duplicate(&temp_dir.path().join("not-created-yet"), &digest),
            None
        );
    }

    #[test]
    fn test_find_duplicate_matches_identical_content() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("dog.png"), b"other bytes").unwrap();
        std::fs::write(temp_dir.path().join("cat.jpg"), b"image bytes").unwrap();

        let digest = ContentDigest::of_bytes(b"image bytes");
        assert_eq!(
            find_duplicate(temp_dir.path(), &digest),
            Some("cat.jpg".to_string())
        );
    }

    #[test]
    fn test_find_duplicate_ignores_same_name_different_content() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("cat.jpg"), b"old cat").unwrap();

        let digest = ContentDigest::of_bytes(b"new cat");
        assert_eq!(find_duplicate(temp_dir.path(), &digest), None);
    }

    #[test]
    fn test_find_duplicate_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("cat.jpg"), b"image bytes").unwrap();

        let digest = ContentDigest::of_bytes(b"image bytes");
        assert_eq!(find_duplicate(temp_dir.path(), &digest), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_duplicate_skips_dangling_symlink() {
        let temp_dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("gone.jpg"),
            temp_dir.path().join("link.jpg"),
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("cat.jpg"), b"image bytes").unwrap();

        let digest = ContentDigest::of_bytes(b"image bytes");
        assert_eq!(
            find_duplicate(temp_dir.path(), &digest),
            Some("cat.jpg".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_find_duplicate_skips_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        // Root reads through mode 000, so the file would not be unreadable.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked.jpg");
        std::fs::write(&locked, b"image bytes").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        std::fs::write(temp_dir.path().join("cat.jpg"), b"image bytes").unwrap();

        let digest = ContentDigest::of_bytes(b"image bytes");
        let found = find_duplicate(temp_dir.path(), &digest);

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(found, Some("cat.jpg".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_duplicate_unreadable_only_match_is_no_duplicate() {
        use std::os::unix::fs::PermissionsExt;

        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked.jpg");
        std::fs::write(&locked, b"image bytes").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        let digest = ContentDigest::of_bytes(b"image bytes");
        let found = find_duplicate(temp_dir.path(), &digest);

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(found, None);
    }
}
