//! Scoped removal of the run's scratch directories

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Remove `dir` and its contents if it exists.
///
/// Returns whether anything was removed.
pub fn cleanup_dir(dir: &Path) -> std::io::Result<bool> {
    if !dir.exists() {
        debug!("Nothing to remove at {}", dir.display());
        return Ok(false);
    }

    info!("--- Removing {}", dir.display());
    std::fs::remove_dir_all(dir)?;
    Ok(true)
}

/// Removes its directories when dropped
///
/// Held for the whole run, so removal happens on success, stage failure,
/// skip, panic unwind and when the run future is cancelled by Ctrl-C.
#[derive(Debug)]
pub struct CleanupGuard {
    dirs: Vec<PathBuf>,
}

impl CleanupGuard {
    pub fn register<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let dirs: Vec<PathBuf> = dirs.into_iter().collect();
        debug!("Registered cleanup for {:?}", dirs);
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // Each directory is attempted even if an earlier one fails
        for dir in &self.dirs {
            if let Err(e) = cleanup_dir(dir) {
                warn!("Failed to remove {}: {}", dir.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_dir_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("never-created");
        assert!(!cleanup_dir(&missing).unwrap());
    }

    #[test]
    fn test_cleanup_dir_removes_tree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("structured-output/embed-octoai");
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested/out.json"), "[]").unwrap();

        assert!(cleanup_dir(&dir).unwrap());
        assert!(!dir.exists());
        assert!(temp.path().join("structured-output").exists());
    }

    #[test]
    fn test_guard_removes_on_drop() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out");
        let work = temp.path().join("work");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::create_dir_all(&work).unwrap();

        {
            let guard = CleanupGuard::register([output.clone(), work.clone()]);
            assert_eq!(guard.dirs().len(), 2);
            assert!(output.exists());
        }

        assert!(!output.exists());
        assert!(!work.exists());
    }

    #[test]
    fn test_guard_removes_on_unwind() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out");
        std::fs::create_dir_all(&output).unwrap();

        let guarded = output.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = CleanupGuard::register([guarded]);
            panic!("stage blew up");
        });

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_guard_continues_after_missing_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let present = temp.path().join("present");
        std::fs::create_dir_all(&present).unwrap();

        drop(CleanupGuard::register([missing, present.clone()]));

        assert!(!present.exists());
    }
}
