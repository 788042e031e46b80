use std::env::{current_dir, set_current_dir};
use std::fs::create_dir_all;
use std::io;
use std::path::{Path, PathBuf};

/// Scope guard for the build directory: creates it if absent, enters it, and
/// restores the previous working directory when dropped — on success, failure,
/// or early return alike.
///
/// The working directory is a process-global resource, so at most one build
/// may be live in a process at a time.
pub struct BuildDir {
    prev: PathBuf,
}

impl BuildDir {
    pub fn enter(path: &Path) -> io::Result<BuildDir> {
        create_dir_all(path)?;
        let prev = current_dir()?;
        set_current_dir(path)?;
        Ok(BuildDir { prev })
    }
}

impl Drop for BuildDir {
    fn drop(&mut self) {
        // Nothing much to do if it fails.
        let _ = set_current_dir(&self.prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        let before = current_dir().unwrap();
        {
            let _dir = BuildDir::enter(&tmp.path().join("build")).unwrap();
            assert!(current_dir().unwrap().ends_with("build"));
        }
        assert_eq!(current_dir().unwrap(), before);

        // entering a path that cannot be a directory leaves the cwd alone
        std::fs::write(tmp.path().join("file"), b"").unwrap();
        assert!(BuildDir::enter(&tmp.path().join("file")).is_err());
        assert_eq!(current_dir().unwrap(), before);
    }
}
