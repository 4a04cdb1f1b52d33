//! GitRepo runs the `git` binary against the data directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{debug, info};

use super::GitClient;
use crate::error::{KarteiError, Result};
use crate::id::generate_id;

/// Paths git should never stage (editor and tool lock files).
const EXCLUDE_LOCK_FILES: &str = ":!.lock";

/// Git operations on the data directory.
#[derive(Debug, Clone)]
pub struct GitRepo {
    /// Working tree root (the data directory)
    root: PathBuf,
}

impl GitRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run git in the working tree and capture its output.
    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| KarteiError::Git(format!("Failed to execute git {}: {}", args[0], e)))
    }

    /// Populate the data directory from a remote repository.
    ///
    /// An empty or missing directory is cloned into directly. Otherwise the
    /// remote is cloned next to it and its files are moved in, overwriting
    /// local files with the same path.
    pub fn clone_from(&self, url: &str) -> Result<()> {
        let empty = match fs::read_dir(&self.root) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        };

        if empty {
            if let Some(parent) = self.root.parent() {
                fs::create_dir_all(parent)?;
            }
            clone(url, &self.root)?;
        } else {
            let name = self
                .root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "data".to_string());
            let scratch = self.root.with_file_name(format!(".{}-clone-{}", name, generate_id()));

            let result = clone(url, &scratch).and_then(|_| move_tree(&scratch, &self.root));
            if scratch.exists() {
                fs::remove_dir_all(&scratch)?;
            }
            result?;
        }

        if !self.is_initialized() {
            return Err(KarteiError::Git(format!(
                "Clone of {} did not produce a repository at {}",
                url,
                self.root.display()
            )));
        }

        info!("Cloned {} into {}", url, self.root.display());
        Ok(())
    }
}

impl GitClient for GitRepo {
    fn is_initialized(&self) -> bool {
        self.root.join(".git").exists()
    }

    fn add_all(&self) -> Result<()> {
        let output = self.run(&["add", "--all", "--", EXCLUDE_LOCK_FILES])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Ignored paths in the pathspec are reported but nothing is wrong
            if !stderr.contains("ignored by one of your .gitignore files") {
                return Err(KarteiError::Git(format!("Failed to stage changes: {}", stderr)));
            }
        }

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let output = self.run(&["commit", "-m", message])?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if stdout.contains("nothing to commit") {
                return Ok(());
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KarteiError::Git(format!("Failed to commit changes: {}{}", stdout, stderr)));
        }

        Ok(())
    }

    fn pull(&self) -> Result<()> {
        let output = self.run(&["pull"])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KarteiError::Git(format!("Failed to pull: {}", stderr)));
        }

        Ok(())
    }

    fn push(&self) -> Result<()> {
        let output = self.run(&["push"])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KarteiError::Git(format!("Failed to push: {}", stderr)));
        }

        Ok(())
    }
}

fn clone(url: &str, target: &Path) -> Result<()> {
    let target_str = target
        .to_str()
        .ok_or_else(|| KarteiError::Git(format!("Non UTF-8 path: {}", target.display())))?;
    let output = Command::new("git")
        .args(["clone", url, target_str])
        .output()
        .map_err(|e| KarteiError::Git(format!("Failed to execute git clone: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(KarteiError::Git(format!("Failed to clone {}: {}", url, stderr)));
    }

    Ok(())
}

/// Move every file under `src` to the same relative path under `dst`.
fn move_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            move_tree(&entry.path(), &target)?;
        } else {
            if target.exists() {
                fs::remove_file(&target)?;
            }
            fs::rename(entry.path(), &target)?;
        }
    }
    Ok(())
}
