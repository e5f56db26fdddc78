//! System interaction layer: account/group readers, login.defs bounds, the
//! permission table, and the command-spawning adapter behind every file action.

pub mod accounts;
pub mod logindefs;
pub mod perms;

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::error::ActionError;
use crate::fs::{EntryKind, LinkKind};

pub type OpResult = std::result::Result<(), ActionError>;

/// Filesystem mutations the action dispatchers are built on.
///
/// `SystemAdapter` spawns the usual coreutils; tests substitute a recorder.
pub trait FileOps {
    fn make_directory(&self, path: &Path) -> OpResult;
    fn make_link(&self, kind: LinkKind, original: &str, link: &Path) -> OpResult;
    /// Non-recursive removal: `rmdir` for directories, `rm` for files and for
    /// symlinks whatever they point at.
    fn remove(&self, path: &Path, kind: EntryKind) -> OpResult;
    fn force_remove(&self, path: &Path) -> OpResult;
    fn rename(&self, from: &Path, to: &Path) -> OpResult;
    fn chmod(&self, path: &Path, mode: &str, recursive: bool) -> OpResult;
    fn chown(&self, path: &Path, owner: &str, group: &str, recursive: bool) -> OpResult;
    fn exists(&self, path: &Path) -> bool;
}

/// Runs commands directly, or through `sudo` once a password was supplied.
#[derive(Clone, Debug, Default)]
pub struct SystemAdapter {
    pub sudo_password: Option<String>,
}

impl SystemAdapter {
    pub fn new() -> Self {
        Self { sudo_password: None }
    }

    pub fn with_sudo_password(password: Option<String>) -> Self {
        Self { sudo_password: password }
    }

    pub fn is_privileged(&self) -> bool {
        users::get_current_uid() == 0 || self.sudo_password.is_some()
    }

    /// Check a sudo password without running anything else.
    pub fn validate_sudo(&self) -> OpResult {
        let Some(pw) = &self.sudo_password else {
            return Err(ActionError::new("Authentication required"));
        };
        let output = sudo_validate(pw)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ActionError::new(format_cli_error("sudo -v", &output)))
        }
    }

    fn run(&self, cmd: &str, args: &[&str]) -> OpResult {
        tracing::debug!(cmd, ?args, privileged = self.sudo_password.is_some(), "spawn");
        let output = self
            .spawn(cmd, args)
            .map_err(|e| ActionError::new(format!("failed to execute {}: {}", cmd, e)))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ActionError::new(format_cli_error(cmd, &output)))
        }
    }

    fn spawn(&self, cmd: &str, args: &[&str]) -> std::io::Result<Output> {
        let password = match &self.sudo_password {
            Some(pw) if users::get_current_uid() != 0 => pw,
            _ => {
                return Command::new(cmd)
                    .args(args)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::piped())
                    .output();
            }
        };

        // Populate the sudo timestamp first so the password never mixes with command IO
        let validate = sudo_validate(password)?;
        if !validate.status.success() {
            return Ok(validate);
        }
        Command::new("sudo")
            .arg("-n")
            .arg(cmd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
    }
}

fn sudo_validate(password: &str) -> std::io::Result<Output> {
    use std::io::Write;
    let mut child = Command::new("sudo")
        .args(["-S", "-p", "", "-v"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(password.as_bytes());
        let _ = stdin.write_all(b"\n");
    }
    child.wait_with_output()
}

fn path_arg(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

impl FileOps for SystemAdapter {
    fn make_directory(&self, path: &Path) -> OpResult {
        self.run("mkdir", &["--", &path_arg(path)])
    }

    fn make_link(&self, kind: LinkKind, original: &str, link: &Path) -> OpResult {
        let link = path_arg(link);
        match kind {
            LinkKind::Symbolic => self.run("ln", &["-s", "--", original, &link]),
            LinkKind::Hard => self.run("ln", &["--", original, &link]),
        }
    }

    fn remove(&self, path: &Path, kind: EntryKind) -> OpResult {
        // listing entries carry the target's kind, the link itself is a plain file
        let is_link = std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        match kind {
            EntryKind::Directory if !is_link => self.run("rmdir", &["--", &path_arg(path)]),
            _ => self.run("rm", &["--", &path_arg(path)]),
        }
    }

    fn force_remove(&self, path: &Path) -> OpResult {
        self.run("rm", &["-rf", "--", &path_arg(path)])
    }

    fn rename(&self, from: &Path, to: &Path) -> OpResult {
        self.run("mv", &["--", &path_arg(from), &path_arg(to)])
    }

    fn chmod(&self, path: &Path, mode: &str, recursive: bool) -> OpResult {
        let p = path_arg(path);
        if recursive {
            self.run("chmod", &["-R", mode, "--", &p])
        } else {
            self.run("chmod", &[mode, "--", &p])
        }
    }

    fn chown(&self, path: &Path, owner: &str, group: &str, recursive: bool) -> OpResult {
        let spec = format!("{}:{}", owner, group);
        let p = path_arg(path);
        if recursive {
            self.run("chown", &["-R", &spec, "--", &p])
        } else {
            self.run("chown", &[&spec, "--", &p])
        }
    }

    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok()
    }
}

pub fn format_cli_error(cmd: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("{} returned non-zero status: {}", cmd, output.status)
    } else {
        stderr
    }
}

pub fn current_username() -> Option<String> {
    users::get_user_by_uid(users::get_current_uid())
        .map(|u| u.name().to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};

    fn tmp_dir(tag: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let n = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        p.push(format!("fileops_sys_{tag}_{}_{}", std::process::id(), n));
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn mkdir_then_rmdir() {
        let base = tmp_dir("mkdir");
        let adapter = SystemAdapter::new();
        let target = base.join("sub");
        adapter.make_directory(&target).unwrap();
        assert!(target.is_dir());
        adapter.remove(&target, EntryKind::Directory).unwrap();
        assert!(!target.exists());
        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn rmdir_on_non_empty_directory_reports_stderr() {
        let base = tmp_dir("rmdir");
        let inner = base.join("full");
        fs::create_dir_all(inner.join("child")).unwrap();
        let err = SystemAdapter::new().remove(&inner, EntryKind::Directory).unwrap_err();
        assert!(!err.message().is_empty());
        assert!(inner.exists());
        SystemAdapter::new().force_remove(&inner).unwrap();
        assert!(!inner.exists());
        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn symlink_to_directory_is_removed_as_a_link() {
        let base = tmp_dir("rmlink");
        let real = base.join("real");
        fs::create_dir(&real).unwrap();
        let link = base.join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let entry = crate::fs::FileEntry::from_path(&link).unwrap();
        assert_eq!(entry.kind, EntryKind::Directory);
        SystemAdapter::new().remove(&link, entry.kind).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(real.is_dir());
        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn symlink_and_rename() {
        let base = tmp_dir("link");
        let original = base.join("a.txt");
        fs::write(&original, "x").unwrap();
        let adapter = SystemAdapter::new();
        let link = base.join("b.txt");
        adapter.make_link(LinkKind::Symbolic, &original.to_string_lossy(), &link).unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let moved = base.join("c.txt");
        adapter.rename(&link, &moved).unwrap();
        assert!(adapter.exists(&moved));
        assert!(!adapter.exists(&link));
        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn chmod_applies_octal_mode() {
        use std::os::unix::fs::PermissionsExt;
        let base = tmp_dir("chmod");
        let f = base.join("f");
        fs::write(&f, "x").unwrap();
        SystemAdapter::new().chmod(&f, "640", false).unwrap();
        assert_eq!(fs::metadata(&f).unwrap().permissions().mode() & 0o777, 0o640);
        fs::remove_dir_all(&base).ok();
    }
}
