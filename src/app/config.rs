//! Locations of config and state files.
//!
//! Config files live in `$XDG_CONFIG_HOME/fileops-tui/` (or
//! `~/.config/fileops-tui/`); the log file in `$XDG_STATE_HOME/fileops-tui/`
//! (or `~/.local/state/fileops-tui/`).

use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "fileops-tui";

fn xdg_dir(var: &str, fallback: &[&str]) -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(var).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir).join(APP_DIR));
    }
    let home = std::env::var_os("HOME").filter(|v| !v.is_empty())?;
    let mut p = PathBuf::from(home);
    for part in fallback {
        p.push(part);
    }
    Some(p.join(APP_DIR))
}

pub fn config_dir() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn state_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"])
}

/// Existing config file named `name`, if any.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    config_dir().map(|d| d.join(name)).filter(|p| p.is_file())
}

/// Where to write `name`, creating the config directory. Falls back to the
/// working directory when no home is known.
pub fn config_file_write_path(name: &str) -> PathBuf {
    match config_dir() {
        Some(dir) => {
            let _ = std::fs::create_dir_all(&dir);
            dir.join(name)
        }
        None => PathBuf::from(name),
    }
}

pub fn default_log_path() -> Option<PathBuf> {
    state_dir().map(|d| d.join(format!("{APP_DIR}.log")))
}

/// Parse `key = value` lines, skipping blanks, `#` comments and lines with
/// an empty side.
pub fn parse_kv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| {
            let (k, v) = l.split_once('=')?;
            let (k, v) = (k.trim(), v.trim());
            (!k.is_empty() && !v.is_empty()).then_some((k, v))
        })
        .collect()
}

pub fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let _ = std::fs::create_dir_all(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_skips_comments_and_empty_sides() {
        let parsed = parse_kv("# c\n\ntext = #FFFFFF\n= x\nborder=\n title=reset \n");
        assert_eq!(parsed, vec![("text", "#FFFFFF"), ("title", "reset")]);
    }
}
