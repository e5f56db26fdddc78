//! Directory listing entries as the dialogs see them.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::error::{Context, Result};
use crate::sys::perms::{permissions_from_mode, Permissions};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn noun(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkKind {
    #[default]
    Symbolic,
    Hard,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Symbolic => "symbolic",
            LinkKind::Hard => "hard",
        }
    }
}

/// A listed file or directory. Symlinks report the kind of their target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub kind: EntryKind,
    pub owner: String,
    pub group: String,
    pub permissions: Permissions,
}

impl FileEntry {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = fs::symlink_metadata(path)?;
        let is_dir = if meta.file_type().is_symlink() {
            fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
        } else {
            meta.is_dir()
        };
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self {
            name,
            kind: if is_dir { EntryKind::Directory } else { EntryKind::File },
            owner: owner_name(meta.uid()),
            group: group_name(meta.gid()),
            permissions: permissions_from_mode(meta.mode()),
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

fn owner_name(uid: u32) -> String {
    users::get_user_by_uid(uid)
        .map(|u| u.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| uid.to_string())
}

fn group_name(gid: u32) -> String {
    users::get_group_by_gid(gid)
        .map(|g| g.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| gid.to_string())
}

/// List `dir`, directories first, then by case-insensitive name.
/// Entries that vanish between readdir and stat are skipped.
pub fn list_directory(dir: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for item in fs::read_dir(dir).with_ctx(|| format!("list {}", dir.display()))? {
        let Ok(item) = item else { continue };
        if let Ok(entry) = FileEntry::from_path(&item.path()) {
            entries.push(entry);
        }
    }
    sort_entries(&mut entries);
    Ok(entries)
}

pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

/// Case-insensitive name order without the directories-first split, as the
/// link dialog receives its file list.
pub fn sort_by_name(entries: &mut [FileEntry]) {
    entries.sort_by_key(|e| e.name.to_lowercase());
}
