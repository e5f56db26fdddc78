//! Action dispatchers: validate a dialog's submission, run the filesystem
//! mutation through [`FileOps`], and report how the dialog should proceed.
//!
//! A dispatcher never touches the dialog itself. It returns a
//! [`Completion`] on success (close, or hand over to force delete) and an
//! [`ActionError`] whose message the dialog shows as-is.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{action_error, ActionError};
use crate::fs::{EntryKind, FileEntry, LinkKind};
use crate::history::History;
use crate::sys::perms::{mode_string, AccessLevel};
use crate::sys::FileOps;

/// How a successful dispatch ends the current dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Closed,
    /// Plain delete failed; offer force delete with this message.
    ForceDeleteOffered(String),
}

pub type ActionResult = std::result::Result<Completion, ActionError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateDirectoryRequest {
    pub current_path: PathBuf,
    pub name: String,
}

/// Input to link creation. `original_path` is taken as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSpec {
    pub original_path: String,
    pub new_name: String,
    pub kind: LinkKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateLinkRequest {
    pub current_path: PathBuf,
    pub link: LinkSpec,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteRequest {
    pub selected: FileEntry,
    pub item_path: PathBuf,
    /// Directory being listed; history lands here when nothing else survives.
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForceDeleteRequest {
    pub selected: FileEntry,
    pub item_path: PathBuf,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameRequest {
    pub path: PathBuf,
    pub selected: FileEntry,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionsRequest {
    pub owner: String,
    pub group: String,
    pub owner_access: AccessLevel,
    pub group_access: AccessLevel,
    pub other_access: AccessLevel,
    pub name: String,
    pub path: PathBuf,
    pub selected: FileEntry,
    /// Apply to everything enclosed in a directory as well.
    pub recursive: bool,
}

/// What a dialog hands to its dispatcher on submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    CreateDirectory(CreateDirectoryRequest),
    CreateLink(CreateLinkRequest),
    Delete(DeleteRequest),
    ForceDelete(ForceDeleteRequest),
    Rename(RenameRequest),
    EditPermissions(PermissionsRequest),
}

/// Route a submission to its dispatcher.
pub fn dispatch(ops: &dyn FileOps, submission: Submission, history: &mut History) -> ActionResult {
    let res = match submission {
        Submission::CreateDirectory(req) => create_directory(ops, &req),
        Submission::CreateLink(req) => create_link(ops, &req),
        Submission::Delete(req) => delete_item(ops, &req, history),
        Submission::ForceDelete(req) => force_delete(ops, &req, history),
        Submission::Rename(req) => rename_item(ops, &req, history),
        Submission::EditPermissions(req) => edit_permissions(ops, &req, history),
    };
    match &res {
        Ok(Completion::Closed) => {}
        Ok(Completion::ForceDeleteOffered(msg)) => warn!(error = %msg, "delete failed, offering force delete"),
        Err(e) => warn!(error = %e, "action failed"),
    }
    res
}

pub fn create_directory(ops: &dyn FileOps, req: &CreateDirectoryRequest) -> ActionResult {
    if req.name.is_empty() {
        return Err(action_error("Directory name cannot be empty."));
    }
    if req.name.contains('/') {
        return Err(action_error("Directory name cannot contain \"/\"."));
    }
    let target = req.current_path.join(&req.name);
    info!(path = %target.display(), "create directory");
    ops.make_directory(&target)?;
    Ok(Completion::Closed)
}

pub fn create_link(ops: &dyn FileOps, req: &CreateLinkRequest) -> ActionResult {
    let spec = &req.link;
    if spec.original_path.is_empty() {
        return Err(action_error("Original path cannot be empty."));
    }
    if spec.new_name.is_empty() {
        return Err(action_error("Link name cannot be empty."));
    }
    let target = req.current_path.join(&spec.new_name);
    info!(original = %spec.original_path, link = %target.display(), kind = spec.kind.as_str(), "create link");
    ops.make_link(spec.kind, &spec.original_path, &target)?;
    Ok(Completion::Closed)
}

pub fn delete_item(ops: &dyn FileOps, req: &DeleteRequest, history: &mut History) -> ActionResult {
    info!(path = %req.item_path.display(), kind = req.selected.kind.noun(), "delete");
    match ops.remove(&req.item_path, req.selected.kind) {
        Ok(()) => {
            if req.selected.kind == EntryKind::Directory {
                history.remove_under_or(&req.item_path, &req.path);
            }
            Ok(Completion::Closed)
        }
        Err(e) => Ok(Completion::ForceDeleteOffered(e.0)),
    }
}

pub fn force_delete(ops: &dyn FileOps, req: &ForceDeleteRequest, history: &mut History) -> ActionResult {
    info!(path = %req.item_path.display(), "force delete");
    ops.force_remove(&req.item_path)?;
    if req.selected.kind == EntryKind::Directory {
        history.remove_under_or(&req.item_path, &req.path);
    }
    Ok(Completion::Closed)
}

fn validate_name(name: &str) -> std::result::Result<(), ActionError> {
    if name.is_empty() {
        return Err(action_error("Name cannot be empty."));
    }
    if name.contains('/') {
        return Err(action_error("Name cannot contain \"/\"."));
    }
    Ok(())
}

fn move_entry(ops: &dyn FileOps, dir: &Path, selected: &FileEntry, name: &str, history: &mut History) -> std::result::Result<(), ActionError> {
    let from = dir.join(&selected.name);
    let to = dir.join(name);
    if ops.exists(&to) {
        return Err(action_error(format!("{} already exists.", name)));
    }
    info!(from = %from.display(), to = %to.display(), "rename");
    ops.rename(&from, &to)?;
    if selected.kind == EntryKind::Directory {
        history.rename_prefix(&from, &to);
    }
    Ok(())
}

pub fn rename_item(ops: &dyn FileOps, req: &RenameRequest, history: &mut History) -> ActionResult {
    validate_name(&req.name)?;
    if req.name == req.selected.name {
        return Ok(Completion::Closed);
    }
    move_entry(ops, &req.path, &req.selected, &req.name, history)?;
    Ok(Completion::Closed)
}

/// chmod, then chown when owner or group changed, then rename when the name
/// changed. The first failing step ends the attempt.
pub fn edit_permissions(ops: &dyn FileOps, req: &PermissionsRequest, history: &mut History) -> ActionResult {
    let name_changed = req.name != req.selected.name;
    if name_changed {
        validate_name(&req.name)?;
    }
    let target = req.path.join(&req.selected.name);
    let recursive = req.recursive && req.selected.kind == EntryKind::Directory;
    let mode = mode_string(&[req.owner_access, req.group_access, req.other_access]);
    info!(path = %target.display(), %mode, owner = %req.owner, group = %req.group, recursive, "edit permissions");

    ops.chmod(&target, &mode, recursive)?;
    if req.owner != req.selected.owner || req.group != req.selected.group {
        ops.chown(&target, &req.owner, &req.group, recursive)?;
    }
    if name_changed {
        move_entry(ops, &req.path, &req.selected, &req.name, history)?;
    }
    Ok(Completion::Closed)
}


#[cfg(test)]
mod tests {
    use super::testing::{entry, RecordingOps};
    use super::*;

    fn history() -> History {
        History::new(PathBuf::from("/srv"))
    }

    #[test]
    fn create_directory_rejects_empty_name_without_spawning() {
        let ops = RecordingOps::default();
        let req = CreateDirectoryRequest { current_path: "/srv".into(), name: String::new() };
        let err = create_directory(&ops, &req).unwrap_err();
        assert_eq!(err.message(), "Directory name cannot be empty.");
        assert!(ops.calls().is_empty());
    }

    #[test]
    fn create_directory_joins_current_path() {
        let ops = RecordingOps::default();
        let req = CreateDirectoryRequest { current_path: "/srv".into(), name: "data".into() };
        assert_eq!(create_directory(&ops, &req), Ok(Completion::Closed));
        assert_eq!(ops.calls(), vec!["mkdir /srv/data"]);
    }

    #[test]
    fn create_link_passes_kind_through() {
        let ops = RecordingOps::default();
        let req = CreateLinkRequest {
            current_path: "/srv".into(),
            link: LinkSpec { original_path: "/srv/a.txt".into(), new_name: "b".into(), kind: LinkKind::Hard },
        };
        create_link(&ops, &req).unwrap();
        assert_eq!(ops.calls(), vec!["ln hard /srv/a.txt /srv/b"]);
    }

    #[test]
    fn failed_delete_offers_force_delete() {
        let ops = RecordingOps::failing(&["rm"]);
        let mut h = history();
        let req = DeleteRequest { selected: entry("logs", EntryKind::Directory), item_path: "/srv/logs".into(), path: "/srv".into() };
        assert_eq!(delete_item(&ops, &req, &mut h), Ok(Completion::ForceDeleteOffered("rm failed".into())));
    }

    #[test]
    fn directory_delete_corrects_history() {
        let ops = RecordingOps::default();
        let mut h = history();
        h.visit("/srv/logs".into());
        h.visit("/srv".into());
        let req = DeleteRequest { selected: entry("logs", EntryKind::Directory), item_path: "/srv/logs".into(), path: "/srv".into() };
        dispatch(&ops, Submission::Delete(req), &mut h).unwrap();
        assert_eq!(h.entries(), &[PathBuf::from("/srv")]);
    }

    #[test]
    fn emptied_history_lands_on_listed_directory() {
        let ops = RecordingOps::default();
        let mut h = History::new("/srv/logs/2024".into());
        let req = DeleteRequest { selected: entry("logs", EntryKind::Directory), item_path: "/srv/logs".into(), path: "/mnt/srv".into() };
        delete_item(&ops, &req, &mut h).unwrap();
        assert_eq!(h.entries(), &[PathBuf::from("/mnt/srv")]);
        assert_eq!(h.current(), Path::new("/mnt/srv"));
    }

    #[test]
    fn force_delete_failure_is_an_error() {
        let ops = RecordingOps::failing(&["rm-rf"]);
        let req = ForceDeleteRequest { selected: entry("x", EntryKind::File), item_path: "/srv/x".into(), path: "/srv".into() };
        assert_eq!(force_delete(&ops, &req, &mut history()).unwrap_err().message(), "rm-rf failed");
    }

    #[test]
    fn rename_validates_and_rewrites_history() {
        let ops = RecordingOps::default();
        let mut h = history();
        h.visit("/srv/old/sub".into());
        let bad = RenameRequest { path: "/srv".into(), selected: entry("old", EntryKind::Directory), name: "a/b".into() };
        assert!(rename_item(&ops, &bad, &mut h).is_err());
        let req = RenameRequest { name: "new".into(), ..bad };
        rename_item(&ops, &req, &mut h).unwrap();
        assert_eq!(ops.calls(), vec!["mv /srv/old /srv/new"]);
        assert_eq!(h.current(), Path::new("/srv/new/sub"));
    }

    #[test]
    fn rename_refuses_existing_target() {
        let mut ops = RecordingOps::default();
        ops.existing.insert(PathBuf::from("/srv/taken"));
        let req = RenameRequest { path: "/srv".into(), selected: entry("a", EntryKind::File), name: "taken".into() };
        assert_eq!(rename_item(&ops, &req, &mut history()).unwrap_err().message(), "taken already exists.");
        assert!(ops.calls().is_empty());
    }

    #[test]
    fn edit_permissions_runs_only_needed_steps() {
        let ops = RecordingOps::default();
        let base = PermissionsRequest {
            owner: "alice".into(),
            group: "alice".into(),
            owner_access: AccessLevel::ReadWriteExecute,
            group_access: AccessLevel::ReadExecute,
            other_access: AccessLevel::None,
            name: "proj".into(),
            path: "/srv".into(),
            selected: entry("proj", EntryKind::Directory),
            recursive: true,
        };
        edit_permissions(&ops, &base, &mut history()).unwrap();
        assert_eq!(ops.calls(), vec!["chmod -R 750 /srv/proj"]);

        let ops = RecordingOps::default();
        let changed = PermissionsRequest { group: "staff".into(), name: "proj2".into(), recursive: false, ..base };
        edit_permissions(&ops, &changed, &mut history()).unwrap();
        assert_eq!(ops.calls(), vec![
            "chmod 750 /srv/proj",
            "chown alice:staff /srv/proj",
            "mv /srv/proj /srv/proj2",
        ]);
    }

    #[test]
    fn edit_permissions_stops_at_first_failure() {
        let ops = RecordingOps::failing(&["chmod"]);
        let req = PermissionsRequest {
            owner: "bob".into(),
            group: "bob".into(),
            owner_access: AccessLevel::ReadWrite,
            group_access: AccessLevel::ReadOnly,
            other_access: AccessLevel::ReadOnly,
            name: "f".into(),
            path: "/srv".into(),
            selected: entry("f", EntryKind::File),
            recursive: true,
        };
        assert!(edit_permissions(&ops, &req, &mut history()).is_err());
        assert_eq!(ops.calls(), vec!["chmod 644 /srv/f"]);
    }
}
