//! Confirm delete and its force-delete follow-up.

use std::path::PathBuf;

use super::FormState;
use crate::actions::{DeleteRequest, ForceDeleteRequest, Submission};
use crate::fs::{EntryKind, FileEntry};

/// Yes/no confirmation; the prompt is the dialog title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDeleteDialog {
    pub selected: FileEntry,
    pub item_path: PathBuf,
    /// Directory being listed, for history correction.
    pub path: PathBuf,
    pub form: FormState,
}

impl ConfirmDeleteDialog {
    pub fn new(selected: FileEntry, item_path: PathBuf, path: PathBuf) -> Self {
        Self { selected, item_path, path, form: FormState::default() }
    }

    pub fn prompt(&self) -> String {
        match self.selected.kind {
            EntryKind::File => format!("Delete file {}?", self.selected.name),
            EntryKind::Directory => format!("Delete directory {}?", self.selected.name),
        }
    }

    pub fn submit(&mut self) -> Submission {
        self.form.begin_submit();
        Submission::Delete(DeleteRequest {
            selected: self.selected.clone(),
            item_path: self.item_path.clone(),
            path: self.path.clone(),
        })
    }
}

/// Opened with the error of a failed plain delete. A failed force delete
/// leaves no retry: the footer disappears and only cancel remains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForceDeleteDialog {
    pub selected: FileEntry,
    pub item_path: PathBuf,
    pub path: PathBuf,
    pub form: FormState,
}

impl ForceDeleteDialog {
    pub fn new(selected: FileEntry, item_path: PathBuf, path: PathBuf, initial_error: String) -> Self {
        Self { selected, item_path, path, form: FormState::with_error(initial_error) }
    }

    pub fn prompt(&self) -> String {
        match self.selected.kind {
            EntryKind::File => format!("Force delete file {}?", self.selected.name),
            EntryKind::Directory => format!("Force delete directory {}?", self.selected.name),
        }
    }

    pub fn submit(&mut self) -> Submission {
        self.form.begin_submit();
        Submission::ForceDelete(ForceDeleteRequest {
            selected: self.selected.clone(),
            item_path: self.item_path.clone(),
            path: self.path.clone(),
        })
    }

    pub fn fail(&mut self, message: String) {
        self.form.fail_terminal(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::entry;
    use crate::dialogs::Phase;

    #[test]
    fn prompt_names_kind_and_entry() {
        let dir = ConfirmDeleteDialog::new(entry("logs", EntryKind::Directory), "/srv/logs".into(), "/srv".into());
        assert_eq!(dir.prompt(), "Delete directory logs?");
        let file = ConfirmDeleteDialog::new(entry("a.txt", EntryKind::File), "/srv/a.txt".into(), "/srv".into());
        assert_eq!(file.prompt(), "Delete file a.txt?");
    }

    #[test]
    fn force_delete_starts_with_initial_error() {
        let mut d = ForceDeleteDialog::new(
            entry("logs", EntryKind::Directory),
            "/srv/logs".into(),
            "/srv".into(),
            "Directory not empty".into(),
        );
        assert_eq!(d.form.error.as_deref(), Some("Directory not empty"));
        assert_eq!(d.form.phase, Phase::Editing);
        d.submit();
        d.fail("Permission denied".into());
        assert_eq!(d.form.phase, Phase::FailedTerminal);
        assert_eq!(d.form.error.as_deref(), Some("Permission denied"));
    }
}
