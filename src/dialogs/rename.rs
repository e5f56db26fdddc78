use std::path::PathBuf;

use super::FormState;
use crate::actions::{RenameRequest, Submission};
use crate::fs::{EntryKind, FileEntry};

/// Rename the selected entry inside `path`; the name starts as the current one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameDialog {
    pub path: PathBuf,
    pub selected: FileEntry,
    pub name: String,
    pub form: FormState,
}

impl RenameDialog {
    pub fn new(path: PathBuf, selected: FileEntry) -> Self {
        let name = selected.name.clone();
        Self { path, selected, name, form: FormState::default() }
    }

    pub fn title(&self) -> &'static str {
        match self.selected.kind {
            EntryKind::File => "Rename file",
            EntryKind::Directory => "Rename directory",
        }
    }

    pub fn field_label(&self) -> &'static str {
        match self.selected.kind {
            EntryKind::File => "File name",
            EntryKind::Directory => "Directory name",
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn submit(&mut self) -> Submission {
        self.form.begin_submit();
        Submission::Rename(RenameRequest {
            path: self.path.clone(),
            selected: self.selected.clone(),
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::entry;

    #[test]
    fn prefilled_with_current_name() {
        let d = RenameDialog::new("/srv".into(), entry("notes.md", EntryKind::File));
        assert_eq!(d.name, "notes.md");
        assert_eq!(d.title(), "Rename file");
        assert_eq!(d.field_label(), "File name");
    }

    #[test]
    fn directory_labels() {
        let mut d = RenameDialog::new("/srv".into(), entry("logs", EntryKind::Directory));
        assert_eq!(d.title(), "Rename directory");
        d.set_name("archive");
        let Submission::Rename(req) = d.submit() else { panic!("wrong submission") };
        assert_eq!(req.name, "archive");
        assert_eq!(req.selected.name, "logs");
        assert_eq!(req.path, PathBuf::from("/srv"));
    }
}
