//! Modal dialogs for file actions and the host that owns the single active
//! dialog slot.
//!
//! Each dialog is a plain state record: its fields, a [`FormState`] (focus,
//! error message, phase) and named transitions. Dialogs never run commands;
//! [`Dialog::activate`] yields an [`Intent`], and [`DialogHost::resolve`]
//! dispatches it and feeds the outcome back.

pub mod authenticate;
pub mod create_directory;
pub mod create_link;
pub mod delete;
pub mod permissions;
pub mod rename;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::actions::{self, ActionResult, Completion, Submission};
use crate::fs::FileEntry;
use crate::history::History;
use crate::sys::FileOps;

pub use authenticate::AuthenticateDialog;
pub use create_directory::CreateDirectoryDialog;
pub use create_link::CreateLinkDialog;
pub use delete::{ConfirmDeleteDialog, ForceDeleteDialog};
pub use permissions::{EditPermissionsDialog, Resource};
pub use rename::RenameDialog;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    /// A failure with no retry path left; only cancel remains.
    FailedTerminal,
}

/// Focus, error message and phase shared by every dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    pub focus: usize,
    pub error: Option<String>,
    pub phase: Phase,
}

impl Default for FormState {
    fn default() -> Self {
        Self { focus: 0, error: None, phase: Phase::Editing }
    }
}

impl FormState {
    pub fn with_error(message: String) -> Self {
        Self { error: Some(message), ..Self::default() }
    }

    pub fn begin_submit(&mut self) {
        self.phase = Phase::Submitting;
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.phase = Phase::Editing;
    }

    pub fn fail_terminal(&mut self, message: String) {
        self.error = Some(message);
        self.phase = Phase::FailedTerminal;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    Submit,
    /// Edit Permissions on a directory: apply to enclosed files too.
    SubmitRecursive,
    Cancel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub action: ButtonAction,
}

const CANCEL: Button = Button { label: "Cancel", action: ButtonAction::Cancel };

fn primary(label: &'static str) -> Button {
    Button { label, action: ButtonAction::Submit }
}

/// What the user asked for when activating a dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Submit(Submission),
    Authenticate(String),
    Cancel,
}

#[derive(Clone, Debug)]
pub enum Dialog {
    CreateDirectory(CreateDirectoryDialog),
    CreateLink(CreateLinkDialog),
    ConfirmDelete(ConfirmDeleteDialog),
    ForceDelete(ForceDeleteDialog),
    Rename(RenameDialog),
    EditPermissions(Box<EditPermissionsDialog>),
    Authenticate(AuthenticateDialog),
}

impl Dialog {
    pub fn title(&self) -> String {
        match self {
            Dialog::CreateDirectory(_) => "Create directory".to_string(),
            Dialog::CreateLink(_) => "New link".to_string(),
            Dialog::ConfirmDelete(d) => d.prompt(),
            Dialog::ForceDelete(d) => d.prompt(),
            Dialog::Rename(d) => d.title().to_string(),
            Dialog::EditPermissions(d) => d.title().to_string(),
            Dialog::Authenticate(_) => "Authentication required".to_string(),
        }
    }

    pub fn form(&self) -> &FormState {
        match self {
            Dialog::CreateDirectory(d) => &d.form,
            Dialog::CreateLink(d) => &d.form,
            Dialog::ConfirmDelete(d) => &d.form,
            Dialog::ForceDelete(d) => &d.form,
            Dialog::Rename(d) => &d.form,
            Dialog::EditPermissions(d) => &d.form,
            Dialog::Authenticate(d) => &d.form,
        }
    }

    fn form_mut(&mut self) -> &mut FormState {
        match self {
            Dialog::CreateDirectory(d) => &mut d.form,
            Dialog::CreateLink(d) => &mut d.form,
            Dialog::ConfirmDelete(d) => &mut d.form,
            Dialog::ForceDelete(d) => &mut d.form,
            Dialog::Rename(d) => &mut d.form,
            Dialog::EditPermissions(d) => &mut d.form,
            Dialog::Authenticate(d) => &mut d.form,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.form().error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.form().phase
    }

    /// Whether the submit/cancel footer is shown.
    ///
    /// The link dialog keeps its footer while an error is displayed; the
    /// other input dialogs hide it, and force delete hides it only after its
    /// own attempt failed.
    pub fn footer_visible(&self) -> bool {
        match self {
            Dialog::CreateDirectory(d) => d.form.error.is_none(),
            Dialog::Rename(d) => d.form.error.is_none(),
            Dialog::EditPermissions(d) => d.form.error.is_none(),
            Dialog::CreateLink(_) | Dialog::ConfirmDelete(_) | Dialog::Authenticate(_) => true,
            Dialog::ForceDelete(d) => d.form.phase != Phase::FailedTerminal,
        }
    }

    /// Footer buttons, empty while the footer is hidden.
    pub fn buttons(&self) -> Vec<Button> {
        if !self.footer_visible() {
            return Vec::new();
        }
        match self {
            Dialog::CreateDirectory(_) => vec![primary("Create"), CANCEL],
            Dialog::CreateLink(_) => vec![primary("Create link"), CANCEL],
            Dialog::ConfirmDelete(_) => vec![primary("Delete"), CANCEL],
            Dialog::ForceDelete(_) => vec![primary("Force delete"), CANCEL],
            Dialog::Rename(_) => vec![primary("Rename"), CANCEL],
            Dialog::EditPermissions(d) => {
                let mut b = vec![primary("Change")];
                if d.selected.is_dir() {
                    b.push(Button { label: "Change permissions for enclosed files", action: ButtonAction::SubmitRecursive });
                }
                b.push(CANCEL);
                b
            }
            Dialog::Authenticate(_) => vec![primary("Authenticate"), CANCEL],
        }
    }

    /// Number of focusable input fields, before the buttons.
    pub fn field_count(&self) -> usize {
        match self {
            Dialog::CreateDirectory(_) | Dialog::Rename(_) | Dialog::Authenticate(_) => 1,
            Dialog::CreateLink(_) => create_link::FIELD_COUNT,
            Dialog::ConfirmDelete(_) | Dialog::ForceDelete(_) => 0,
            Dialog::EditPermissions(_) => permissions::FIELD_COUNT,
        }
    }

    fn focus_len(&self) -> usize {
        self.field_count() + self.buttons().len()
    }

    pub fn focus(&self) -> usize {
        self.form().focus
    }

    /// The focused footer button, if focus is past the fields.
    pub fn focused_button(&self) -> Option<Button> {
        let focus = self.focus();
        focus.checked_sub(self.field_count()).and_then(|i| self.buttons().get(i).copied())
    }

    pub fn focus_next(&mut self) {
        let len = self.focus_len();
        if len == 0 {
            return;
        }
        let form = self.form_mut();
        form.focus = (form.focus + 1) % len;
    }

    pub fn focus_prev(&mut self) {
        let len = self.focus_len();
        if len == 0 {
            return;
        }
        let form = self.form_mut();
        form.focus = (form.focus + len - 1) % len;
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.focused_text_mut() {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_text_mut() {
            field.pop();
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        let focus = self.focus();
        match self {
            Dialog::CreateDirectory(d) => (focus == 0).then_some(&mut d.name),
            Dialog::Rename(d) => (focus == 0).then_some(&mut d.name),
            Dialog::Authenticate(d) => (focus == 0).then_some(&mut d.password),
            Dialog::CreateLink(d) => d.text_field_mut(focus),
            Dialog::EditPermissions(d) => (focus == permissions::NAME_FIELD).then_some(&mut d.name),
            Dialog::ConfirmDelete(_) | Dialog::ForceDelete(_) => None,
        }
    }

    /// Left/Right on a select, radio group or completable path field.
    pub fn cycle(&mut self, forward: bool) {
        let focus = self.focus();
        match self {
            Dialog::CreateLink(d) => d.cycle(focus, forward),
            Dialog::EditPermissions(d) => d.cycle(focus, forward),
            _ => {}
        }
    }

    /// Enter: press the focused button, or the primary one from a field.
    /// Does nothing while the footer is hidden.
    pub fn activate(&mut self) -> Option<Intent> {
        let buttons = self.buttons();
        let button = match self.focused_button() {
            Some(b) => b,
            None => *buttons.first()?,
        };
        match button.action {
            ButtonAction::Cancel => Some(Intent::Cancel),
            ButtonAction::Submit => self.submit(false),
            ButtonAction::SubmitRecursive => self.submit(true),
        }
    }

    fn submit(&mut self, recursive: bool) -> Option<Intent> {
        let intent = match self {
            Dialog::CreateDirectory(d) => Intent::Submit(d.submit()),
            Dialog::CreateLink(d) => Intent::Submit(d.submit()),
            Dialog::ConfirmDelete(d) => Intent::Submit(d.submit()),
            Dialog::ForceDelete(d) => Intent::Submit(d.submit()),
            Dialog::Rename(d) => Intent::Submit(d.submit()),
            Dialog::EditPermissions(d) => Intent::Submit(d.submit(recursive)),
            Dialog::Authenticate(d) => Intent::Authenticate(d.submit()),
        };
        Some(intent)
    }

    /// Show a failure inside the dialog. Force delete turns terminal.
    pub fn fail(&mut self, message: String) {
        match self {
            Dialog::ForceDelete(d) => d.fail(message),
            Dialog::Authenticate(d) => d.fail(message),
            _ => self.form_mut().fail(message),
        }
        // buttons may have disappeared under the focus
        if self.focus() >= self.focus_len() {
            self.form_mut().focus = 0;
        }
    }
}

/// Result of resolving an intent against the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Closed without side effects.
    Cancelled,
    /// An action succeeded and the dialog closed; listings are stale.
    Completed,
    /// The dialog was replaced by a follow-up dialog.
    Replaced,
    /// The action failed; the dialog stays open showing the error.
    Failed,
    /// A sudo password was entered; the caller validates it.
    Authenticate(String),
}

/// Owns the single active-dialog slot.
#[derive(Debug, Default)]
pub struct DialogHost {
    active: Option<Dialog>,
    ticket: u64,
}

impl DialogHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `dialog`, replacing any open one. Returns a ticket identifying
    /// this opening, used to drop stale background results.
    pub fn show(&mut self, dialog: Dialog) -> u64 {
        self.ticket += 1;
        debug!(ticket = self.ticket, title = %dialog.title(), "show dialog");
        self.active = Some(dialog);
        self.ticket
    }

    pub fn close(&mut self) {
        if self.active.take().is_some() {
            debug!(ticket = self.ticket, "close dialog");
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Dialog> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut Dialog> {
        self.active.as_mut()
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Act on an intent: cancel closes, submissions are dispatched.
    pub fn resolve(&mut self, intent: Intent, ops: &dyn FileOps, history: &mut History) -> HostEvent {
        match intent {
            Intent::Cancel => {
                self.close();
                HostEvent::Cancelled
            }
            Intent::Authenticate(password) => HostEvent::Authenticate(password),
            Intent::Submit(submission) => {
                let result = actions::dispatch(ops, submission, history);
                self.complete(result)
            }
        }
    }

    /// Apply a dispatcher result to the active dialog.
    pub fn complete(&mut self, result: ActionResult) -> HostEvent {
        match result {
            Ok(Completion::Closed) => {
                self.close();
                HostEvent::Completed
            }
            Ok(Completion::ForceDeleteOffered(message)) => {
                let Some(Dialog::ConfirmDelete(d)) = self.active.take() else {
                    return HostEvent::Cancelled;
                };
                self.show(Dialog::ForceDelete(ForceDeleteDialog::new(d.selected, d.item_path, d.path, message)));
                HostEvent::Replaced
            }
            Err(e) => {
                if let Some(d) = self.active.as_mut() {
                    d.fail(e.0);
                }
                HostEvent::Failed
            }
        }
    }
}

// Entry points: each shows one dialog on the host.

pub fn create_directory(host: &mut DialogHost, current_path: &Path) -> u64 {
    host.show(Dialog::CreateDirectory(CreateDirectoryDialog::new(current_path.to_path_buf())))
}

pub fn create_link(host: &mut DialogHost, current_path: &Path, files: &[FileEntry], selected: Option<&FileEntry>) -> u64 {
    host.show(Dialog::CreateLink(CreateLinkDialog::new(current_path.to_path_buf(), files.to_vec(), selected)))
}

pub fn delete_item(host: &mut DialogHost, selected: &FileEntry, item_path: PathBuf, path: &Path) -> u64 {
    host.show(Dialog::ConfirmDelete(ConfirmDeleteDialog::new(selected.clone(), item_path, path.to_path_buf())))
}

pub fn rename_item(host: &mut DialogHost, path: &Path, selected: &FileEntry) -> u64 {
    host.show(Dialog::Rename(RenameDialog::new(path.to_path_buf(), selected.clone())))
}

pub fn edit_permissions(host: &mut DialogHost, selected: &FileEntry, path: &Path) -> u64 {
    host.show(Dialog::EditPermissions(Box::new(EditPermissionsDialog::new(selected.clone(), path.to_path_buf()))))
}

pub fn authenticate(host: &mut DialogHost) -> u64 {
    host.show(Dialog::Authenticate(AuthenticateDialog::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::{entry, RecordingOps};
    use crate::fs::EntryKind;

    fn open_each(host: &mut DialogHost, n: usize) {
        let cwd = Path::new("/srv");
        let f = entry("a.txt", EntryKind::File);
        let d = entry("logs", EntryKind::Directory);
        let _ticket = match n {
            0 => create_directory(host, cwd),
            1 => create_link(host, cwd, &[f.clone()], Some(&f)),
            2 => delete_item(host, &d, cwd.join("logs"), cwd),
            3 => host.show(Dialog::ForceDelete(ForceDeleteDialog::new(
                d.clone(),
                cwd.join("logs"),
                cwd.to_path_buf(),
                "busy".into(),
            ))),
            4 => rename_item(host, cwd, &f),
            5 => edit_permissions(host, &d, cwd),
            _ => unreachable!(),
        };
    }

    #[test]
    fn cancel_closes_every_dialog_without_dispatching() {
        for n in 0..6 {
            let ops = RecordingOps::default();
            let mut host = DialogHost::new();
            let mut history = History::new("/srv".into());
            open_each(&mut host, n);
            let dialog = host.active_mut().unwrap();
            // move focus onto the Cancel button, which is always last
            while dialog.focused_button().map(|b| b.action) != Some(ButtonAction::Cancel) {
                dialog.focus_next();
            }
            let intent = dialog.activate().unwrap();
            assert_eq!(intent, Intent::Cancel);
            assert_eq!(host.resolve(intent, &ops, &mut history), HostEvent::Cancelled);
            assert!(!host.is_open());
            assert!(ops.calls().is_empty(), "dialog {n} dispatched on cancel");
        }
    }

    #[test]
    fn create_directory_error_hides_footer_and_keeps_dialog_open() {
        let ops = RecordingOps::default();
        let mut host = DialogHost::new();
        let mut history = History::new("/srv".into());
        create_directory(&mut host, Path::new("/srv"));
        let intent = host.active_mut().unwrap().activate().unwrap();
        assert_eq!(host.resolve(intent, &ops, &mut history), HostEvent::Failed);
        let d = host.active().unwrap();
        assert_eq!(d.error(), Some("Directory name cannot be empty."));
        assert!(!d.footer_visible());
        assert!(d.buttons().is_empty());
        assert_eq!(host.active_mut().unwrap().activate(), None);
    }

    #[test]
    fn successful_submit_closes_dialog() {
        let ops = RecordingOps::default();
        let mut host = DialogHost::new();
        let mut history = History::new("/srv".into());
        create_directory(&mut host, Path::new("/srv"));
        let d = host.active_mut().unwrap();
        for c in "new".chars() {
            d.insert_char(c);
        }
        let intent = d.activate().unwrap();
        assert_eq!(d.phase(), Phase::Submitting);
        assert_eq!(host.resolve(intent, &ops, &mut history), HostEvent::Completed);
        assert!(!host.is_open());
        assert_eq!(ops.calls(), vec!["mkdir /srv/new"]);
    }

    #[test]
    fn failed_delete_is_replaced_by_force_delete() {
        let ops = RecordingOps::failing(&["rm"]);
        let mut host = DialogHost::new();
        let mut history = History::new("/srv".into());
        let d = entry("logs", EntryKind::Directory);
        let first = delete_item(&mut host, &d, "/srv/logs".into(), Path::new("/srv"));
        let intent = host.active_mut().unwrap().activate().unwrap();
        assert_eq!(host.resolve(intent, &ops, &mut history), HostEvent::Replaced);
        assert!(host.ticket() > first);
        let Some(Dialog::ForceDelete(fd)) = host.active() else { panic!("expected force delete") };
        assert_eq!(fd.form.error.as_deref(), Some("rm failed"));
        assert_eq!(host.active().unwrap().title(), "Force delete directory logs?");
    }

    #[test]
    fn force_delete_failure_is_terminal() {
        let ops = RecordingOps::failing(&["rm-rf"]);
        let mut host = DialogHost::new();
        let mut history = History::new("/srv".into());
        open_each(&mut host, 3);
        assert!(host.active().unwrap().footer_visible());
        let intent = host.active_mut().unwrap().activate().unwrap();
        assert_eq!(host.resolve(intent, &ops, &mut history), HostEvent::Failed);
        let d = host.active().unwrap();
        assert_eq!(d.phase(), Phase::FailedTerminal);
        assert!(!d.footer_visible());
        assert!(d.buttons().is_empty());
        assert_eq!(d.error(), Some("rm-rf failed"));
        assert_eq!(host.active_mut().unwrap().activate(), None);
    }

    #[test]
    fn link_dialog_keeps_footer_on_error() {
        let ops = RecordingOps::default();
        let mut host = DialogHost::new();
        let mut history = History::new("/srv".into());
        create_link(&mut host, Path::new("/srv"), &[], None);
        let intent = host.active_mut().unwrap().activate().unwrap();
        assert_eq!(host.resolve(intent, &ops, &mut history), HostEvent::Failed);
        let d = host.active().unwrap();
        assert_eq!(d.error(), Some("Link name cannot be empty."));
        assert!(d.footer_visible());
        assert_eq!(d.buttons().len(), 2);
    }

    #[test]
    fn enclosed_change_is_offered_for_directories_only() {
        let mut host = DialogHost::new();
        edit_permissions(&mut host, &entry("a.txt", EntryKind::File), Path::new("/srv"));
        let labels: Vec<&str> = host.active().unwrap().buttons().iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Change", "Cancel"]);

        edit_permissions(&mut host, &entry("logs", EntryKind::Directory), Path::new("/srv"));
        let labels: Vec<&str> = host.active().unwrap().buttons().iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Change", "Change permissions for enclosed files", "Cancel"]);
    }

    #[test]
    fn permissions_error_hides_footer() {
        let ops = RecordingOps::failing(&["chmod"]);
        let mut host = DialogHost::new();
        let mut history = History::new("/srv".into());
        edit_permissions(&mut host, &entry("a.txt", EntryKind::File), Path::new("/srv"));
        let d = host.active_mut().unwrap();
        while d.focused_button().map(|b| b.label) != Some("Change") {
            d.focus_next();
        }
        let intent = d.activate().unwrap();
        assert_eq!(host.resolve(intent, &ops, &mut history), HostEvent::Failed);
        let d = host.active().unwrap();
        assert_eq!(d.error(), Some("chmod failed"));
        assert!(!d.footer_visible());
        assert!(d.buttons().is_empty());
        assert_eq!(host.active_mut().unwrap().activate(), None);
        assert_eq!(ops.calls(), vec!["chmod 644 /srv/a.txt"]);
    }

    #[test]
    fn focus_wraps_over_fields_and_buttons() {
        let mut host = DialogHost::new();
        rename_item(&mut host, Path::new("/srv"), &entry("a", EntryKind::File));
        let d = host.active_mut().unwrap();
        assert_eq!(d.focused_button(), None);
        d.focus_next();
        assert_eq!(d.focused_button().map(|b| b.label), Some("Rename"));
        d.focus_next();
        d.focus_next();
        assert_eq!(d.focus(), 0);
        d.focus_prev();
        assert_eq!(d.focused_button().map(|b| b.label), Some("Cancel"));
    }
}
