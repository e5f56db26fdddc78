//! Edit Permissions: name, owner, group and the three access levels.
//!
//! The owner and group selects only offer accounts and groups whose ids lie
//! within the login.defs bounds, and only once both the account and group
//! lists have loaded. Picking an owner the current group does not fit (group
//! gid differs from the owner's primary gid and the owner is no secondary
//! member) moves the group to the owner's primary group.

use std::path::PathBuf;

use super::FormState;
use crate::actions::{PermissionsRequest, Submission};
use crate::fs::{EntryKind, FileEntry};
use crate::sys::accounts::{Account, Group};
use crate::sys::logindefs::{filter_accounts, filter_groups, IdBounds};
use crate::sys::perms::AccessLevel;

pub const FIELD_COUNT: usize = 6;
pub const NAME_FIELD: usize = 0;
pub const OWNER_FIELD: usize = 1;
pub const GROUP_FIELD: usize = 2;
pub const OWNER_ACCESS_FIELD: usize = 3;
pub const GROUP_ACCESS_FIELD: usize = 4;
pub const OTHER_ACCESS_FIELD: usize = 5;

/// An externally loaded data source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Resource<T> {
    #[default]
    Loading,
    Ready(T),
    /// The source could not be read; it never becomes ready.
    Unavailable,
}

impl<T> Resource<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditPermissionsDialog {
    pub selected: FileEntry,
    pub path: PathBuf,
    pub name: String,
    pub owner: String,
    pub group: String,
    pub owner_access: AccessLevel,
    pub group_access: AccessLevel,
    pub other_access: AccessLevel,
    pub accounts: Resource<Vec<Account>>,
    pub groups: Resource<Vec<Group>>,
    pub bounds: IdBounds,
    pub form: FormState,
}

impl EditPermissionsDialog {
    pub fn new(selected: FileEntry, path: PathBuf) -> Self {
        let [owner_access, group_access, other_access] = selected.permissions;
        Self {
            name: selected.name.clone(),
            owner: selected.owner.clone(),
            group: selected.group.clone(),
            owner_access,
            group_access,
            other_access,
            selected,
            path,
            accounts: Resource::Loading,
            groups: Resource::Loading,
            bounds: IdBounds::default(),
            form: FormState::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.selected.kind {
            EntryKind::File => "File properties and access",
            EntryKind::Directory => "Directory properties and access",
        }
    }

    pub fn name_label(&self) -> &'static str {
        match self.selected.kind {
            EntryKind::File => "File name",
            EntryKind::Directory => "Directory name",
        }
    }

    pub fn accounts_loaded(&mut self, accounts: Resource<Vec<Account>>) {
        self.accounts = accounts;
    }

    pub fn groups_loaded(&mut self, groups: Resource<Vec<Group>>) {
        self.groups = groups;
    }

    /// Apply login.defs text; `None` means the file is absent.
    pub fn login_defs_loaded(&mut self, contents: Option<&str>) {
        self.bounds = IdBounds::from_login_defs(contents);
    }

    /// Selectable accounts, `None` until both sources are ready.
    pub fn filtered_accounts(&self) -> Option<Vec<Account>> {
        let (accounts, _) = (self.accounts.ready()?, self.groups.ready()?);
        Some(filter_accounts(accounts, &self.bounds))
    }

    pub fn filtered_groups(&self) -> Option<Vec<Group>> {
        let (_, groups) = (self.accounts.ready()?, self.groups.ready()?);
        Some(filter_groups(groups, &self.bounds))
    }

    pub fn change_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
        let (Some(accounts), Some(groups)) = (self.filtered_accounts(), self.filtered_groups()) else {
            return;
        };
        let current_owner = accounts.iter().find(|a| a.name == self.owner);
        let current_group = groups.iter().find(|g| g.name == self.group);
        let same_gid = current_group.map(|g| g.gid) == current_owner.map(|a| a.gid);
        let is_member = match (current_group, current_owner) {
            (Some(g), Some(a)) => g.has_member(&a.name),
            _ => false,
        };
        if same_gid || is_member {
            return;
        }
        if let Some(primary) = current_owner.and_then(|a| groups.iter().find(|g| g.gid == a.gid)) {
            self.group = primary.name.clone();
        }
    }

    pub fn set_group(&mut self, group: impl Into<String>) {
        self.group = group.into();
    }

    pub fn set_access(&mut self, field: usize, level: AccessLevel) {
        match field {
            OWNER_ACCESS_FIELD => self.owner_access = level,
            GROUP_ACCESS_FIELD => self.group_access = level,
            OTHER_ACCESS_FIELD => self.other_access = level,
            _ => {}
        }
    }

    pub(super) fn cycle(&mut self, focus: usize, forward: bool) {
        match focus {
            OWNER_FIELD => {
                let Some(accounts) = self.filtered_accounts() else { return };
                let names: Vec<String> = accounts.into_iter().map(|a| a.name).collect();
                if let Some(next) = step(&names, &self.owner, forward) {
                    self.change_owner(next);
                }
            }
            GROUP_FIELD => {
                let Some(groups) = self.filtered_groups() else { return };
                let names: Vec<String> = groups.into_iter().map(|g| g.name).collect();
                if let Some(next) = step(&names, &self.group, forward) {
                    self.set_group(next);
                }
            }
            OWNER_ACCESS_FIELD | GROUP_ACCESS_FIELD | OTHER_ACCESS_FIELD => {
                let current = self.access(focus);
                self.set_access(focus, if forward { current.next() } else { current.prev() });
            }
            _ => {}
        }
    }

    pub fn access(&self, field: usize) -> AccessLevel {
        match field {
            GROUP_ACCESS_FIELD => self.group_access,
            OTHER_ACCESS_FIELD => self.other_access,
            _ => self.owner_access,
        }
    }

    pub fn submit(&mut self, recursive: bool) -> Submission {
        self.form.begin_submit();
        Submission::EditPermissions(PermissionsRequest {
            owner: self.owner.clone(),
            group: self.group.clone(),
            owner_access: self.owner_access,
            group_access: self.group_access,
            other_access: self.other_access,
            name: self.name.clone(),
            path: self.path.clone(),
            selected: self.selected.clone(),
            recursive,
        })
    }
}

/// Neighbour of `current` in `options`; the first option when `current` is
/// not offered.
fn step(options: &[String], current: &str, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let next = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % options.len(),
        Some(i) => (i + options.len() - 1) % options.len(),
        None => 0,
    };
    Some(options[next].clone())
}
