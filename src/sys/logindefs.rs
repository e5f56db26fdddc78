//! UID/GID ranges from `login.defs` and the bounds filtering built on them.
//!
//! Each of `UID_MIN`, `UID_MAX`, `GID_MIN` and `GID_MAX` is read independently:
//! the first line that starts with the keyword, followed by whitespace and
//! digits, wins. A missing, zero or unparseable value falls back to the
//! default for that field only. Values above `u32::MAX` count as unparseable.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::accounts::{Account, Group};

pub const DEFAULT_MIN_ID: u32 = 500;
pub const DEFAULT_MAX_ID: u32 = 60000;

const FIELDS: [&str; 4] = ["UID_MIN", "UID_MAX", "GID_MIN", "GID_MAX"];

static FIELD_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    FIELDS
        .iter()
        .filter_map(|key| {
            let re = Regex::new(&format!(r"(?m)^{key}\s+(\d+)")).ok()?;
            Some((*key, re))
        })
        .collect()
});

/// Inclusive UID and GID ranges offered in the owner/group selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdBounds {
    pub min_uid: u32,
    pub max_uid: u32,
    pub min_gid: u32,
    pub max_gid: u32,
}

impl Default for IdBounds {
    fn default() -> Self {
        Self {
            min_uid: DEFAULT_MIN_ID,
            max_uid: DEFAULT_MAX_ID,
            min_gid: DEFAULT_MIN_ID,
            max_gid: DEFAULT_MAX_ID,
        }
    }
}

impl IdBounds {
    /// Build bounds from the text of a login.defs file, or defaults when the
    /// file is absent.
    pub fn from_login_defs(contents: Option<&str>) -> Self {
        let mut bounds = Self::default();
        let Some(text) = contents else { return bounds };
        if let Some(v) = parse_field(text, "UID_MIN") {
            bounds.min_uid = v;
        }
        if let Some(v) = parse_field(text, "UID_MAX") {
            bounds.max_uid = v;
        }
        if let Some(v) = parse_field(text, "GID_MIN") {
            bounds.min_gid = v;
        }
        if let Some(v) = parse_field(text, "GID_MAX") {
            bounds.max_gid = v;
        }
        bounds
    }

    pub fn uid_in_range(&self, uid: u32) -> bool {
        uid >= self.min_uid && uid <= self.max_uid
    }

    pub fn gid_in_range(&self, gid: u32) -> bool {
        gid >= self.min_gid && gid <= self.max_gid
    }
}

/// Value of one of the four range keys at the start of a line, `None` when
/// absent, zero or out of range.
pub fn parse_field(text: &str, key: &str) -> Option<u32> {
    let (_, re) = FIELD_PATTERNS.iter().find(|(k, _)| *k == key)?;
    let digits = re.captures(text)?.get(1)?.as_str();
    let value = match digits.parse::<u32>() {
        Ok(v) => v,
        Err(e) => {
            debug!(key, value = digits, error = %e, "login.defs value out of range, using default");
            return None;
        }
    };
    (value != 0).then_some(value)
}

pub fn filter_accounts(accounts: &[Account], bounds: &IdBounds) -> Vec<Account> {
    accounts.iter().filter(|a| bounds.uid_in_range(a.uid)).cloned().collect()
}

pub fn filter_groups(groups: &[Group], bounds: &IdBounds) -> Vec<Group> {
    groups.iter().filter(|g| bounds.gid_in_range(g.gid)).cloned().collect()
}
