//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings apply to the file listing only; keys inside an open dialog are
//! fixed (Esc, Tab, Left/Right, Enter, text input).

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions for the file listing.
///
/// Several key combinations may map to one action (both `j` and Down move
/// down). The names double as the left-hand side of `keybinds.conf` lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Move up in the listing.
    MoveUp,
    /// Move down in the listing.
    MoveDown,
    /// Move to the previous page of entries.
    PageUp,
    /// Move to the next page of entries.
    PageDown,
    /// Enter the selected directory.
    OpenEntry,
    /// Go to the parent of the current directory.
    ParentDir,
    /// Step back in the navigation history.
    HistoryBack,
    /// Step forward in the navigation history.
    HistoryForward,
    /// Open the create directory dialog.
    CreateDirectory,
    /// Open the create link dialog, seeded from the selection.
    CreateLink,
    /// Ask to delete the selected entry.
    Delete,
    /// Open the rename dialog for the selected entry.
    Rename,
    /// Open the owner, group and access dialog for the selected entry.
    EditPermissions,
    /// Re-read the current directory.
    Refresh,
    /// Enter the sudo password used for file commands.
    Authenticate,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Ignore this key (used for keys that shouldn't trigger anything).
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 18] = [
    KeyAction::Quit,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::OpenEntry,
    KeyAction::ParentDir,
    KeyAction::HistoryBack,
    KeyAction::HistoryForward,
    KeyAction::CreateDirectory,
    KeyAction::CreateLink,
    KeyAction::Delete,
    KeyAction::Rename,
    KeyAction::EditPermissions,
    KeyAction::Refresh,
    KeyAction::Authenticate,
    KeyAction::OpenHelp,
    KeyAction::Ignore,
];

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Enter), KeyAction::OpenEntry);
        bindings.insert((M::NONE, Char('l')), KeyAction::OpenEntry);
        bindings.insert((M::NONE, Right), KeyAction::OpenEntry);
        bindings.insert((M::NONE, Char('h')), KeyAction::ParentDir);
        bindings.insert((M::NONE, Backspace), KeyAction::ParentDir);
        bindings.insert((M::NONE, Left), KeyAction::ParentDir);
        bindings.insert((M::NONE, Char('[')), KeyAction::HistoryBack);
        bindings.insert((M::NONE, Char(']')), KeyAction::HistoryForward);
        bindings.insert((M::NONE, Char('n')), KeyAction::CreateDirectory);
        bindings.insert((M::NONE, Char('L')), KeyAction::CreateLink);
        bindings.insert((M::NONE, Delete), KeyAction::Delete);
        bindings.insert((M::NONE, Char('d')), KeyAction::Delete);
        bindings.insert((M::NONE, Char('r')), KeyAction::Rename);
        bindings.insert((M::NONE, F(2)), KeyAction::Rename);
        bindings.insert((M::NONE, Char('p')), KeyAction::EditPermissions);
        bindings.insert((M::NONE, Char('R')), KeyAction::Refresh);
        bindings.insert((M::NONE, Char('S')), KeyAction::Authenticate);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        Self { bindings }
    }

    /// Load `path`, or the copy in the config directory, or write defaults
    /// to `path` and use them.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = super::config::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        super::config::ensure_parent(path);
        let _ = km.write_file(path);
        km
    }

    /// Defaults overridden by each `Action = KeySpec` line of the file.
    /// Unknown actions and key specs are ignored.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::from_str_config(&contents))
    }

    pub fn from_str_config(contents: &str) -> Self {
        let mut map = Self::default();
        for (lhs, rhs) in super::config::parse_kv(contents) {
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# fileops-tui keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Backspace, Delete, Up, Down, Left, Right, PageUp, PageDown, F2, [, ]\n\n");

        let mut rows: Vec<(String, &'static str)> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a != KeyAction::Ignore)
            .map(|((m, c), a)| (Self::format_key(*m, *c), format_action(*a)))
            .collect();
        rows.sort_by(|a, b| (a.1, &a.0).cmp(&(b.1, &b.0)));
        for (key, action) in rows {
            let _ = writeln!(&mut buf, "{} = {}", action, key);
        }
        std::fs::write(path, buf)
    }

    /// Resolve a key press. Shift is dropped for character keys since the
    /// character already carries the case.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        let mut mods = key.modifiers;
        if matches!(key.code, KeyCode::Char(_)) {
            mods.remove(KeyModifiers::SHIFT);
        }
        self.bindings.get(&(mods, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys
    }

    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Backspace => "Backspace".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            F(n) => format!("F{n}"),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Backspace" => Backspace,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        _ => {
            if let Some(n) = rest.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                F(n)
            } else {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Char(c),
                    _ => return None,
                }
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ALL_ACTIONS.into_iter().find(|a| format_action(*a) == s)
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::OpenEntry => "OpenEntry",
        KeyAction::ParentDir => "ParentDir",
        KeyAction::HistoryBack => "HistoryBack",
        KeyAction::HistoryForward => "HistoryForward",
        KeyAction::CreateDirectory => "CreateDirectory",
        KeyAction::CreateLink => "CreateLink",
        KeyAction::Delete => "Delete",
        KeyAction::Rename => "Rename",
        KeyAction::EditPermissions => "EditPermissions",
        KeyAction::Refresh => "Refresh",
        KeyAction::Authenticate => "Authenticate",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::Ignore => "Ignore",
    }
}

/// Short description shown in the help overlay.
pub fn describe_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::PageUp => "Page up",
        KeyAction::PageDown => "Page down",
        KeyAction::OpenEntry => "Open directory",
        KeyAction::ParentDir => "Parent directory",
        KeyAction::HistoryBack => "Back",
        KeyAction::HistoryForward => "Forward",
        KeyAction::CreateDirectory => "Create directory",
        KeyAction::CreateLink => "New link",
        KeyAction::Delete => "Delete",
        KeyAction::Rename => "Rename",
        KeyAction::EditPermissions => "Permissions",
        KeyAction::Refresh => "Refresh",
        KeyAction::Authenticate => "Authenticate (sudo)",
        KeyAction::OpenHelp => "Help",
        KeyAction::Ignore => "",
    }
}

pub fn help_actions() -> impl Iterator<Item = KeyAction> {
    ALL_ACTIONS.into_iter().filter(|a| *a != KeyAction::Ignore)
}
