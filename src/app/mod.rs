//! Application state types and entry glue.
//!
//! `AppState` holds the listing of the current directory, the navigation
//! history, the single dialog slot and the background loader. Key handling
//! and the terminal loop live in [`update`].
//!
pub mod config;
pub mod keymap;
pub mod loader;
pub mod update;

use std::path::{Path, PathBuf};

use ratatui::style::Color;
use tracing::{debug, info};

use crate::dialogs::{self, Dialog, DialogHost, Resource};
use crate::fs::{list_directory, FileEntry};
use crate::history::History;
use crate::sys::SystemAdapter;
use keymap::Keymap;
use loader::{DataLoader, DataPaths, LoadResponse};

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub directory: Color,
    pub error: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            directory: Color::Rgb(0x89, 0xb4, 0xfa),    // blue
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Mocha overridden by each recognised `key = color` line.
    pub fn from_str_config(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for (key, val) in config::parse_kv(contents) {
            let Some(color) = Self::parse_color(val) else { continue };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "directory" => theme.directory = color,
                "error" => theme.error = color,
                _ => {}
            }
        }
        theme
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::from_str_config(&contents))
    }

    /// Parse "#RRGGBB", "RRGGBB" or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# fileops-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                _ => "reset".to_string(),
            }
        }

        for (k, v) in [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("directory", self.directory),
            ("error", self.error),
        ] {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        }
        std::fs::write(path, buf)
    }

    /// Load `path` if present, else the config directory copy, else write
    /// and return the defaults.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config::config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        config::ensure_parent(path);
        let _ = t.write_file(path);
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Startup options resolved by the binary.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub start_dir: PathBuf,
    pub data_paths: DataPaths,
    pub theme: Theme,
    pub keymap: Keymap,
}

pub struct AppState {
    pub history: History,
    pub entries: Vec<FileEntry>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    /// Why the current directory could not be listed.
    pub listing_error: Option<String>,
    pub dialogs: DialogHost,
    pub adapter: SystemAdapter,
    pub loader: DataLoader,
    pub data_paths: DataPaths,
    pub theme: Theme,
    pub keymap: Keymap,
    pub status: Option<String>,
    pub show_help: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut app = Self {
            history: History::new(config.start_dir),
            entries: Vec::new(),
            selected_index: 0,
            rows_per_page: 10,
            listing_error: None,
            dialogs: DialogHost::new(),
            adapter: SystemAdapter::new(),
            loader: DataLoader::new(),
            data_paths: config.data_paths,
            theme: config.theme,
            keymap: config.keymap,
            status: None,
            show_help: false,
        };
        app.refresh();
        app
    }

    pub fn current_path(&self) -> &Path {
        self.history.current()
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.selected_index)
    }

    /// Re-read the current directory, keeping the selection on the same
    /// name when it still exists. A directory that vanished is dropped from
    /// the history in favour of an earlier entry or its parent.
    pub fn refresh(&mut self) {
        let keep = self.selected_entry().map(|e| e.name.clone());
        loop {
            let dir = self.current_path().to_path_buf();
            match list_directory(&dir) {
                Ok(entries) => {
                    self.entries = entries;
                    self.listing_error = None;
                    break;
                }
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "listing failed");
                    if dir.exists() || dir.parent().is_none() {
                        self.entries.clear();
                        self.listing_error = Some(e.to_string());
                        break;
                    }
                    // removed from outside: fall back towards the root
                    self.history.remove_under(&dir);
                }
            }
        }
        self.selected_index = keep
            .and_then(|name| self.entries.iter().position(|e| e.name == name))
            .unwrap_or(0)
            .min(self.entries.len().saturating_sub(1));
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.selected_index = 0;
            return;
        }
        let last = self.entries.len() as isize - 1;
        self.selected_index = (self.selected_index as isize + delta).clamp(0, last) as usize;
    }

    fn enter(&mut self, dir: PathBuf) {
        self.history.visit(dir);
        self.selected_index = 0;
        self.entries.clear();
        self.refresh();
    }

    pub fn open_selected(&mut self) {
        let Some(entry) = self.selected_entry().filter(|e| e.is_dir()) else { return };
        let dir = self.current_path().join(&entry.name);
        self.enter(dir);
    }

    pub fn go_parent(&mut self) {
        let current = self.current_path().to_path_buf();
        let Some(parent) = current.parent() else { return };
        let child = current.file_name().map(|n| n.to_string_lossy().into_owned());
        self.enter(parent.to_path_buf());
        if let Some(i) = child.and_then(|n| self.entries.iter().position(|e| e.name == n)) {
            self.selected_index = i;
        }
    }

    pub fn go_back(&mut self) {
        if self.history.back().is_some() {
            self.selected_index = 0;
            self.refresh();
        }
    }

    pub fn go_forward(&mut self) {
        if self.history.forward().is_some() {
            self.selected_index = 0;
            self.refresh();
        }
    }

    fn selected_path(&self) -> Option<(FileEntry, PathBuf)> {
        let entry = self.selected_entry()?.clone();
        let path = self.current_path().join(&entry.name);
        Some((entry, path))
    }

    pub fn open_create_directory(&mut self) {
        let cwd = self.current_path().to_path_buf();
        dialogs::create_directory(&mut self.dialogs, &cwd);
    }

    pub fn open_create_link(&mut self) {
        let cwd = self.current_path().to_path_buf();
        let selected = self.selected_entry().cloned();
        dialogs::create_link(&mut self.dialogs, &cwd, &self.entries, selected.as_ref());
    }

    pub fn open_delete(&mut self) {
        let Some((entry, item_path)) = self.selected_path() else { return };
        let cwd = self.current_path().to_path_buf();
        dialogs::delete_item(&mut self.dialogs, &entry, item_path, &cwd);
    }

    pub fn open_rename(&mut self) {
        let Some((entry, _)) = self.selected_path() else { return };
        let cwd = self.current_path().to_path_buf();
        dialogs::rename_item(&mut self.dialogs, &cwd, &entry);
    }

    /// Open Edit Permissions and start its three background reads.
    pub fn open_edit_permissions(&mut self) {
        let Some(entry) = self.selected_entry().cloned() else { return };
        let cwd = self.current_path().to_path_buf();
        let ticket = dialogs::edit_permissions(&mut self.dialogs, &entry, &cwd);
        self.loader.request_all(ticket, &self.data_paths);
    }

    pub fn open_authenticate(&mut self) {
        dialogs::authenticate(&mut self.dialogs);
    }

    /// Apply finished background reads to the dialog that requested them.
    /// Results for a dialog that has since closed or been replaced are
    /// dropped.
    pub fn poll_loader(&mut self) {
        while let Some(response) = self.loader.try_recv() {
            self.apply_load(response);
        }
    }

    pub fn apply_load(&mut self, response: LoadResponse) {
        if response.ticket() != self.dialogs.ticket() {
            debug!(ticket = response.ticket(), "dropping stale load result");
            return;
        }
        let Some(Dialog::EditPermissions(d)) = self.dialogs.active_mut() else { return };
        match response {
            LoadResponse::Accounts(_, data) => d.accounts_loaded(data.map_or(Resource::Unavailable, Resource::Ready)),
            LoadResponse::Groups(_, data) => d.groups_loaded(data.map_or(Resource::Unavailable, Resource::Ready)),
            LoadResponse::LoginDefs(_, text) => d.login_defs_loaded(text.as_deref()),
        }
    }

    /// Try a sudo password; on success further commands run through sudo.
    pub fn authenticate(&mut self, password: String) {
        let candidate = SystemAdapter::with_sudo_password(Some(password));
        match candidate.validate_sudo() {
            Ok(()) => {
                info!("sudo authentication succeeded");
                self.adapter = candidate;
                self.dialogs.close();
                self.status = Some("Authenticated: commands run through sudo".to_string());
            }
            Err(e) => {
                if let Some(d) = self.dialogs.active_mut() {
                    d.fail(e.0);
                }
            }
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
