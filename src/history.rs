use std::path::{Path, PathBuf};

/// Directory navigation history with a cursor, browser style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    entries: Vec<PathBuf>,
    index: usize,
}

impl History {
    pub fn new(start: PathBuf) -> Self {
        Self { entries: vec![start], index: 0 }
    }

    pub fn current(&self) -> &Path {
        &self.entries[self.index]
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Record a visit; forward entries are dropped.
    pub fn visit(&mut self, path: PathBuf) {
        if self.current() == path {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<&Path> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Path> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    /// Forget `removed` and everything beneath it. The cursor stays on the
    /// nearest surviving entry at or before its old position.
    pub fn remove_under(&mut self, removed: &Path) {
        let parent = removed.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("/"));
        self.remove_under_or(removed, &parent);
    }

    /// Like [`History::remove_under`], landing on `fallback` when nothing survives.
    pub fn remove_under_or(&mut self, removed: &Path, fallback: &Path) {
        let old_index = self.index;
        let mut kept = Vec::with_capacity(self.entries.len());
        let mut new_index = None;
        for (i, entry) in self.entries.drain(..).enumerate() {
            if entry.starts_with(removed) {
                continue;
            }
            // adjacent duplicates left behind by the removal collapse into one
            if kept.last() != Some(&entry) {
                kept.push(entry);
            }
            if i <= old_index {
                new_index = Some(kept.len() - 1);
            }
        }
        if kept.is_empty() {
            kept.push(fallback.to_path_buf());
        }
        self.entries = kept;
        self.index = new_index.unwrap_or(0).min(self.entries.len() - 1);
    }

    /// Rewrite entries at or beneath `from` to live under `to`.
    pub fn rename_prefix(&mut self, from: &Path, to: &Path) {
        for entry in self.entries.iter_mut() {
            if let Ok(rest) = entry.strip_prefix(from) {
                *entry = if rest.as_os_str().is_empty() { to.to_path_buf() } else { to.join(rest) };
            }
        }
    }
}
