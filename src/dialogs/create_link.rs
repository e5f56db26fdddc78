use std::path::{Path, PathBuf};

use super::FormState;
use crate::actions::{CreateLinkRequest, LinkSpec, Submission};
use crate::fs::{sort_by_name, FileEntry, LinkKind};

pub const FIELD_COUNT: usize = 3;
pub const ORIGINAL_FIELD: usize = 0;
pub const NEW_NAME_FIELD: usize = 1;
pub const KIND_FIELD: usize = 2;

/// Link an existing path into `current_path` under a new name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateLinkDialog {
    pub current_path: PathBuf,
    /// Listing of `current_path`, name-sorted, used for completion.
    pub files: Vec<FileEntry>,
    pub original: String,
    pub new_name: String,
    pub kind: LinkKind,
    /// Candidates from the last completion attempt.
    pub suggestions: Vec<String>,
    pub form: FormState,
}

impl CreateLinkDialog {
    pub fn new(current_path: PathBuf, mut files: Vec<FileEntry>, selected: Option<&FileEntry>) -> Self {
        sort_by_name(&mut files);
        let original = match selected {
            Some(entry) => current_path.join(&entry.name).to_string_lossy().into_owned(),
            None => dir_with_slash(&current_path),
        };
        Self {
            current_path,
            files,
            original,
            new_name: String::new(),
            kind: LinkKind::default(),
            suggestions: Vec::new(),
            form: FormState::default(),
        }
    }

    pub(super) fn text_field_mut(&mut self, focus: usize) -> Option<&mut String> {
        match focus {
            ORIGINAL_FIELD => {
                self.suggestions.clear();
                Some(&mut self.original)
            }
            NEW_NAME_FIELD => Some(&mut self.new_name),
            _ => None,
        }
    }

    pub(super) fn cycle(&mut self, focus: usize, forward: bool) {
        match focus {
            ORIGINAL_FIELD if forward => self.complete_original(),
            KIND_FIELD => {
                let next = match self.kind {
                    LinkKind::Symbolic => LinkKind::Hard,
                    LinkKind::Hard => LinkKind::Symbolic,
                };
                self.select_kind(next);
            }
            _ => {}
        }
    }

    pub fn select_kind(&mut self, kind: LinkKind) {
        self.kind = kind;
    }

    pub fn set_original(&mut self, original: impl Into<String>) {
        self.original = original.into();
        self.suggestions.clear();
    }

    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.new_name = name.into();
    }

    /// Extend the original path: a single match is applied, several
    /// matches contribute their common prefix and are kept as suggestions.
    pub fn complete_original(&mut self) {
        let (base, prefix) = split_for_completion(&self.original);
        let candidates = self.candidates(&base, &prefix);
        match candidates.len() {
            0 => self.suggestions.clear(),
            1 => {
                self.original = join_candidate(&base, &candidates[0]);
                self.suggestions.clear();
            }
            _ => {
                let common = common_prefix(&candidates);
                if common.chars().count() > prefix.chars().count() {
                    self.original = join_candidate(&base, &common);
                }
                self.suggestions = candidates;
            }
        }
    }

    fn candidates(&self, base: &Path, prefix: &str) -> Vec<String> {
        let lower = prefix.to_lowercase();
        let names: Vec<String> = if base == self.current_path {
            self.files
                .iter()
                .map(|f| if f.is_dir() { format!("{}/", f.name) } else { f.name.clone() })
                .collect()
        } else {
            let mut v: Vec<String> = std::fs::read_dir(base)
                .map(|rd| {
                    rd.filter_map(|e| e.ok())
                        .map(|e| {
                            let name = e.file_name().to_string_lossy().into_owned();
                            if e.file_type().map(|t| t.is_dir()).unwrap_or(false) { format!("{}/", name) } else { name }
                        })
                        .collect()
                })
                .unwrap_or_default();
            v.sort_by_key(|n| n.to_lowercase());
            v
        };
        names.into_iter().filter(|n| n.to_lowercase().starts_with(&lower)).collect()
    }

    pub fn submit(&mut self) -> Submission {
        self.form.begin_submit();
        Submission::CreateLink(CreateLinkRequest {
            current_path: self.current_path.clone(),
            link: LinkSpec {
                original_path: self.original.clone(),
                new_name: self.new_name.clone(),
                kind: self.kind,
            },
        })
    }
}

fn dir_with_slash(p: &Path) -> String {
    let s = p.to_string_lossy();
    if s.ends_with('/') { s.into_owned() } else { format!("{}/", s) }
}

/// Split typed input into the directory to search and the name prefix.
fn split_for_completion(input: &str) -> (PathBuf, String) {
    if input.is_empty() {
        return (PathBuf::from("."), String::new());
    }
    if input.ends_with('/') {
        return (PathBuf::from(input), String::new());
    }
    let path = Path::new(input);
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() { PathBuf::from(".") } else { parent.to_path_buf() };
            (parent, name.to_string_lossy().into_owned())
        }
        _ => (PathBuf::from("/"), String::new()),
    }
}

fn join_candidate(base: &Path, candidate: &str) -> String {
    let mut s = base.join(candidate.trim_end_matches('/')).to_string_lossy().into_owned();
    if candidate.ends_with('/') {
        s.push('/');
    }
    s
}

fn common_prefix(candidates: &[String]) -> String {
    let Some(first) = candidates.first() else { return String::new() };
    let mut len = first.chars().count();
    for c in &candidates[1..] {
        let shared = first.chars().zip(c.chars()).take_while(|(a, b)| a == b).count();
        len = len.min(shared);
    }
    first.chars().take(len).collect()
}
