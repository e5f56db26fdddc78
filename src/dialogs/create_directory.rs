use std::path::PathBuf;

use super::FormState;
use crate::actions::{CreateDirectoryRequest, Submission};

/// Name a new directory under `current_path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateDirectoryDialog {
    pub current_path: PathBuf,
    pub name: String,
    pub form: FormState,
}

impl CreateDirectoryDialog {
    pub fn new(current_path: PathBuf) -> Self {
        Self { current_path, name: String::new(), form: FormState::default() }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn submit(&mut self) -> Submission {
        self.form.begin_submit();
        Submission::CreateDirectory(CreateDirectoryRequest {
            current_path: self.current_path.clone(),
            name: self.name.clone(),
        })
    }
}
