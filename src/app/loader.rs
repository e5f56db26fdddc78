//! Background reads for the Edit Permissions dialog.
//!
//! Requests go to a worker thread over a channel and responses are polled
//! with [`DataLoader::try_recv`] from the event loop, so a slow or hung
//! `/etc` read never blocks drawing. Every response carries the ticket of
//! the dialog that asked for it.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use tracing::debug;

use crate::sys::accounts::{read_accounts, read_groups, Account, Group};

/// Where the account, group and login.defs data live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPaths {
    pub passwd: PathBuf,
    pub group: PathBuf,
    pub login_defs: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            passwd: PathBuf::from("/etc/passwd"),
            group: PathBuf::from("/etc/group"),
            login_defs: PathBuf::from("/etc/login.defs"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    Accounts(u64, PathBuf),
    Groups(u64, PathBuf),
    LoginDefs(u64, PathBuf),
}

/// `None` payloads mean the source could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadResponse {
    Accounts(u64, Option<Vec<Account>>),
    Groups(u64, Option<Vec<Group>>),
    LoginDefs(u64, Option<String>),
}

impl LoadResponse {
    pub fn ticket(&self) -> u64 {
        match self {
            LoadResponse::Accounts(t, _) | LoadResponse::Groups(t, _) | LoadResponse::LoginDefs(t, _) => *t,
        }
    }
}

pub struct DataLoader {
    tx: Sender<LoadRequest>,
    rx: Receiver<LoadResponse>,
}

impl DataLoader {
    #[must_use]
    pub fn new() -> Self {
        let (req_tx, req_rx) = channel::<LoadRequest>();
        let (res_tx, res_rx) = channel::<LoadResponse>();

        thread::spawn(move || {
            while let Ok(request) = req_rx.recv() {
                // receiver gone means the app is shutting down
                if res_tx.send(handle_request(request)).is_err() {
                    break;
                }
            }
        });

        Self { tx: req_tx, rx: res_rx }
    }

    pub fn send(&self, req: LoadRequest) {
        let _ = self.tx.send(req);
    }

    /// Queue the three independent reads for one Edit Permissions opening.
    pub fn request_all(&self, ticket: u64, paths: &DataPaths) {
        self.send(LoadRequest::Accounts(ticket, paths.passwd.clone()));
        self.send(LoadRequest::Groups(ticket, paths.group.clone()));
        self.send(LoadRequest::LoginDefs(ticket, paths.login_defs.clone()));
    }

    #[must_use]
    pub fn try_recv(&self) -> Option<LoadResponse> {
        self.rx.try_recv().ok()
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn handle_request(req: LoadRequest) -> LoadResponse {
    match req {
        LoadRequest::Accounts(ticket, path) => {
            let result = read_accounts(&path);
            if let Err(e) = &result {
                debug!(ticket, error = %e, "accounts unavailable");
            }
            LoadResponse::Accounts(ticket, result.ok())
        }
        LoadRequest::Groups(ticket, path) => {
            let result = read_groups(&path);
            if let Err(e) = &result {
                debug!(ticket, error = %e, "groups unavailable");
            }
            LoadResponse::Groups(ticket, result.ok())
        }
        LoadRequest::LoginDefs(ticket, path) => {
            let result = std::fs::read_to_string(&path);
            if let Err(e) = &result {
                debug!(ticket, path = %path.display(), error = %e, "login.defs unavailable");
            }
            LoadResponse::LoginDefs(ticket, result.ok())
        }
    }
}
