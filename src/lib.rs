//! Library crate for fileops-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Action dispatchers behind every dialog (`actions`)
//! - Application state, loader, keymap and update loop (`app`)
//! - Dialog state records and the single-slot host (`dialogs`)
//! - Error and result types (`error`)
//! - Directory listing entries (`fs`)
//! - Navigation history (`history`)
//! - System interaction layer: accounts, login.defs, permissions, commands (`sys`)
//! - UI rendering (`ui`)
//!
//! It is used by the `fileops-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod actions;
pub mod app;
pub mod dialogs;
pub mod error;
pub mod fs;
pub mod history;
pub mod sys;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
