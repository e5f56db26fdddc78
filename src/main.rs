//! fileops-tui binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal on exit.
//!
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use fileops_tui::app::config::{config_file_write_path, default_log_path, ensure_parent};
use fileops_tui::app::keymap::Keymap;
use fileops_tui::app::loader::DataPaths;
use fileops_tui::app::{self, AppConfig, Theme};

/// Terminal file manager with create, link, delete, rename and permission dialogs.
#[derive(Parser, Debug)]
#[command(name = "fileops-tui")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Directory to start in (defaults to the working directory)
    path: Option<PathBuf>,

    /// Account database read by the permissions dialog
    #[arg(long, env = "FILEOPS_PASSWD", default_value = "/etc/passwd")]
    passwd: PathBuf,

    /// Group database read by the permissions dialog
    #[arg(long, env = "FILEOPS_GROUP", default_value = "/etc/group")]
    group: PathBuf,

    /// login.defs file providing the UID/GID ranges
    #[arg(long, env = "FILEOPS_LOGIN_DEFS", default_value = "/etc/login.defs")]
    login_defs: PathBuf,

    /// Log file (defaults to the XDG state directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Send tracing output to `path`; logging stays off if it cannot be opened.
fn init_logging(path: Option<PathBuf>) {
    let Some(path) = path.or_else(default_log_path) else { return };
    ensure_parent(&path);
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) else { return };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file);

    let start_dir = match args.path {
        Some(p) => p,
        None => std::env::current_dir().context("resolve working directory")?,
    };
    let start_dir = start_dir
        .canonicalize()
        .with_context(|| format!("open {}", start_dir.display()))?;
    if !start_dir.is_dir() {
        anyhow::bail!("{} is not a directory", start_dir.display());
    }

    let config = AppConfig {
        start_dir,
        data_paths: DataPaths { passwd: args.passwd, group: args.group, login_defs: args.login_defs },
        theme: Theme::load_or_init(&config_file_write_path("theme.conf")),
        keymap: Keymap::load_or_init(&config_file_write_path("keybinds.conf")),
    };

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, config);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = &res {
        tracing::error!(error = %err, "application error");
    }
    res
}
