pub mod components;
pub mod dialogs;
pub mod listing;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let who = crate::sys::current_username().unwrap_or_else(|| "unknown".to_string());
    let p = Paragraph::new(format!(
        "fileops-tui ({who})  n: new dir; L: link; d: delete; r: rename; p: permissions; S: sudo; ?: help; q: quit"
    ))
    .block(
        Block::default()
            .title("fileops-tui")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    listing::render_listing(f, root[1], app);
    components::render_status_bar(f, root[2], app);

    if app.dialogs.is_open() {
        dialogs::render_dialog(f, f.area(), app);
    } else if app.show_help {
        components::render_help_modal(f, f.area(), app);
    }
}
