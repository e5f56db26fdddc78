//! Shared UI components (status bar, help overlay, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::keymap::{describe_action, help_actions};

/// Render the bottom status bar with mode, counts and the last message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = if app.dialogs.is_open() {
        "DIALOG"
    } else if app.show_help {
        "HELP"
    } else {
        "NORMAL"
    };
    let sudo = if app.adapter.is_privileged() { "  sudo" } else { "" };
    let history = app.history.entries().len();
    let mut msg = format!(
        "mode: {mode}  entries:{}  history:{}/{}{}",
        app.entries.len(),
        app.history.index() + 1,
        history,
        sudo
    );
    if let Some(status) = &app.status {
        msg.push_str("  ");
        msg.push_str(status);
    }
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help overlay from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 26u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("File listing", Style::default().add_modifier(Modifier::BOLD))),
    ];
    for action in help_actions() {
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("{:>20}: ", describe_action(action))),
            Span::styled(keys.join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Dialogs", Style::default().add_modifier(Modifier::BOLD))));
    for (label, value) in [
        ("Cancel", "Esc"),
        ("Next / previous field", "Tab, BackTab"),
        ("Change selection", "Left, Right"),
        ("Complete path", "Right (link original)"),
        ("Confirm", "Enter"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("{:>20}: ", label)),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help (any key closes)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
