use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::sys::perms::{mode_string, symbolic};

pub fn render_listing(f: &mut Frame, area: Rect, app: &mut AppState) {
    let title = format!("{}", app.current_path().display());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if let Some(err) = &app.listing_error {
        let p = Paragraph::new(err.clone())
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(app.theme.error))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.entries.len());
    let slice = &app.entries[start..end];

    let rows = slice.iter().enumerate().map(|(i, e)| {
        let absolute_index = start + i;
        let mut style = if e.is_dir() {
            Style::default().fg(app.theme.directory)
        } else {
            Style::default().fg(app.theme.text)
        };
        if absolute_index == app.selected_index {
            style = Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD);
        }
        let name = if e.is_dir() { format!("{}/", e.name) } else { e.name.clone() };
        Row::new(vec![
            Cell::from(name),
            Cell::from(symbolic(&e.permissions)),
            Cell::from(mode_string(&e.permissions)),
            Cell::from(e.owner.clone()),
            Cell::from(e.group.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(50),
        Constraint::Length(10),
        Constraint::Length(4),
        Constraint::Length(14),
        Constraint::Length(14),
    ];
    let header = Row::new(vec!["NAME", "ACCESS", "MODE", "OWNER", "GROUP"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}
