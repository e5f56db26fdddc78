//! Rendering of the active dialog: error line, fields, footer buttons.
//!
//! The focused field is marked with `▶`; the focused button is reversed.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, Theme};
use crate::dialogs::permissions::{
    EditPermissionsDialog, GROUP_ACCESS_FIELD, GROUP_FIELD, NAME_FIELD, OTHER_ACCESS_FIELD, OWNER_ACCESS_FIELD,
    OWNER_FIELD,
};
use crate::dialogs::{create_link, Dialog, Resource};
use crate::fs::LinkKind;
use crate::ui::components::centered_rect;

pub fn render_dialog(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dialog) = app.dialogs.active() else { return };
    let theme = &app.theme;
    let focus = dialog.focus();

    let mut lines: Vec<Line> = Vec::new();
    if let Some(err) = dialog.error() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(theme.error))));
        lines.push(Line::raw(""));
    }
    lines.extend(field_lines(dialog, focus, theme));
    let buttons = dialog.buttons();
    if !buttons.is_empty() {
        lines.push(Line::raw(""));
        let field_count = dialog.field_count();
        let mut spans = Vec::new();
        for (i, b) in buttons.iter().enumerate() {
            let style = if focus == field_count + i {
                Style::default().fg(theme.highlight_fg).add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            spans.push(Span::styled(format!("[ {} ]", b.label), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    let width = 70u16.min(area.width.saturating_sub(4)).max(30);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(dialog.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title_style(Style::default().fg(theme.title)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn field<'a>(label: &str, value: String, focused: bool, theme: &Theme) -> Line<'a> {
    let marker = if focused { "▶ " } else { "  " };
    let value_style = if focused {
        Style::default().fg(theme.highlight_fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::raw(format!("{marker}{label}: ")),
        Span::styled(value, value_style),
    ])
}

fn field_lines<'a>(dialog: &Dialog, focus: usize, theme: &Theme) -> Vec<Line<'a>> {
    match dialog {
        Dialog::CreateDirectory(d) => vec![field("Directory name", d.name.clone(), focus == 0, theme)],
        Dialog::Rename(d) => vec![field(d.field_label(), d.name.clone(), focus == 0, theme)],
        Dialog::Authenticate(d) => vec![
            Line::raw("Run file commands through sudo."),
            field("Password", d.masked(), focus == 0, theme),
        ],
        Dialog::ConfirmDelete(_) => Vec::new(),
        Dialog::ForceDelete(_) => vec![Line::raw("The entry and everything inside it will be removed.")],
        Dialog::CreateLink(d) => {
            let mut lines = vec![field("Original", d.original.clone(), focus == create_link::ORIGINAL_FIELD, theme)];
            if !d.suggestions.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", d.suggestions.join("  ")),
                    Style::default().fg(theme.muted),
                )));
            }
            lines.push(field("New name", d.new_name.clone(), focus == create_link::NEW_NAME_FIELD, theme));
            let radio = |k: LinkKind, label: &str| {
                if d.kind == k { format!("(•) {label}") } else { format!("( ) {label}") }
            };
            lines.push(field(
                "Link type",
                format!("{}  {}", radio(LinkKind::Symbolic, "Symbolic"), radio(LinkKind::Hard, "Hard")),
                focus == create_link::KIND_FIELD,
                theme,
            ));
            lines
        }
        Dialog::EditPermissions(d) => permissions_lines(d, focus, theme),
    }
}

/// Owner/group select text. Empty until both accounts and groups are in.
fn select_value<T>(resource: &Resource<T>, filtered_ready: bool, current: &str) -> String {
    match resource {
        Resource::Unavailable => format!("{current} (unavailable)"),
        Resource::Ready(_) if filtered_ready => format!("‹ {current} ›"),
        Resource::Loading | Resource::Ready(_) => String::new(),
    }
}

fn permissions_lines<'a>(d: &EditPermissionsDialog, focus: usize, theme: &Theme) -> Vec<Line<'a>> {
    let ready = d.filtered_accounts().is_some();
    let access = |field_id: usize| format!("‹ {} ›", d.access(field_id).label());
    vec![
        field(d.name_label(), d.name.clone(), focus == NAME_FIELD, theme),
        field("Owner", select_value(&d.accounts, ready, &d.owner), focus == OWNER_FIELD, theme),
        field("Group", select_value(&d.groups, ready, &d.group), focus == GROUP_FIELD, theme),
        field("Owner access", access(OWNER_ACCESS_FIELD), focus == OWNER_ACCESS_FIELD, theme),
        field("Group access", access(GROUP_ACCESS_FIELD), focus == GROUP_ACCESS_FIELD, theme),
        field("Others access", access(OTHER_ACCESS_FIELD), focus == OTHER_ACCESS_FIELD, theme),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_shows_load_state() {
        let loading: Resource<Vec<u8>> = Resource::Loading;
        assert_eq!(select_value(&loading, false, "alice"), "");
        assert_eq!(select_value(&Resource::Ready(vec![1u8]), false, "alice"), "");
        assert_eq!(select_value(&Resource::Ready(vec![1u8]), true, "alice"), "‹ alice ›");
        assert_eq!(select_value::<Vec<u8>>(&Resource::Unavailable, false, "alice"), "alice (unavailable)");
    }
}
