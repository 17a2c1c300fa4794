use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme::Theme;

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("h j k l / arrows", "move focus"),
    ("space / enter / click", "toggle selection"),
    ("esc", "clear selection"),
    ("gg / home / [↑]", "scroll to first item"),
    ("G / end / [↓]", "scroll to last item"),
    ("1-5", "items per row"),
    ("+ / -", "more / fewer items per row"),
    ("m", "switch strip / block rows"),
    ("pgup / pgdn / wheel", "scroll"),
    ("q / ctrl+c", "quit"),
];

pub struct PopupWidget;

impl PopupWidget {
    /// Render the key reference on top of the grid
    pub fn render_help(frame: &mut Frame, theme: &Theme) {
        let area = frame.area();

        let popup_width = 52u16.min(area.width.saturating_sub(4));
        let popup_height = (HELP_ENTRIES.len() as u16 + 4).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bar));

        let key_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(theme.foreground);

        let mut lines: Vec<Line> = HELP_ENTRIES
            .iter()
            .map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(format!(" {:<22}", keys), key_style),
                    Span::styled(*what, text_style),
                ])
            })
            .collect();
        lines.push(Line::default());
        lines.push(
            Line::styled("press any key to close", Style::default().fg(theme.muted))
                .alignment(Alignment::Center),
        );

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
