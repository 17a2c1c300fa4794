use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};

/// Selected ids listed in the summary before it is cut short
const LISTED_SELECTIONS: usize = 5;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let mode_str = match app.mode {
            Mode::Normal => "NORMAL",
            Mode::Help => "HELP",
        };

        let focused = app
            .focused_tile()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | {}/row | {} | Tile {} | {}",
                mode_str,
                app.layout.columns(),
                app.engine.row_mode().label(),
                focused,
                selection_summary(app)
            )
        };

        let help_hint = " q:quit hjkl:move space:select gg/G:jump ?:help ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let bar = Style::default().bg(app.theme.bar);
        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(app.theme.foreground)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(app.theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line).style(bar), area);
    }
}

/// Count of selected tiles followed by their lowest ids
fn selection_summary(app: &App) -> String {
    let count = app.selection.len();
    if count == 0 {
        return "Selected: 0".to_string();
    }
    let mut ids: Vec<String> = app
        .selection
        .iter()
        .take(LISTED_SELECTIONS)
        .map(|id| id.to_string())
        .collect();
    if count > LISTED_SELECTIONS {
        ids.push("…".to_string());
    }
    format!("Selected: {} ({})", count, ids.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 1)).unwrap();
        terminal
            .draw(|frame| StatusBarWidget::render(frame, frame.area(), app))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..120).map(|x| buffer[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_summary_line() {
        let mut app = test_app();
        app.toggle_focused();
        let text = rendered(&app);
        assert!(text.contains("NORMAL | 2/row | strip | Tile 1 | Selected: 1 (1)"));
        assert!(text.contains("?:help"));
    }

    #[test]
    fn test_selection_summary_lists_lowest_ids() {
        let mut app = test_app();
        assert_eq!(selection_summary(&app), "Selected: 0");

        for id in [9, 3, 7] {
            app.selection.toggle(id);
        }
        assert_eq!(selection_summary(&app), "Selected: 3 (3, 7, 9)");

        for id in [1, 2, 4] {
            app.selection.toggle(id);
        }
        assert_eq!(selection_summary(&app), "Selected: 6 (1, 2, 3, 4, 7, …)");
    }

    #[test]
    fn test_status_message_replaces_summary() {
        let mut app = test_app();
        app.set_status("Cleared 3 selected tiles");
        let text = rendered(&app);
        assert!(text.contains("Cleared 3 selected tiles"));
        assert!(!text.contains("NORMAL"));
    }
}
