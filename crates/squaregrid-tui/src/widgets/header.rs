use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use squaregrid_core::grid::{MAX_COLUMNS, MIN_COLUMNS};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, HitTarget};

const TOP_BUTTON: &str = "[↑]";
const BOTTOM_BUTTON: &str = "[↓]";
const PICKER_LABEL: &str = "Items per Row ";

/// Scroll buttons on the left, items-per-row picker on the right
pub struct HeaderWidget;

impl HeaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let bar = Style::default().bg(app.theme.bar);
        let button = bar.fg(app.theme.accent).add_modifier(Modifier::BOLD);
        let label = bar.fg(app.theme.muted);

        let mut spans = Vec::new();
        let mut hits = Vec::new();
        let mut x = area.x;

        let buttons = [
            (TOP_BUTTON, HitTarget::ScrollTop),
            (BOTTOM_BUTTON, HitTarget::ScrollBottom),
        ];
        for (text, target) in buttons {
            spans.push(Span::styled(" ", bar));
            x += 1;
            let width = text.width() as u16;
            hits.push((Rect::new(x, area.y, width, 1), target));
            spans.push(Span::styled(text, button));
            x += width;
        }

        let options: Vec<String> = (MIN_COLUMNS..=MAX_COLUMNS)
            .map(|n| format!(" {} ", n))
            .collect();
        let picker_width = PICKER_LABEL.width() as u16
            + options.iter().map(|o| o.width() as u16).sum::<u16>()
            + 1;
        let right_start = area.right().saturating_sub(picker_width).max(x);

        spans.push(Span::styled(" ".repeat((right_start - x) as usize), bar));
        x = right_start;
        spans.push(Span::styled(PICKER_LABEL, label));
        x += PICKER_LABEL.width() as u16;

        let current = app.layout.columns();
        for (columns, option) in (MIN_COLUMNS..=MAX_COLUMNS).zip(&options) {
            let width = option.width() as u16;
            let style = if columns == current {
                Style::default()
                    .fg(app.theme.background)
                    .bg(app.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                bar.fg(app.theme.foreground)
            };
            if x < area.right() {
                let hit = Rect::new(x, area.y, width.min(area.right() - x), 1);
                hits.push((hit, HitTarget::Columns(columns)));
            }
            spans.push(Span::styled(option.clone(), style));
            x = x.saturating_add(width);
        }
        spans.push(Span::styled(" ", bar));

        frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), area);
        for (rect, target) in hits {
            app.register_hitbox(rect, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_header_hitboxes() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal
            .draw(|frame| HeaderWidget::render(frame, frame.area(), &mut app))
            .unwrap();

        assert_eq!(app.hit_test(1, 0), Some(HitTarget::ScrollTop));
        assert_eq!(app.hit_test(5, 0), Some(HitTarget::ScrollBottom));
        assert_eq!(app.hit_test(4, 0), None);
        // " 5 " ends one cell before the right edge
        assert_eq!(app.hit_test(57, 0), Some(HitTarget::Columns(5)));
        assert_eq!(app.hit_test(54, 0), Some(HitTarget::Columns(4)));

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(1, 0)].symbol(), "[");
        assert_eq!(buffer[(2, 0)].symbol(), "↑");
    }
}
