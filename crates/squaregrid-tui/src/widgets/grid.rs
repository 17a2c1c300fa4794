use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, HitTarget};
use crate::grid_view::{GridView, TileRect};
use crate::theme::Theme;

const CHECK_MARK: &str = "✓";

pub struct GridWidget;

impl GridWidget {
    /// Draw the visible part of the grid and register a hitbox per tile
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let background = Style::default().bg(app.theme.background).fg(app.theme.foreground);
        frame.render_widget(Block::default().style(background), area);

        let view = match GridView::new(&app.engine, &app.layout, app.rows.len(), area.width) {
            Ok(view) => view,
            Err(e) => {
                app.mark_layout_unavailable();
                Self::render_too_narrow(frame, area, &app.theme, &e.to_string());
                return;
            }
        };

        app.apply_scroll_target(&view, area.height);
        let placements = view.placements(&app.rows);
        let offset = app.update_scroll(&view, &placements, area.height);

        for (index, rect) in placements.iter().enumerate() {
            let state = TileState {
                selected: app.selection.contains(rect.id),
                focused: index == app.cursor,
            };
            let buf = frame.buffer_mut();
            if let Some(visible) = draw_tile(buf, area, rect, offset, state, &app.theme) {
                app.register_hitbox(visible, HitTarget::Tile(rect.id));
            }
        }
    }

    fn render_too_narrow(frame: &mut Frame, area: Rect, theme: &Theme, reason: &str) {
        let title = Style::default().fg(theme.error).add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(theme.muted);
        let lines = vec![
            Line::styled("Window too narrow", title),
            Line::styled(reason.to_string(), muted),
            Line::styled("Widen the terminal or press - for fewer items per row", muted),
        ];
        let top = area.height.saturating_sub(lines.len() as u16) / 2;
        let notice = Rect::new(area.x, area.y + top, area.width, area.height - top);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, notice);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TileState {
    selected: bool,
    focused: bool,
}

/// Draw one tile clipped to `area`, returning the screen rect it covers
fn draw_tile(
    buf: &mut Buffer,
    area: Rect,
    rect: &TileRect,
    offset: u16,
    state: TileState,
    theme: &Theme,
) -> Option<Rect> {
    let top = i32::from(rect.y) - i32::from(offset);
    let bottom = top + i32::from(rect.height);
    let first = top.max(0);
    let last = bottom.min(i32::from(area.height));
    let left = rect.x.min(area.width);
    let right = rect.x.saturating_add(rect.width).min(area.width);
    if first >= last || left >= right {
        return None;
    }

    let fill = if rect.sub { theme.sub_tile } else { theme.tile };
    let border = if state.focused {
        Style::default().fg(theme.accent).bg(fill).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.tile_border).bg(fill)
    };

    for y in first..last {
        let row = (y - top) as u16;
        for x in left..right {
            let symbol = frame_symbol(row, x - rect.x, rect.height, rect.width);
            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y as u16)) {
                cell.set_symbol(symbol).set_style(border);
            }
        }
    }

    let label_row = rect.height / 2;
    let label = rect.id.to_string();
    let label_style = Style::default()
        .fg(theme.foreground)
        .bg(fill)
        .add_modifier(Modifier::BOLD);
    let label_column = centered(&label, rect.width);
    put_text(buf, area, rect, top, label_row, label_column, &label, label_style);

    if state.selected {
        let row = if rect.height > 2 { 1 } else { 0 };
        let column = rect.width.saturating_sub(if rect.width > 2 { 2 } else { 1 });
        let check_style = Style::default()
            .fg(theme.check)
            .bg(fill)
            .add_modifier(Modifier::BOLD);
        put_text(buf, area, rect, top, row, column, CHECK_MARK, check_style);
    }

    Some(Rect::new(
        area.x + left,
        area.y + first as u16,
        right - left,
        (last - first) as u16,
    ))
}

/// Rounded border for tiles big enough to carry one
fn frame_symbol(row: u16, column: u16, height: u16, width: u16) -> &'static str {
    if height < 2 || width < 2 {
        return " ";
    }
    let last_row = row + 1 == height;
    let last_column = column + 1 == width;
    match (row, column) {
        (0, 0) => "╭",
        (0, _) if last_column => "╮",
        (_, 0) if last_row => "╰",
        _ if last_row && last_column => "╯",
        (0, _) => "─",
        _ if last_row => "─",
        (_, 0) => "│",
        _ if last_column => "│",
        _ => " ",
    }
}

fn centered(text: &str, width: u16) -> u16 {
    width.saturating_sub(text.chars().count() as u16) / 2
}

/// Write `text` inside a tile at tile-relative `row`/`column`, skipping clipped cells
#[allow(clippy::too_many_arguments)]
fn put_text(
    buf: &mut Buffer,
    area: Rect,
    rect: &TileRect,
    top: i32,
    row: u16,
    column: u16,
    text: &str,
    style: Style,
) {
    let y = top + i32::from(row);
    if y < 0 || y >= i32::from(area.height) || row >= rect.height {
        return;
    }
    // Keep the border intact when there is one
    let inner = if rect.width > 2 { 1..rect.width - 1 } else { 0..rect.width };
    for (i, ch) in text.chars().enumerate() {
        let tile_x = column + i as u16;
        let x = rect.x + tile_x;
        if !inner.contains(&tile_x) || x >= area.width {
            continue;
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y as u16)) {
            cell.set_char(ch).set_style(style);
        }
    }
}
