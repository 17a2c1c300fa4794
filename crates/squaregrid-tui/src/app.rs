use std::sync::Arc;

use ratatui::layout::Rect;
use squaregrid_core::grid::{
    locate, tile_ids, GridItem, GridLayoutEngine, ItemSource, LayoutConfig, Row,
};
use squaregrid_core::{
    AppConfig, ScrollController, ScrollEvent, SelectionEvent, SelectionStore, Subscription, TileId,
};
use tracing::debug;

use crate::grid_view::{GridView, TileRect};
use crate::input::Action;
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Help overlay
    Help,
}

/// Clickable screen regions registered during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Tile(TileId),
    ScrollTop,
    ScrollBottom,
    Columns(usize),
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub engine: GridLayoutEngine,
    pub layout: LayoutConfig,
    /// Items from the item source, in display order
    pub items: Vec<GridItem>,
    /// Rows computed from `items`
    pub rows: Vec<Row>,
    pub selection: SelectionStore,
    pub scroll: ScrollController,
    pub animator: ScrollAnimator,
    /// Index of the focused tile in `tile_order()`
    pub cursor: usize,
    pub mode: Mode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    tiles: Vec<TileId>,
    hitboxes: Vec<(Rect, HitTarget)>,
    max_scroll: u16,
    reveal_cursor: bool,
    /// The last frame had room for the grid, assumed before the first one
    laid_out: bool,
    selection_events: Subscription<SelectionEvent>,
    scroll_events: Subscription<ScrollEvent>,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        theme: Theme,
        source: &dyn ItemSource,
    ) -> squaregrid_core::Result<Self> {
        let layout = config.grid.layout_config()?;
        let engine = GridLayoutEngine::new(config.grid.row_mode);
        let items = source.items();
        let rows = engine.compute_rows(&items)?;
        let tiles = tile_ids(&rows);

        let mut selection = SelectionStore::new();
        let selection_events = selection.subscribe();
        let mut scroll = ScrollController::new();
        let scroll_events = scroll.subscribe();
        let animator = ScrollAnimator::new(config.ui.scroll.clone());

        Ok(Self {
            config,
            theme,
            engine,
            layout,
            items,
            rows,
            selection,
            scroll,
            animator,
            cursor: 0,
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            pending_key: None,
            tiles,
            hitboxes: Vec::new(),
            max_scroll: 0,
            reveal_cursor: false,
            laid_out: true,
            selection_events,
            scroll_events,
        })
    }

    /// Every tile id in display order
    pub fn tile_order(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn focused_tile(&self) -> Option<TileId> {
        self.tiles.get(self.cursor).copied()
    }

    pub fn first_item_id(&self) -> Option<TileId> {
        self.items.first().map(|item| item.id)
    }

    pub fn last_item_id(&self) -> Option<TileId> {
        self.items.last().map(|item| item.id)
    }

    /// Move the cursor onto `id` if it is in the grid
    fn focus_tile(&mut self, id: TileId) -> bool {
        match self.tiles.iter().position(|&t| t == id) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    /// Row index and sub-tile index of the cursor
    fn cursor_slot(&self) -> Option<(usize, Option<usize>)> {
        let mut first = 0;
        for (index, row) in self.rows.iter().enumerate() {
            let count = tile_count(row);
            if self.cursor < first + count {
                let sub = match row {
                    Row::Single { .. } => None,
                    Row::Double { .. } => Some(self.cursor - first),
                };
                return Some((index, sub));
            }
            first += count;
        }
        None
    }

    /// Position in `tile_order()` of a row's tile
    fn tile_index(&self, row: usize, sub: Option<usize>) -> usize {
        let before: usize = self.rows[..row].iter().map(tile_count).sum();
        before + sub.unwrap_or(0)
    }

    /// Replace the rows, keeping the cursor on the same row and sub-tile column
    fn set_rows(&mut self, rows: Vec<Row>) {
        let slot = self.cursor_slot();
        self.rows = rows;
        self.tiles = tile_ids(&self.rows);
        self.cursor = match slot {
            Some((row, sub)) if row < self.rows.len() => {
                let count = tile_count(&self.rows[row]);
                let sub = sub.map(|s| if s < count { s } else { s % 2 });
                self.tile_index(row, sub)
            }
            _ => self.cursor.min(self.tiles.len().saturating_sub(1)),
        };
        self.reveal_cursor = true;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.reveal_cursor = true;
    }

    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.tiles.len() {
            self.cursor += 1;
        }
        self.reveal_cursor = true;
    }

    pub fn move_up(&mut self) {
        self.move_vertical(-1);
    }

    pub fn move_down(&mut self) {
        self.move_vertical(1);
    }

    fn move_vertical(&mut self, delta: isize) {
        if let Some(index) = self.vertical_neighbour(delta) {
            self.cursor = index;
            self.reveal_cursor = true;
        }
    }

    /// Tile above (`delta < 0`) or below the cursor, keeping the sub-tile column
    fn vertical_neighbour(&self, delta: isize) -> Option<usize> {
        let columns = self.layout.columns();
        let (row_index, sub) = self.cursor_slot()?;
        let slot = sub.map_or(0, |s| s % 2);

        // Block rows have a second sub-row to step through first
        if let (Some(sub), Row::Double { tiles, .. }) = (sub, &self.rows[row_index]) {
            let stepped = usize::try_from(sub as isize + 2 * delta).ok();
            if let Some(stepped) = stepped.filter(|&i| i < tiles.len()) {
                return Some(self.tile_index(row_index, Some(stepped)));
            }
        }

        let next = usize::try_from(row_index as isize + delta * columns as isize).ok()?;
        let sub = match self.rows.get(next)? {
            Row::Single { .. } => None,
            Row::Double { tiles, .. } => {
                let last = tiles.len().checked_sub(1)?;
                let group = if delta > 0 { 0 } else { last / 2 };
                Some((group * 2 + slot).min(last))
            }
        };
        Some(self.tile_index(next, sub))
    }

    /// Toggle the focused tile, returning its new state
    pub fn toggle_focused(&mut self) -> Option<bool> {
        let id = self.focused_tile()?;
        Some(self.selection.toggle(id))
    }

    /// Toggle a tile picked with the mouse and focus it
    pub fn toggle_tile(&mut self, id: TileId) -> bool {
        if self.focused_tile() != Some(id) {
            self.focus_tile(id);
        }
        self.selection.toggle(id)
    }

    pub fn jump_to_top(&mut self) {
        if let Some(id) = self.first_item_id() {
            self.scroll.set_target(id);
        }
    }

    pub fn jump_to_bottom(&mut self) {
        if let Some(id) = self.last_item_id() {
            self.scroll.set_target(id);
        }
    }

    pub fn set_columns(&mut self, columns: usize) {
        match self.layout.set_columns(columns) {
            Ok(()) => {
                debug!("Columns set to {}", columns);
                self.reveal_cursor = true;
                self.set_status(format!("Items per row: {}", columns));
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn increase_columns(&mut self) {
        self.set_columns(self.layout.columns() + 1);
    }

    pub fn decrease_columns(&mut self) {
        self.set_columns(self.layout.columns().saturating_sub(1));
    }

    /// Switch double rows between strip and block
    pub fn toggle_row_mode(&mut self) {
        let engine = GridLayoutEngine::new(self.engine.row_mode().toggled());
        match engine.compute_rows(&self.items) {
            Ok(rows) => {
                self.engine = engine;
                self.set_rows(rows);
                self.set_status(format!("Row mode: {}", engine.row_mode().label()));
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn scroll_lines(&mut self, delta: i32) {
        self.animator.scroll_by(delta, self.max_scroll);
    }

    /// Turn pending selection and scroll notifications into status updates.
    /// Returns true when anything arrived.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;

        while let Ok(event) = self.selection_events.try_recv() {
            changed = true;
            let message = match event {
                SelectionEvent::Toggled { id, selected: true } => {
                    format!("Selected tile {}", id)
                }
                SelectionEvent::Toggled { id, selected: false } => {
                    format!("Deselected tile {}", id)
                }
                SelectionEvent::Cleared { count } => {
                    format!("Cleared {} selected tiles", count)
                }
            };
            self.status_message = Some(message);
        }

        while let Ok(ScrollEvent::TargetSet(id)) = self.scroll_events.try_recv() {
            changed = true;
            debug!("Scroll requested to tile {}", id);
        }

        changed
    }

    /// Consume the pending scroll target and start scrolling to it.
    /// Targets that are not in the grid are dropped.
    pub fn apply_scroll_target(&mut self, view: &GridView, viewport: u16) {
        let Some(id) = self.scroll.consume_pending_target() else {
            return;
        };

        match locate(&self.rows, view.geometry.columns, id) {
            Some(position) => {
                self.focus_tile(id);
                self.reveal_cursor = false;
                let target = view.center_offset(position.line, viewport);
                self.animator.scroll_to(target, view.max_scroll(viewport));
            }
            None => debug!("Scroll target {} is not in the grid, ignoring", id),
        }
    }

    /// Advance scrolling for this frame and return the offset to draw at
    pub fn update_scroll(
        &mut self,
        view: &GridView,
        placements: &[TileRect],
        viewport: u16,
    ) -> u16 {
        self.laid_out = true;
        self.max_scroll = view.max_scroll(viewport);

        if self.reveal_cursor {
            self.reveal_cursor = false;
            // Placements follow `tile_order()`
            if let Some(rect) = placements.get(self.cursor) {
                let target = view.reveal_offset(rect, self.animator.target_scroll(), viewport);
                self.animator.scroll_to(target, self.max_scroll);
            }
        }

        self.animator.update(self.max_scroll)
    }

    /// The grid area is too small to lay out. Pending scrolls wait for a frame
    /// that has room.
    pub fn mark_layout_unavailable(&mut self) {
        self.laid_out = false;
    }

    /// Whether the next frame should come quickly
    pub fn needs_fast_update(&self) -> bool {
        let waiting = self.scroll.pending().is_some() || self.reveal_cursor;
        self.animator.is_animating() || (self.laid_out && waiting)
    }

    pub fn clear_hitboxes(&mut self) {
        self.hitboxes.clear();
    }

    pub fn register_hitbox(&mut self, area: Rect, target: HitTarget) {
        self.hitboxes.push((area, target));
    }

    /// Topmost clickable region under a screen position
    pub fn hit_test(&self, column: u16, row: u16) -> Option<HitTarget> {
        self.hitboxes
            .iter()
            .rev()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x.saturating_add(area.width)
                    && row >= area.y
                    && row < area.y.saturating_add(area.height)
            })
            .map(|(_, target)| *target)
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    /// Apply an input action to the state
    pub fn handle_action(&mut self, action: Action) {
        if action != Action::PendingG {
            self.clear_pending_key();
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::ToggleSelect => {
                self.toggle_focused();
            }
            Action::ToggleTile(id) => {
                self.toggle_tile(id);
            }
            Action::JumpToTop => self.jump_to_top(),
            Action::JumpToBottom => self.jump_to_bottom(),
            Action::PendingG => self.pending_key = Some('g'),
            Action::ColumnsIncrease => self.increase_columns(),
            Action::ColumnsDecrease => self.decrease_columns(),
            Action::SetColumns(columns) => self.set_columns(columns),
            Action::ToggleRowMode => self.toggle_row_mode(),
            Action::ClearSelection => self.clear_selection(),
            Action::ScrollLines(delta) => self.scroll_lines(delta),
            Action::Help => self.mode = Mode::Help,
            Action::ExitMode => self.mode = Mode::Normal,
            Action::None => {}
        }
    }
}

fn tile_count(row: &Row) -> usize {
    match row {
        Row::Single { .. } => 1,
        Row::Double { tiles, .. } => tiles.len(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use squaregrid_core::grid::{RowMode, StaticItemSource};

    /// Items 1, 2, [3 4], 5, 6 in two columns
    pub(crate) fn test_app() -> App {
        let mut config = AppConfig::default();
        config.grid.columns = 2;
        let source = StaticItemSource::new(vec![
            GridItem::single(1),
            GridItem::single(2),
            GridItem::double(3),
            GridItem::single(5),
            GridItem::single(6),
        ]);
        App::new(Arc::new(config), Theme::default(), &source).unwrap()
    }

    #[test]
    fn test_new_app_builds_rows() {
        let app = test_app();
        assert_eq!(app.rows.len(), 5);
        assert_eq!(app.tile_order(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(app.focused_tile(), Some(1));
    }

    #[test]
    fn test_invalid_items_fail_construction() {
        let source = StaticItemSource::new(vec![GridItem::new(1, 3)]);
        let result = App::new(Arc::new(AppConfig::default()), Theme::default(), &source);
        assert!(matches!(result, Err(squaregrid_core::Error::InvalidItem { .. })));
    }

    #[test]
    fn test_toggle_focused_reports_status() {
        let mut app = test_app();
        app.move_right();
        assert_eq!(app.toggle_focused(), Some(true));
        assert!(app.selection.contains(2));

        assert!(app.drain_events());
        assert_eq!(app.status_message.as_deref(), Some("Selected tile 2"));
        assert!(!app.drain_events());
    }

    #[test]
    fn test_jump_targets() {
        let mut app = test_app();
        app.handle_action(Action::JumpToBottom);
        assert_eq!(app.scroll.pending(), Some(6));
        app.handle_action(Action::JumpToTop);
        assert_eq!(app.scroll.pending(), Some(1));
        assert!(app.needs_fast_update());
    }

    #[test]
    fn test_vertical_movement() {
        let mut app = test_app();
        // Lines: [1, 2], [3 4, 5], [6]
        app.move_down();
        assert_eq!(app.focused_tile(), Some(3));
        app.move_down();
        assert_eq!(app.focused_tile(), Some(6));
        app.move_up();
        assert_eq!(app.focused_tile(), Some(3));
        app.move_up();
        assert_eq!(app.focused_tile(), Some(1));
        app.move_up();
        assert_eq!(app.focused_tile(), Some(1));
    }

    #[test]
    fn test_vertical_movement_in_block_rows() {
        let mut config = AppConfig::default();
        config.grid.row_mode = RowMode::Block;
        let source = StaticItemSource::new(vec![GridItem::double(1), GridItem::single(5)]);
        let mut app = App::new(Arc::new(config), Theme::default(), &source).unwrap();

        app.move_right();
        assert_eq!(app.focused_tile(), Some(2));
        app.move_down();
        assert_eq!(app.focused_tile(), Some(4));
        app.move_down();
        assert_eq!(app.focused_tile(), Some(5));
        app.move_up();
        assert_eq!(app.focused_tile(), Some(3));
    }

    #[test]
    fn test_column_changes() {
        let mut app = test_app();
        app.handle_action(Action::SetColumns(5));
        assert_eq!(app.layout.columns(), 5);

        app.handle_action(Action::ColumnsIncrease);
        assert_eq!(app.layout.columns(), 5);
        assert!(app.status_message.as_deref().unwrap().contains("between 1 and 5"));

        app.handle_action(Action::SetColumns(1));
        app.handle_action(Action::ColumnsDecrease);
        assert_eq!(app.layout.columns(), 1);
    }

    #[test]
    fn test_row_mode_toggle_with_repeated_sub_tile_ids() {
        let mut app = test_app();
        // Item 3 takes tiles 3..=6 in block mode, repeating the ids of items 5 and 6
        app.handle_action(Action::ToggleRowMode);
        assert_eq!(app.engine.row_mode(), RowMode::Block);
        assert_eq!(app.tile_order(), &[1, 2, 3, 4, 5, 6, 5, 6]);

        // Lines: [1, 2], [3 4 / 5 6, 5], [6]
        app.move_down();
        app.move_down();
        assert_eq!(app.cursor, 4);
        assert_eq!(app.focused_tile(), Some(5));

        // The cursor leaves the sub-tile 5 for item 6, not the item sharing its id
        app.move_down();
        assert_eq!(app.cursor, 7);
        assert_eq!(app.focused_tile(), Some(6));
        app.move_up();
        assert_eq!(app.cursor, 4);
    }

    #[test]
    fn test_row_mode_toggle_keeps_focus() {
        let source = StaticItemSource::new(vec![GridItem::single(1), GridItem::double(10)]);
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default(), &source).unwrap();
        app.move_right();
        app.move_right();
        assert_eq!(app.focused_tile(), Some(11));

        app.handle_action(Action::ToggleRowMode);
        assert_eq!(app.engine.row_mode(), RowMode::Block);
        assert_eq!(app.tile_order(), &[1, 10, 11, 12, 13]);
        assert_eq!(app.focused_tile(), Some(11));
    }

    #[test]
    fn test_scroll_target_is_consumed_once() {
        let mut app = test_app();
        let view = GridView::new(&app.engine, &app.layout, app.rows.len(), 41).unwrap();

        app.jump_to_bottom();
        app.apply_scroll_target(&view, 10);
        assert_eq!(app.focused_tile(), Some(6));
        assert_eq!(app.scroll.pending(), None);
        assert_eq!(app.animator.target_scroll(), view.center_offset(2, 10));

        // Unknown ids are ignored
        app.scroll.set_target(99);
        app.apply_scroll_target(&view, 10);
        assert_eq!(app.focused_tile(), Some(6));
        assert_eq!(app.scroll.pending(), None);
    }

    #[test]
    fn test_pending_target_waits_without_fast_ticks() {
        let mut app = test_app();
        app.jump_to_bottom();
        app.mark_layout_unavailable();
        assert!(!app.needs_fast_update());
        assert_eq!(app.scroll.pending(), Some(6));

        let view = GridView::new(&app.engine, &app.layout, app.rows.len(), 41).unwrap();
        let placements = view.placements(&app.rows);
        app.update_scroll(&view, &placements, 10);
        assert!(app.needs_fast_update());
    }

    #[test]
    fn test_gg_then_action_clears_pending_key() {
        let mut app = test_app();
        app.handle_action(Action::PendingG);
        assert_eq!(app.pending_key, Some('g'));
        app.handle_action(Action::JumpToTop);
        assert_eq!(app.pending_key, None);
    }

    #[test]
    fn test_help_mode() {
        let mut app = test_app();
        app.handle_action(Action::Help);
        assert_eq!(app.mode, Mode::Help);
        app.handle_action(Action::ExitMode);
        assert_eq!(app.mode, Mode::Normal);
    }
}
