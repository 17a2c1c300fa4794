use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tracing::{error, info};

use squaregrid_core::AppConfig;
use squaregrid_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    keymap::Keymap,
    load_theme,
    widgets::{GridWidget, HeaderWidget, PopupWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let keymap = Keymap::from_config(&config.keymap);
    let theme = load_theme(&config.ui.theme);

    // Build state before touching the terminal so item errors print normally
    let source = config.grid.item_source();
    let mut app = App::new(config.clone(), theme, &source)?;
    info!(
        "Starting with {} items, {} per row, {} rows",
        app.items.len(),
        app.layout.columns(),
        app.engine.row_mode().label()
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if config.ui.mouse {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("squaregrid"))?;
    } else {
        execute!(stdout, EnterAlternateScreen, SetTitle("squaregrid"))?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &keymap);
    if let Err(e) = &result {
        error!("Event loop failed: {:#}", e);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting with {} selected tiles", app.selection.len());
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    keymap: &Keymap,
) -> Result<()> {
    let event_handler = EventHandler::new(app.config.ui.tick_rate_ms, &app.config.ui.scroll);

    // Checked at the end of each iteration to pick the next poll interval
    let mut needs_fast_update = false;

    loop {
        app.drain_events();

        terminal.draw(|frame| draw(frame, app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    app.handle_action(action);
                }
                AppEvent::Mouse(mouse) if app.config.ui.mouse => {
                    let action = handle_mouse_event(mouse, app);
                    if action != Action::None {
                        app.handle_action(action);
                    }
                }
                AppEvent::Mouse(_) => {}
                // Geometry is recomputed from the new size on the next draw
                AppEvent::Resize(_, _) => {}
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Header, grid and status bar, with the help overlay on top
fn draw(frame: &mut Frame, app: &mut App) {
    app.clear_hitboxes();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Grid
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    HeaderWidget::render(frame, main_layout[0], app);
    GridWidget::render(frame, main_layout[1], app);
    StatusBarWidget::render(frame, main_layout[2], app);

    if app.mode == Mode::Help {
        PopupWidget::render_help(frame, &app.theme);
    }
}
