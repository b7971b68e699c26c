pub mod app;
pub mod event;
pub mod layout;
mod results;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{AppContext, Result};
use crate::dashboard::DashboardController;
use crate::domain::{Displayed, ScrapeRecord};
use crate::export::{default_export_dir, export_and_notify};
use crate::notify::{Notifier, ToastCenter};
use crate::submit::submit_scrape;

use self::app::{FormField, Tab, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Results of background work, drained by the event loop.
enum UiMessage {
    ScrapeFinished(Option<Displayed>),
}

/// Shared handles the key handlers spawn work with.
struct Session {
    ctx: Arc<AppContext>,
    controller: Arc<DashboardController>,
    toasts: Arc<ToastCenter>,
    tx: mpsc::UnboundedSender<UiMessage>,
}

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let toasts = Arc::new(ToastCenter::new(Duration::from_millis(
        ctx.config.notifications.auto_close_ms,
    )));
    let controller = ctx.dashboard(toasts.clone())?;

    let mut refresh = controller.start();
    {
        let controller = controller.clone();
        tokio::spawn(async move { controller.load_dashboard_data(false).await });
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let session = Session {
        ctx,
        controller,
        toasts,
        tx,
    };

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &session, rx).await;
    restore_terminal(&mut terminal)?;
    refresh.stop();
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Tui,
    session: &Session,
    mut rx: mpsc::UnboundedReceiver<UiMessage>,
) -> Result<()> {
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(TICK_RATE);
    let colors = &session.ctx.config.colors;

    loop {
        while let Ok(message) = rx.try_recv() {
            match message {
                UiMessage::ScrapeFinished(result) => {
                    tui_app.submitting = false;
                    if let Some(displayed) = result {
                        tui_app.show_result(displayed);
                    }
                }
            }
        }

        let snapshot = session.controller.snapshot();
        tui_app.clamp_selection(snapshot.recent.len());
        let toast = session.toasts.latest();
        terminal.draw(|frame| {
            layout::render(frame, &mut tui_app, &snapshot, toast.as_ref(), colors)
        })?;

        match event_handler.next()? {
            AppEvent::Key(key) => handle_key(&mut tui_app, session, &snapshot.recent, key),
            AppEvent::Tick => session.toasts.prune(Instant::now()),
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(
    tui_app: &mut TuiApp,
    session: &Session,
    records: &[ScrapeRecord],
    key: KeyEvent,
) {
    // Handle pending delete confirmation
    if let Some((id, _title)) = tui_app.pending_delete.take() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let controller = session.controller.clone();
                tokio::spawn(async move {
                    controller.delete_record(&id).await;
                });
            }
            _ => session.toasts.info("Delete cancelled"),
        }
        return;
    }

    if tui_app.tab == Tab::Scraper && tui_app.form.editing {
        handle_input(tui_app, session, key);
        return;
    }

    let action = session.ctx.config.keybindings.get_action(&key);
    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::NextTab => {
            tui_app.tab = tui_app.tab.next();
        }
        Action::PrevTab => {
            tui_app.tab = tui_app.tab.prev();
        }
        Action::MoveUp => {
            tui_app.move_up();
        }
        Action::MoveDown => {
            tui_app.move_down(records.len());
        }
        Action::NextPage => {
            tui_app.next_page(records.len());
        }
        Action::PrevPage => {
            tui_app.prev_page();
        }
        Action::Select => match tui_app.tab {
            Tab::Scraper => tui_app.form.editing = true,
            Tab::Dashboard => {
                if let Some(record) = tui_app.selected_record(records) {
                    tui_app.show_result(Displayed::Record(record.clone()));
                }
            }
            Tab::Results => {}
        },
        Action::Edit => {
            if tui_app.tab == Tab::Scraper {
                tui_app.form.editing = true;
            }
        }
        Action::Submit | Action::Preview => {
            if tui_app.tab == Tab::Scraper {
                submit(tui_app, session, action == Action::Preview);
            }
        }
        Action::ToggleAi => {
            if tui_app.tab == Tab::Scraper {
                tui_app.form.analyze_with_ai = !tui_app.form.analyze_with_ai;
            }
        }
        Action::CycleMethod => {
            if tui_app.tab == Tab::Scraper {
                tui_app.form.method = tui_app.form.method.next();
            }
        }
        Action::Refresh => {
            let controller = session.controller.clone();
            tokio::spawn(async move { controller.handle_manual_refresh().await });
        }
        Action::ToggleAutoRefresh => {
            let enabled = session.controller.toggle_auto_refresh();
            session.toasts.info(if enabled {
                "Auto-refresh enabled"
            } else {
                "Auto-refresh disabled"
            });
        }
        Action::DeleteRecord => {
            if tui_app.tab == Tab::Dashboard {
                if let Some(record) = tui_app.selected_record(records) {
                    tui_app.pending_delete =
                        Some((record.id.clone(), record.display_title().to_string()));
                }
            }
        }
        Action::OpenInBrowser => {
            let url = match tui_app.tab {
                Tab::Dashboard => tui_app
                    .selected_record(records)
                    .map(|r| r.url.clone()),
                Tab::Results => tui_app
                    .displayed
                    .as_ref()
                    .and_then(|d| d.url().map(String::from)),
                Tab::Scraper => None,
            };
            if let Some(url) = url {
                if let Err(e) = open::that(&url) {
                    session
                        .toasts
                        .error(&format!("Failed to open browser: {}", e));
                }
            }
        }
        Action::NextView => {
            if tui_app.tab == Tab::Results {
                tui_app.next_view();
            }
        }
        Action::PrevView => {
            if tui_app.tab == Tab::Results {
                tui_app.prev_view();
            }
        }
        Action::ExportJson => {
            if tui_app.tab == Tab::Results {
                match &tui_app.displayed {
                    Some(displayed) => {
                        export_and_notify(
                            &default_export_dir(),
                            displayed,
                            session.toasts.as_ref(),
                        );
                    }
                    None => session.toasts.warning("Nothing to export"),
                }
            }
        }
        Action::None => {}
    }
}

/// Keys while a scraper form field is being edited.
fn handle_input(tui_app: &mut TuiApp, session: &Session, key: KeyEvent) {
    let form = &mut tui_app.form;
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            tui_app.should_quit = true;
        }
        KeyCode::Esc => form.editing = false,
        KeyCode::Tab | KeyCode::BackTab => form.toggle_focus(),
        KeyCode::Enter => {
            form.editing = false;
            if form.focus == FormField::Url {
                submit(tui_app, session, false);
            }
        }
        KeyCode::Backspace => {
            form.focused_mut().pop();
        }
        KeyCode::Char(c) => form.focused_mut().push(c),
        _ => {}
    }
}

fn submit(tui_app: &mut TuiApp, session: &Session, preview: bool) {
    if tui_app.submitting {
        session.toasts.warning("A scrape is already running");
        return;
    }
    tui_app.submitting = true;

    let request = tui_app.form.request();
    let api = session.ctx.api.clone();
    let toasts = session.toasts.clone();
    let controller = session.controller.clone();
    let tx = session.tx.clone();
    tokio::spawn(async move {
        let result = submit_scrape(api.as_ref(), toasts.as_ref(), &request, preview).await;
        let saved = !preview && result.is_some();
        // The receiver only goes away when the TUI exits.
        let _ = tx.send(UiMessage::ScrapeFinished(result));
        if saved {
            controller.load_dashboard_data(false).await;
        }
    });
}
