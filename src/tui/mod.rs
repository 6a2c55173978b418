pub mod action;
pub mod handlers;
pub mod state;
pub mod view;

use crate::client::{ApiClient, GeoClient};
use crate::config::Config;
use crate::notify::{NotificationHub, NotificationResponse};
use crate::report;
use crate::session::Session;
use crate::tui::state::Screen;

use action::{Action, AppEvent};
use handlers::{handle_app_event, handle_key_event};
use state::AppState;
use view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{env, io, time::Duration};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run() -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: remedix [OPTIONS]");
        return Ok(());
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("remedix_panic.log")
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(_) => {
            let path_str = Config::get_path_string()
                .unwrap_or_else(|_| "[Could not determine config path]".to_string());
            eprintln!("Config file not found.");
            eprintln!("Please create a configuration file at:");
            eprintln!("  {}", path_str);
            eprintln!("\nAt minimum it needs 'api_url' and 'token'.");
            return Ok(());
        }
    };

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let session = Session::from_config(&config);
    let mut app_state = AppState::new(session.clone());
    if let Some(criteria) = config
        .default_sort
        .as_deref()
        .and_then(crate::model::SortCriteria::parse)
    {
        app_state.inventory.set_sort_criteria(criteria);
    }

    let hub = NotificationHub::new();
    app_state.notifications = Some(hub.subscribe());

    let (action_tx, mut action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    // --- 4. NETWORK TASK ---
    let api_url = config.api_url.clone();
    let geocoder_url = config.geocoder_url.clone();
    let (latitude, longitude) = (config.latitude, config.longitude);
    let net_hub = hub.clone();
    tokio::spawn(async move {
        let client = match ApiClient::new(&api_url, session.bearer()) {
            Ok(c) => c,
            Err(e) => {
                let _ = event_tx.send(AppEvent::Error(e)).await;
                return;
            }
        };

        // Token registration happens once per launch, before anything else.
        if let Some(token) = &session.push_token {
            client.register_push_token(token).await;
        }
        let _ = event_tx.send(AppEvent::Status("Ready.".to_string())).await;

        while let Some(action) = action_rx.recv().await {
            match action {
                Action::Quit => break,

                Action::FetchInventory { seq } => {
                    let result = client.get_inventory().await;
                    let _ = event_tx.send(AppEvent::InventoryLoaded { seq, result }).await;
                }

                Action::SubmitReminder(payload) => {
                    let result = client.create_reminder(&payload).await;
                    if result.is_ok() {
                        // The push service would normally deliver this tap
                        // target; locally we short-circuit it.
                        net_hub.publish(NotificationResponse {
                            screen: "Inventory".to_string(),
                        });
                    }
                    let _ = event_tx.send(AppEvent::ReminderSubmitted(result)).await;
                }

                Action::RegisterPushToken(token) => {
                    client.register_push_token(&token).await;
                }

                Action::ScanHospitals => {
                    let result = match GeoClient::new(&geocoder_url) {
                        Ok(geo) => geo.search_nearby(latitude, longitude).await,
                        Err(e) => Err(e),
                    };
                    let _ = event_tx.send(AppEvent::HospitalsLoaded(result)).await;
                }

                Action::GenerateReport(data) => {
                    let result = report::write_report(&data).map_err(|e| e.to_string());
                    if let Ok(path) = &result {
                        info!(path = %path.display(), "report written");
                        let _ = open::that_detached(path);
                    }
                    let _ = event_tx
                        .send(AppEvent::ReportReady(result))
                        .await;
                }
            }
        }
    });

    // --- 5. UI LOOP ---
    loop {
        terminal.draw(|f| draw(f, &mut app_state))?;

        // A. Network Events
        if let Ok(app_event) = event_rx.try_recv()
            && let Some(follow_up) = handle_app_event(&mut app_state, app_event)
        {
            let _ = action_tx.send(follow_up).await;
        }

        // B. Notification taps route straight to a screen.
        let tapped = app_state
            .notifications
            .as_mut()
            .and_then(|sub| sub.try_recv());
        if let Some(response) = tapped
            && response.screen == "Inventory"
            && app_state.screen != Screen::Inventory
        {
            app_state.screen = Screen::Inventory;
            let seq = app_state.inventory.begin_fetch();
            let _ = action_tx.send(Action::FetchInventory { seq }).await;
        }

        // C. User Input
        if crossterm::event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => app_state.next(),
                    MouseEventKind::ScrollUp => app_state.previous(),
                    _ => {}
                },
                Event::Key(key) => {
                    if let Some(action) = handle_key_event(key, &mut app_state) {
                        let quitting = matches!(action, Action::Quit);
                        let _ = action_tx.send(action).await;
                        if quitting {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
