use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use teleprompt::app::AppState;
use teleprompt::async_tasks::{AsyncTaskRunner, TaskMessage};
use teleprompt::cli::Cli;
use teleprompt::constants::{
    FRAME_DURATION_MS, MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH, RESIZE_DEBOUNCE_MS,
};
use teleprompt::error::{AppError, Result};
use teleprompt::persistence::{PersistenceManager, PreferenceStore};
use teleprompt::ui::{self, input_handler::InputHandler};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate CLI arguments
    cli.validate()?;

    // Initialize logging if requested; the guard flushes the file on drop
    let _log_guard = match &cli.log_file {
        Some(log_file) => {
            let guard = init_logging(log_file)?;
            tracing::info!("=== Teleprompt starting ===");
            tracing::info!("Log file: {}", log_file.display());
            Some(guard)
        }
        None => None,
    };

    // Check terminal size
    let (width, height) = crossterm::terminal::size()?;
    if width < MIN_TERMINAL_WIDTH || height < MIN_TERMINAL_HEIGHT {
        tracing::error!(
            "Terminal too small: {}x{} (minimum: {}x{})",
            width,
            height,
            MIN_TERMINAL_WIDTH,
            MIN_TERMINAL_HEIGHT
        );
        return Err(AppError::TerminalTooSmall {
            min_width: MIN_TERMINAL_WIDTH,
            min_height: MIN_TERMINAL_HEIGHT,
        });
    }
    tracing::debug!("Terminal size: {}x{}", width, height);

    let app = initialize_app_state(&cli, width, height)?;

    // Setup terminal
    setup_terminal()?;
    tracing::debug!("Terminal setup completed");

    // Setup Ctrl-C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Ctrl-C received, shutting down");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Other(format!("Failed to set Ctrl-C handler: {}", e)))?;

    // Run the application
    let result = run_app(app, running).await;

    // Cleanup terminal
    cleanup_terminal()?;
    tracing::debug!("Terminal cleanup completed");

    result
}

fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste, Hide)?;

    // Set panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal();
        original_hook(panic_info);
    }));

    Ok(())
}

fn cleanup_terminal() -> Result<()> {
    execute!(io::stdout(), Show, DisableBracketedPaste, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn init_logging(log_file: &Path) -> Result<WorkerGuard> {
    let file_name = log_file
        .file_name()
        .ok_or_else(|| AppError::LoggingError(format!("not a file: {}", log_file.display())))?;
    let log_dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // Only log from our crate unless RUST_LOG says otherwise
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("teleprompt=debug"));
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(filter);

    Registry::default()
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::LoggingError(e.to_string()))?;

    Ok(guard)
}

fn initialize_app_state(cli: &Cli, width: u16, height: u16) -> Result<AppState> {
    tracing::debug!("Initializing application state");

    // Read the script first so a bad file fails before anything is written
    let script = cli.load_script()?;

    let persistence = PersistenceManager::new(cli.config_dir.clone()).map_err(|e| {
        tracing::error!("Failed to initialize persistence: {:#}", e);
        AppError::ConfigDirError(format!("{:#}", e))
    })?;
    tracing::debug!("Config directory: {}", persistence.config_dir().display());

    if cli.ephemeral {
        tracing::info!("Ephemeral mode, preferences will not be saved");
    }
    let backend = persistence.backend(cli.ephemeral);

    let store = PreferenceStore::load(backend);
    let mut app = AppState::new(store, width, height);

    if let Some(script) = script {
        tracing::info!("Script loaded from file ({} bytes)", script.len());
        app.replace_script(script);
    }

    tracing::debug!(
        "Viewport initialized: {}x{}",
        app.viewport.width,
        app.viewport.height
    );
    Ok(app)
}

async fn run_app(mut app: AppState, running: Arc<AtomicBool>) -> Result<()> {
    // Create backend and terminal
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    // Create task channel
    let (task_tx, mut task_rx) = mpsc::unbounded_channel();

    // Create task runner
    let task_runner = AsyncTaskRunner::new(task_tx);

    // Create resize debouncer
    let resize_tx = task_runner.spawn_resize_debouncer(RESIZE_DEBOUNCE_MS);

    // Run main event loop
    run_event_loop(
        &mut terminal,
        &mut app,
        &mut task_rx,
        &task_runner,
        running,
        &resize_tx,
    )
    .await?;

    tracing::info!("Teleprompt shutting down");
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    task_rx: &mut mpsc::UnboundedReceiver<TaskMessage>,
    task_runner: &AsyncTaskRunner,
    running: Arc<AtomicBool>,
    resize_tx: &mpsc::UnboundedSender<(u16, u16)>,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_DURATION_MS);
    let mut input_handler = InputHandler;

    while running.load(Ordering::SeqCst) && !app.should_quit {
        let frame_start = Instant::now();

        // Process all pending task messages (non-blocking)
        while let Ok(msg) = task_rx.try_recv() {
            handle_task_message(app, msg);
        }

        // Advance scroll animations for this frame
        app.tick(frame_start);

        // Render UI
        terminal.draw(|f| {
            ui::layout::render(f, app);
        })?;

        // Drain every ready input event (non-blocking)
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            handle_event(app, ev, &mut input_handler, resize_tx);
        }

        // Fullscreen requests resolve in the background and report back
        if let Some(request) = app.pending_fullscreen.take() {
            task_runner.spawn_fullscreen_request(request, crossterm::terminal::size);
        }

        // Sleep to maintain frame rate
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            tokio::time::sleep(frame_duration - elapsed).await;
        }
    }

    Ok(())
}

fn handle_task_message(app: &mut AppState, msg: TaskMessage) {
    match msg {
        TaskMessage::FullscreenChanged { active } => {
            tracing::info!("Fullscreen changed: {}", active);
            app.set_fullscreen(active);
        }

        TaskMessage::ResizeComplete { width, height } => {
            tracing::info!("Resize complete: {}x{}", width, height);
            app.update_viewport_size(width, height);
            app.relayout();
        }
    }
}

fn handle_event(
    app: &mut AppState,
    ev: Event,
    input_handler: &mut InputHandler,
    resize_tx: &mpsc::UnboundedSender<(u16, u16)>,
) {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if !input_handler.handle_key(app, key, Instant::now()) {
                tracing::trace!("Unhandled key: {:?}", key.code);
            }
        }
        Event::Paste(text) => {
            if !input_handler.handle_paste(app, &text) {
                tracing::trace!("Paste ignored outside the editor");
            }
        }
        Event::Resize(width, height) => {
            // Update viewport immediately for UI
            app.update_viewport_size(width, height);

            // Send to debouncer for re-layout
            let _ = resize_tx.send((width, height));
        }
        _ => {}
    }
}
