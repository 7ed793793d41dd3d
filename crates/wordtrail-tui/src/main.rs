mod app;
mod render;
mod settings;
mod theme;
mod words;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use settings::Cli;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use wordtrail_core::{GridPlacer, JsonFileBackend, Session};

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    // Everything that can fail on bad input happens before the terminal is taken over
    let app = match build_app(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Run the app
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Logs go to `--log-file` when given; otherwise only an explicit RUST_LOG
/// enables them, since stderr shares the screen.
fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
                .init();
        }
    }
    Ok(())
}

fn build_app(cli: &Cli) -> wordtrail_core::Result<App> {
    let config = cli.load_config()?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {} on a {}x{} grid", seed, config.grid_size, config.grid_size);

    let era = match cli.era.as_deref() {
        Some(name) => words::era_index(name).unwrap_or_else(|| {
            log::warn!("unknown era {}, starting in the first one", name);
            0
        }),
        None => 0,
    };

    let backend = JsonFileBackend::new(cli.save_path());
    let placer = GridPlacer::with_seed(config, seed);
    let mut session = Session::with_placer(
        placer,
        Box::new(words::supply(era, seed)),
        Box::new(backend),
    )?;

    if cli.reset_progress {
        session.clear_progress()?;
        log::info!("progress cleared");
    }

    Ok(App::new(session, era, seed))
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        // Render
        render::render(stdout, &app)?;
        stdout.flush()?;

        // Handle input with timeout for timer updates
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Handle Ctrl+C
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }

                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse, terminal::size()?),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
