use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io::stdout;

use skyfire::app::App;
use skyfire::config::GameConfig;
use skyfire::store::ProfileStore;

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = GameConfig::load(&GameConfig::default_path())?;
    init_logging(&config)?;

    let mut store = ProfileStore::load(&config.store_path)?;
    log::debug!("profile store at {}", store.path().display());
    let starting_lives = match store.lives_for(&config.profile) {
        Some(lives) => lives,
        None => {
            log::info!(
                "new profile {}, granting {} lives",
                config.profile,
                config.starting_lives
            );
            config.starting_lives
        }
    };

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    log::debug!("keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(&config, starting_lives).run(&mut terminal, supports_keyboard_enhancement);

    // Cleanup runs before the session result is looked at
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let summary = result?;
    store.set_lives(&config.profile, summary.lives_remaining);
    store.save()?;

    println!(
        "Final score: {}  Lives left: {}",
        summary.score, summary.lives_remaining
    );
    Ok(())
}

/// Logs go to a file; stdout belongs to the terminal UI
fn init_logging(config: &GameConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .wrap_err_with(|| format!("failed to open log file {}", config.log_file.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
