//! Tokenchat Entry Point
//!
//! Launches the terminal chat client.
//!
//! # Usage
//!
//! ```bash
//! # Local development server with defaults
//! tokenchat
//!
//! # Another server, with a session cookie and a custom starting balance
//! tokenchat --base-url https://chat.example.com --cookie "csrftoken=abc; sessionid=xyz" --initial-tokens 25
//!
//! # Verbose logging (written to a file, never the terminal)
//! RUST_LOG=debug tokenchat --log-file /tmp/tokenchat.log
//! ```

use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokenchat_core::{
    default_config_path, default_log_path, load_config_from_path, ConfigOverrides, WidgetConfig,
};
use tokenchat_tui::{App, WidgetClient};

/// Tokenchat - terminal chat with a token balance
#[derive(Parser, Debug)]
#[command(name = "tokenchat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "TOKENCHAT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Chat server base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Cookie header for the session (the CSRF token is read from it)
    #[arg(long, value_name = "COOKIES")]
    cookie: Option<String>,

    /// Token balance shown before the server reports one
    #[arg(long, value_name = "N")]
    initial_tokens: Option<i64>,

    /// Number of history messages to load at startup
    #[arg(long, value_name = "N")]
    history_limit: Option<usize>,

    /// Allow a new send while an earlier one is still in flight
    #[arg(long)]
    no_single_flight: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        if let Some(ref url) = self.base_url {
            overrides = overrides.with_base_url(url.clone());
        }
        if let Some(ref cookie) = self.cookie {
            overrides = overrides.with_cookie(cookie.clone());
        }
        if let Some(tokens) = self.initial_tokens {
            overrides = overrides.with_initial_tokens(tokens);
        }
        if let Some(limit) = self.history_limit {
            overrides = overrides.with_history_limit(limit);
        }
        if self.no_single_flight {
            overrides = overrides.with_single_flight(false);
        }
        if let Some(ref level) = self.log_level {
            overrides = overrides.with_log_level(level.clone());
        }
        if let Some(ref path) = self.log_file {
            overrides = overrides.with_log_file(path.clone());
        }
        overrides
    }
}

/// Merge file, environment and command line into a validated config
fn resolve_config(args: &Args) -> Result<WidgetConfig> {
    let mut config = load_config_from_path(args.config.clone().or_else(default_config_path))
        .context("Failed to load configuration")?;

    args.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Initialize logging to a file; the terminal belongs to the UI
fn init_logging(config: &WidgetConfig) -> Result<PathBuf> {
    let path = config.log_file.clone().unwrap_or_else(default_log_path);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let level = &config.log_level;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "tokenchat={level},tokenchat_tui={level},tokenchat_core={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(path)
}

/// Refuse to start without a terminal
fn require_tty() -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!(
            "tokenchat requires a terminal (TTY); run it interactively, or over SSH with -t"
        );
    }
    Ok(())
}

/// Restore the terminal before printing a panic
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let log_path = init_logging(&config)?;

    tracing::info!("Tokenchat starting");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        base_url = %config.base_url,
        source = %config.source(),
        history_limit = config.history_limit,
        single_flight = config.single_flight,
        log_file = %log_path.display(),
        "Configuration resolved"
    );

    require_tty()?;
    let client = WidgetClient::from_config(config).context("Failed to create chat client")?;

    install_panic_hook();

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    let mut app = App::new(client, (size.width, size.height));
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("Tokenchat exited with error: {:#}", e);
    } else {
        tracing::info!("Tokenchat stopped");
    }

    result
}
