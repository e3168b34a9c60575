//! FILENAME: app/src/lib.rs
// PURPOSE: Host library: shared state, loader, commands and console rendering.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;

pub mod commands;
pub mod config;
pub mod console;
pub mod loader;
pub mod logging;

pub use commands::{
    clear_all_filters, clear_column_filter, clear_sort, export_to_excel, get_table_view,
    is_loading, navigate_page, search_column, select_page_size, select_suggestion,
    set_global_filter, set_page, toggle_column_dropdown, toggle_column_filter, toggle_sort,
    ExportResult, STILL_LOADING,
};
pub use config::{AppConfig, ConfigError, SourceConfig};
pub use console::{render_view, ConsoleCommand};
pub use loader::{
    load_into, load_table, rows_from_items, source_from_config, JsonFileSource, ListSource,
    LoadError, LoadState, LoadedList, SharePointListSource, XlsxFileSource,
};

// ============================================================================
// APP STATE
// ============================================================================

/// State shared by every command.
pub struct AppState {
    pub table: Mutex<LoadState>,
    pub config: AppConfig,
}

pub fn create_app_state(config: AppConfig) -> AppState {
    log_info!("SYS", "Creating AppState");
    AppState {
        table: Mutex::new(LoadState::Loading),
        config,
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Browse a list in the terminal: filter, sort, page and export it.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "datatable", version)]
pub struct Cli {
    /// JSON config file; defaults apply when omitted
    #[arg(env = "DATATABLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Most verbose level routed from library crates into the log
    #[arg(long, default_value = "debug")]
    pub log_level: log::LevelFilter,
}

/// Load config, start logging, fetch once, then serve console commands from stdin.
pub async fn run(cli: Cli) {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[CONFIG] {}; using defaults", e);
            AppConfig::default()
        }
    };

    match &config.log_path {
        Some(path) => match logging::init_log_file(path) {
            Ok(path) => {
                eprintln!("[LOG_INIT] SUCCESS - Log file: {:?}", path);
                log_info!("SYS", "datatable starting, log={}", path.display());
            }
            Err(e) => {
                eprintln!("[LOG_INIT] FAILED: {}", e);
                eprintln!("[LOG_INIT] Continuing with console-only logging");
            }
        },
        None => logging::set_console_echo(true),
    }
    logging::install_log_bridge(cli.log_level);

    let state = create_app_state(config);
    let source = source_from_config(&state.config);
    load_into(&state, source.as_ref()).await;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let intro = match commands::get_table_view(&state) {
        Ok(view) => render_view(&view),
        Err(e) => e,
    };
    let _ = stdout
        .write_all(format!("{}\nType 'help' for commands.\n> ", intro).as_bytes())
        .await;
    let _ = stdout.flush().await;

    while let Ok(Some(line)) = lines.next_line().await {
        let output = match ConsoleCommand::parse(&line) {
            Ok(None) => String::new(),
            Ok(Some(cmd)) => match cmd.execute(&state) {
                Ok(console::Outcome::Render(view)) => render_view(&view),
                Ok(console::Outcome::Message(msg)) => msg,
                Ok(console::Outcome::Quit) => break,
                Err(e) => format!("Error: {}", e),
            },
            Err(e) => format!("Error: {}", e),
        };
        if !output.is_empty() {
            let _ = stdout.write_all(format!("{}\n", output).as_bytes()).await;
        }
        let _ = stdout.write_all(b"> ").await;
        let _ = stdout.flush().await;
    }

    log_info!("SYS", "datatable exiting");
}
