mod cli;
mod helper;
mod input;
mod logging;
mod renderer;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;

use letmein_application::{EventReceiver, GameController, spawn_health_monitor};
use letmein_core::config::ClientConfig;
use letmein_core::game::{GameEvent, RenderCommand};
use letmein_core::session::{KeyValueStore, MemoryStore, SessionStore};
use letmein_infrastructure::{ConfigService, FileKeyValueStore, HttpGameApi, LetmeinPaths};

use crate::cli::Args;
use crate::helper::CliHelper;
use crate::input::Input;
use crate::renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let paths = LetmeinPaths::default();

    let log_guard = paths
        .logs_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| logging::init(&dir));
    let _log_guard = match log_guard {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{}", format!("Logging disabled: {}", e).yellow());
            None
        }
    };

    let config = load_config(&args, &paths).await;
    tracing::info!("[Main] Using game server {}", config.server_url);

    // ===== Backend Initialization =====
    let api = Arc::new(HttpGameApi::new(&config)?);
    let backend: Arc<dyn KeyValueStore> = if args.no_save {
        tracing::info!("[Main] --no-save given, progress stays in memory");
        Arc::new(MemoryStore::new())
    } else {
        let state_dir = match args.state_dir.clone() {
            Some(dir) => dir,
            None => paths.state_dir()?,
        };
        Arc::new(FileKeyValueStore::new(state_dir))
    };
    let (controller, events) = GameController::new(api, SessionStore::new(backend), &config);
    let monitor = spawn_health_monitor(controller.sender(), config.health_interval());

    println!("{}", "=== Let Me In ===".bright_magenta().bold());
    println!(
        "{}",
        "Talk the AI into revealing its password, then submit it with /password <pw>.".bright_black()
    );
    println!(
        "{}",
        format!("Server: {}  |  /help for commands, 'quit' to exit.", config.server_url).bright_black()
    );
    println!();

    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
    let game = tokio::spawn(run_game(controller, events, line_rx));

    // ===== Main REPL Loop =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.is_empty() {
                    continue;
                }
                if input::parse(&line) == Input::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                let _ = rl.add_history_entry(line.as_str());
                if line_tx.send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Closing the line channel ends the game loop.
    drop(line_tx);
    let _ = game.await;
    monitor.abort();
    tracing::info!("[Main] Exited");

    Ok(())
}

/// Loads `config.toml` (creating it on first run) and applies CLI overrides.
///
/// A broken config file is reported and replaced by defaults for this run.
async fn load_config(args: &Args, paths: &LetmeinPaths) -> ClientConfig {
    let path = match args.config.clone() {
        Some(path) => Some(path),
        None => paths.config_file().ok(),
    };

    let mut config = match path {
        Some(path) => match ConfigService::new(path).load_or_create().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[Main] Falling back to default config: {}", e);
                eprintln!("{}", format!("Using default settings: {}", e).yellow());
                ClientConfig::default()
            }
        },
        None => ClientConfig::default(),
    };

    if let Some(server) = &args.server {
        config = config.with_server_url(server.as_str());
    }
    config
}

/// Owns the controller: applies input lines and background completions in
/// arrival order until the input channel closes.
async fn run_game(
    mut controller: GameController,
    mut events: EventReceiver,
    mut lines: mpsc::UnboundedReceiver<String>,
) {
    let mut renderer = TerminalRenderer::new();
    renderer.render(&controller.start().await);

    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(line) => {
                    let commands = handle_line(&mut controller, &mut renderer, &line).await;
                    renderer.render(&commands);
                }
                None => break,
            },
            Some(event) = events.recv() => {
                renderer.render(&controller.dispatch(event).await);
            }
        }
    }
}

async fn handle_line(
    controller: &mut GameController,
    renderer: &mut TerminalRenderer,
    line: &str,
) -> Vec<RenderCommand> {
    if renderer.take_confirmation() {
        let confirmed = input::is_affirmative(line);
        return controller
            .dispatch(GameEvent::NewGameAnswered { confirmed })
            .await;
    }

    let event = match input::parse(line) {
        Input::Message(text) => GameEvent::SendMessage(text),
        Input::Password(password) => GameEvent::SubmitPassword(password),
        Input::Level(level) => GameEvent::SelectLevel(level),
        Input::NewGame => GameEvent::NewGameRequested,
        Input::Status => GameEvent::StatusRequested,
        Input::Health => {
            renderer.report_next_connection();
            GameEvent::CheckConnection
        }
        Input::Help => {
            renderer.print_help();
            return Vec::new();
        }
        Input::Quit => return Vec::new(),
        Input::Invalid(message) => {
            renderer.notice(&message);
            return Vec::new();
        }
    };
    controller.dispatch(event).await
}
