use pi_buddy::command::parse;
use pi_buddy::error::AppError;
use pi_buddy::logger::initialize as LoggerInitialize;
use pi_buddy::terminal::Terminal;

use pi_core::config::{AppConfig, default_config_dir, default_data_dir, load_dotenv};
use pi_core::error::CoreError;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;

use log::{error, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

const PROMPT: &str = "> ";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let data_dir = default_data_dir().ok_or_else(|| AppError::App {
        message: String::from("Failed to determine data directory"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    create_dir_all(&data_dir).map_err(|e| AppError::App {
        message: format!("Failed to create data directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&data_dir)?;

    info!("Pi Buddy starting");
    info!("Data directory: {}", data_dir.display());

    load_dotenv();

    let config_dir = default_config_dir().ok_or_else(|| AppError::App {
        message: String::from("Failed to determine config directory"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    let mut config = AppConfig::load(&config_dir).map_err(CoreError::from)?;
    config.apply_env_overrides().map_err(CoreError::from)?;

    let mut terminal = Terminal::new(config, &data_dir)?;

    let mut stdout = tokio::io::stdout();
    write_lines(&mut stdout, &terminal.greeting()).await?;

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await.map_err(io_error)?;
        stdout.flush().await.map_err(io_error)?;

        let Some(line) = input.next_line().await.map_err(io_error)? else {
            break;
        };

        let outcome = terminal.handle(parse(&line)).await;
        write_lines(&mut stdout, &outcome.lines).await?;

        if outcome.quit {
            break;
        }
    }

    info!("Pi Buddy exiting");
    Ok(())
}

async fn write_lines(stdout: &mut Stdout, lines: &[String]) -> Result<(), AppError> {
    for line in lines {
        stdout.write_all(line.as_bytes()).await.map_err(io_error)?;
        stdout.write_all(b"\n").await.map_err(io_error)?;
    }
    stdout.flush().await.map_err(io_error)
}

#[track_caller]
fn io_error(e: std::io::Error) -> AppError {
    AppError::Io {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
