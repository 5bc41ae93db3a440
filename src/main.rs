use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use slotwatch::calendar::monday_strings;
use slotwatch::client::HttpBookingClient;
use slotwatch::config::{Config, validate_interval};
use slotwatch::credentials::{CredentialSource, FileCredentialSource};
use slotwatch::domain::{PollOutcome, TargetDateSet, Termination};
use slotwatch::report::{AvailabilitySummary, Event, Severity};
use slotwatch::runner::{PollLoopConfig, Session};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slotwatch")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("slotwatch.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn timestamp() -> String {
    chrono::Local::now().format("[%H:%M:%S]").to_string()
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    match &cli.command {
        Commands::Watch {
            dates,
            all_mondays,
            interval,
            token,
        } => handle_watch_command(dates, *all_mondays, *interval, token.clone(), cli.is_verbose(), config).await,
        Commands::Query { token } => handle_query_command(token.clone(), config).await,
        Commands::Dates => handle_dates_command(config),
    }
}

async fn handle_watch_command(
    dates: &[String],
    all_mondays: bool,
    interval: Option<u64>,
    token: Option<String>,
    verbose: bool,
    config: &Config,
) -> Result<()> {
    let mut selected: Vec<String> = dates.to_vec();
    if all_mondays {
        selected.extend(monday_strings(config.calendar.start, config.calendar.end));
    }
    let targets = match TargetDateSet::new(&selected) {
        Ok(targets) => targets,
        Err(e) => {
            println!("{} {}", "[WARN]".yellow(), e);
            bail!("No usable target dates: {}", e);
        }
    };

    let mut poll = config.poll.clone();
    if let Some(secs) = interval {
        validate_interval(secs)?;
        poll.interval_secs = secs;
    }
    let loop_config = PollLoopConfig::from_poll_config(&poll)?;

    let service = Arc::new(HttpBookingClient::new(config.service.clone())?);
    let credentials: Arc<dyn CredentialSource> =
        Arc::new(FileCredentialSource::new(&config.credentials).with_token(token));
    let mut session = Session::new(service, credentials, loop_config);

    if verbose {
        println!("{}", format!("Query endpoint: {}", config.service.query_url).dimmed());
        println!("{}", format!("Booking endpoint: {}", config.service.book_url).dimmed());
        println!(
            "{}",
            format!("Credential file: {}", config.credentials.path.display()).dimmed()
        );
    }

    println!(
        "{} {}",
        timestamp(),
        format!("Starting watch for {} every {}s …", targets, poll.interval_secs).cyan()
    );
    let mut events = session.start(targets)?;

    let mut stop_sent = false;
    let mut outcome: Option<Termination> = None;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    println!("{}", styled_event(&event));
                    if let Some(termination) = event.termination() {
                        outcome = Some(termination.clone());
                        break;
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if !stop_sent => {
                stop_sent = true;
                println!("{} {}", timestamp(), "Stop requested…".yellow());
                if session.stop(config.poll.stop_grace()).await.is_none() {
                    println!(
                        "{} {}",
                        timestamp(),
                        "[WARN] Loop is still waiting on a request; exiting without it".yellow()
                    );
                    break;
                }
            }
        }
    }

    println!("{} Background task ended", timestamp());
    match outcome {
        Some(Termination::Success(date)) => {
            println!("{}", format!("🎉 Booked {}, done", date).green().bold());
            Ok(())
        }
        Some(Termination::Fatal(reason)) => bail!("Watch failed: {}", reason),
        Some(Termination::Cancelled) | None => Ok(()),
    }
}

/// Console styling for one loop event. Every event is shown, debug lines dimmed.
fn styled_event(event: &Event) -> ColoredString {
    let line = event.render();
    match event {
        Event::Line { severity, .. } => match severity {
            Severity::Debug => line.dimmed(),
            Severity::Info => line.normal(),
            Severity::Warn => line.yellow(),
            Severity::Error => line.red(),
        },
        Event::Finished { termination, .. } => match termination {
            Termination::Success(_) => line.green().bold(),
            Termination::Cancelled => line.yellow(),
            Termination::Fatal(_) => line.red().bold(),
        },
    }
}

async fn handle_query_command(token: Option<String>, config: &Config) -> Result<()> {
    info!("Running one-off availability query");
    let service = Arc::new(HttpBookingClient::new(config.service.clone())?);
    let credentials: Arc<dyn CredentialSource> =
        Arc::new(FileCredentialSource::new(&config.credentials).with_token(token));
    let session = Session::new(service, credentials, PollLoopConfig::default());

    println!("{} Querying available dates…", timestamp());
    let outcome = session.query_once().await.context("Query failed")?;

    match outcome {
        PollOutcome::Slots(slots) => {
            let summary = AvailabilitySummary::from_slots(&slots);
            if summary.is_empty() {
                println!("{} {}", "[INFO]".cyan(), "No slots released yet");
                return Ok(());
            }
            println!("{} Open cities: {}", timestamp(), summary.cities_line());
            println!("{} Open dates: {}", timestamp(), summary.dates_line());
            Ok(())
        }
        PollOutcome::AuthExpired { snippet } => {
            bail!("Session expired or login invalid, refresh the credential file (response: {})", snippet)
        }
        PollOutcome::MalformedResponse { snippet } => {
            bail!("Response is not valid JSON: {:?}", snippet)
        }
        PollOutcome::TransientError(detail) => bail!("Query failed: {}", detail),
    }
}

fn handle_dates_command(config: &Config) -> Result<()> {
    let mondays = monday_strings(config.calendar.start, config.calendar.end);
    if mondays.is_empty() {
        println!("{}", "No Mondays in the configured calendar".yellow());
        return Ok(());
    }
    for date in mondays {
        println!("{}", date);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
