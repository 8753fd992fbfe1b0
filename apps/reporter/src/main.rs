use std::{
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ControllerEvent, DetachedSubmit, HttpJobTransport, JobRequestController, Phase,
    SubmissionState, SubmissionView,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_server_url};

#[derive(Parser, Debug)]
#[command(name = "reporter", about = "Generate news articles with the reporter service")]
struct Args {
    /// Base URL of the generation service; overrides config and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// TOML settings file; defaults to ./reporter.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Request timeout in seconds; the http client default applies when unset.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an article; reads the topic from stdin when --topic is omitted.
    Generate {
        #[arg(long)]
        topic: Option<String>,
    },
    /// Check that the generation service is up.
    Health,
    /// Ask the service to re-index the latest headlines.
    Refresh,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url.as_deref() {
        settings.server_url = normalize_server_url(server_url)?;
    }
    if args.timeout_secs.is_some() {
        settings.request_timeout_secs = args.timeout_secs;
    }
    info!(server_url = %settings.server_url, "using generation service");

    let transport = HttpJobTransport::with_timeout(&settings.server_url, settings.request_timeout())
        .context("failed to build http client")?;

    match args.command {
        Command::Generate { topic } => {
            let topic = match topic {
                Some(topic) => topic,
                None => read_stdin_topic()?,
            };
            generate(transport, topic).await
        }
        Command::Health => {
            let health = transport
                .health()
                .await
                .map_err(|err| anyhow!(err.user_message()))?;
            println!("status: {}", health.status);
            Ok(if health.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Refresh => {
            let refreshed = transport
                .refresh_news()
                .await
                .map_err(|err| anyhow!(err.user_message()))?;
            println!(
                "fetched {} articles, indexed {} chunks",
                refreshed.fetched, refreshed.indexed
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_stdin_topic() -> Result<String> {
    let mut topic = String::new();
    io::stdin()
        .read_to_string(&mut topic)
        .context("failed to read topic from stdin")?;
    Ok(topic)
}

async fn generate(transport: HttpJobTransport, topic: String) -> Result<ExitCode> {
    let controller = JobRequestController::new(Arc::new(transport));
    controller.set_topic(topic.clone());
    let mut events = controller.subscribe();

    if let DetachedSubmit::Spawned(handle) = controller.submit_detached(&topic) {
        while let Ok(ControllerEvent::StateChanged(state)) = events.recv().await {
            if !state.is_pending() {
                break;
            }
            if let Some(status) = SubmissionView::from(&state).status_line {
                eprintln!("{status}");
            }
        }
        if let Err(err) = handle.await {
            warn!(error = %err, "generation task ended abnormally");
        }
    }

    let succeeded = render(
        &controller.snapshot(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .context("failed to write output")?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Article markdown goes to `out`; status, output note and errors go to `err`.
/// Returns whether the run counts as a success for the exit code.
fn render(state: &SubmissionState, out: &mut impl Write, err: &mut impl Write) -> io::Result<bool> {
    let view = SubmissionView::from(state);
    if let Some(article) = &view.article_markdown {
        writeln!(out, "{article}")?;
    } else if view.error.is_none() {
        if let Some(status) = view.status_line {
            writeln!(err, "{status}")?;
        }
    }
    if let Some(note) = &view.output_note {
        writeln!(err, "{note}")?;
    }
    if let Some(error) = &view.error {
        writeln!(err, "error: {error}")?;
    }

    Ok(state.phase == Phase::Succeeded)
}
