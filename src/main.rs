//! Project Wizard - headless driver
//!
//! Reads one JSON command per line on stdin and answers each with a JSON
//! status line on stdout. Logs go to stderr.

use anyhow::Result;
use project_wizard::command::{self, Command, StatusReport};
use project_wizard::config::WizardConfig;
use project_wizard::draft::FileDraftStore;
use project_wizard::submission::HttpSubmissionClient;
use project_wizard::WizardController;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "project_wizard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = WizardConfig::load()?;
    let drafts = FileDraftStore::new(config.draft_dir(), config.draft_namespace())?;
    tracing::info!("Drafts stored at {}", drafts.path().display());
    let service =
        HttpSubmissionClient::new(config.submission_url(), config.submission_timeout())?;
    tracing::info!("Submitting to {}", service.url());

    let mut wizard = WizardController::initialize(Box::new(drafts));
    let mut stdout = tokio::io::stdout();
    emit(&mut stdout, &StatusReport::from_controller(&wizard)).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let report = match Command::parse(line) {
            Ok(cmd) => command::execute(&mut wizard, cmd, &service).await,
            Err(e) => {
                tracing::debug!("Unreadable command: {e}");
                StatusReport::from_controller(&wizard).with_error(format!("invalid command: {e}"))
            }
        };
        emit(&mut stdout, &report).await?;
    }

    Ok(())
}

async fn emit(stdout: &mut tokio::io::Stdout, report: &StatusReport) -> Result<()> {
    let mut line = serde_json::to_string(report)?;
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
