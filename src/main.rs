//! Command-line entry point.
//!
//! The launcher runs this binary in one of three modes:
//!
//! ```text
//! jiraflow "<query>"            script filter: print one result document
//! jiraflow --run "<command>"    perform the side effect of a selected entry
//! jiraflow --refresh            re-fetch every bookmark into the cache
//! ```
//!
//! Every run is a fresh process. The binary loads `config.toml`, sets up
//! file logging, builds one [`Workflow`] over the JSON stores and hands it to
//! the router, the executor or the refresher.
//!
//! stdout carries only the result document (or the notification text in
//! `--run` mode); diagnostics go to `jiraflow.log` in the data directory.

use clap::Parser;
use jiraflow::app::{bookmarks, executor};
use jiraflow::infrastructure::{paths, ProcessLauncher, SystemClock};
use jiraflow::jira::JiraClient;
use jiraflow::observability::init_logging;
use jiraflow::storage::JsonStore;
use jiraflow::ui::Feedback;
use jiraflow::{Command, Config, Result, Router, Workflow};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "jiraflow", version, about = "Jira script filter for the launcher")]
struct Cli {
    /// The raw query typed so far, e.g. `assign › PROJ-12 › al`
    query: Option<String>,

    /// Run a side-effect command instead of answering a query
    #[arg(long, value_name = "COMMAND", conflicts_with = "refresh")]
    run: Option<String>,

    /// Re-fetch every bookmark's tickets into the cache
    #[arg(long)]
    refresh: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = match paths::config_file() {
        Ok(path) => path,
        Err(e) => return fail(&cli, &e),
    };
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => return fail(&cli, &e),
    };

    if let Ok(data_dir) = paths::get_data_dir() {
        init_logging(&config, &data_dir);
    }
    tracing::debug!(query = ?cli.query, run = ?cli.run, refresh = cli.refresh, "invoked");

    let outcome = match build_workflow(config, config_path) {
        Ok(mut workflow) => run(&cli, &mut workflow).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_fatal() {
                tracing::error!(error = %e, "invocation failed");
            } else {
                tracing::warn!(error = %e, "invocation failed");
            }
            fail(&cli, &e)
        }
    }
}

fn build_workflow(config: Config, config_path: PathBuf) -> Result<Workflow> {
    let tracker = JiraClient::new(&config)?;
    let data = JsonStore::new(paths::data_file()?)?;
    let session = JsonStore::new(paths::session_file()?)?;

    Ok(Workflow {
        config,
        config_path,
        tracker: Arc::new(tracker),
        data: Arc::new(data),
        session: Arc::new(session),
        feedback: Feedback::new(Box::new(std::io::stdout())),
        launcher: Arc::new(ProcessLauncher),
        clock: Arc::new(SystemClock),
    })
}

async fn run(cli: &Cli, workflow: &mut Workflow) -> Result<()> {
    if let Some(raw) = &cli.run {
        let command: Command = raw.parse()?;
        let message = executor::execute(workflow, &command).await?;
        println!("{message}");
        return Ok(());
    }

    if cli.refresh {
        if !workflow.config.is_configured() {
            tracing::debug!("not configured, skipping refresh");
            return Ok(());
        }
        let fetched = bookmarks::refresh_all(workflow).await?;
        tracing::info!(fetched, "bookmarks refreshed");
        return Ok(());
    }

    let router = Router::standard()?;
    router
        .run(workflow, cli.query.as_deref().unwrap_or_default())
        .await
}

/// Reports a failure where the launcher will show it.
///
/// A script filter must still print a result document, so the error becomes
/// the single entry; the other modes print the message as the notification.
fn fail(cli: &Cli, err: &jiraflow::JiraflowError) -> ExitCode {
    if cli.run.is_none() && !cli.refresh {
        let mut feedback = Feedback::new(Box::new(std::io::stdout()));
        if feedback.report_error(err, err.hint()).is_ok() {
            return ExitCode::SUCCESS;
        }
    } else {
        println!("{err}");
    }
    ExitCode::FAILURE
}
