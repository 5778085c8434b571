use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod deleter;
mod error;
mod github;

use config::Inputs;
use deleter::TagDeleter;
use github::GitHubClient;

const UNKNOWN_ERROR: &str = "unknown error";

/// Inputs are plain strings; validation happens in `config::resolve`.
#[derive(Parser)]
#[command(name = "tag-release-deleter")]
#[command(about = "Delete a tag and/or its release from a GitHub repository")]
struct Cli {
    /// GitHub token (falls back to the GITHUB_TOKEN env var)
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Tag to delete
    #[arg(short, long, env = "INPUT_TAG")]
    tag: Option<String>,

    /// Target repository as owner/name (defaults to the current repository)
    #[arg(short, long, env = "INPUT_REPO")]
    repo: Option<String>,

    /// Delete the tag (true/yes/y/1); implies --delete-release
    #[arg(long, env = "INPUT_DELETE-TAG")]
    delete_tag: Option<String>,

    /// Delete the release attached to the tag (true/yes/y/1)
    #[arg(long, env = "INPUT_DELETE-RELEASE")]
    delete_release: Option<String>,

    /// Repository the workflow runs in
    #[arg(long, env = "GITHUB_REPOSITORY", hide = true)]
    current_repo: Option<String>,

    /// GitHub REST API base URL, for GitHub Enterprise Server
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = failure_message(&err);
            error!("{}", message);
            // workflow command picked up by the Actions runner
            println!("::error::{}", escape_data(&message));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let token = config::resolve_token(cli.github_token, std::env::var("GITHUB_TOKEN").ok())?;

    let inputs = Inputs {
        tag: cli.tag,
        repo: cli.repo,
        delete_tag: cli.delete_tag,
        delete_release: cli.delete_release,
        current_repo: cli.current_repo,
    };
    let request = config::resolve(&inputs)?;
    debug!(?request, "resolved deletion request");

    let client = GitHubClient::new(token, cli.api_url).await?;
    let outcome = TagDeleter::new(client).run(&request).await?;

    info!(
        "{}/{} {}: release {}, tag {}",
        request.owner(),
        request.repo(),
        request.tag_name(),
        outcome.release,
        outcome.tag
    );

    Ok(())
}

/// The single line reported to the pipeline for a failed run.
fn failure_message(err: &anyhow::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Workflow-command data escaping, so a multi-line message stays one annotation.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
