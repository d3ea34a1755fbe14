use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wingetup::remove::RemoveRequest;
use wingetup::update::UpdateRequest;

mod cli;

#[derive(Parser)]
#[command(name = "wingetup")]
#[command(about = "Update published winget manifests and submit them as pull requests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update a published package to a new version
    Update {
        /// Package identifier (e.g. Microsoft.PowerToys)
        #[arg(short, long)]
        id: Option<String>,
        /// New package version
        #[arg(short, long)]
        version: Option<String>,
        /// New installer URLs; skips the per-installer prompts
        #[arg(short, long, num_args = 1..)]
        urls: Vec<String>,
        /// Open the pull request without asking
        #[arg(short, long)]
        submit: bool,
    },
    /// Remove a published package version
    Remove {
        /// Package identifier
        #[arg(short, long)]
        id: Option<String>,
        /// Version to remove
        #[arg(short, long)]
        version: Option<String>,
        /// Why the version is being removed
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// Store a GitHub token in the OS keychain
    Login,
    /// Delete the stored GitHub token
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Update {
            id,
            version,
            urls,
            submit,
        } => {
            let outcome = cli::update::run(UpdateRequest {
                identifier: id,
                version,
                urls,
                submit,
            })
            .await;
            cli::outcome_exit_code(outcome)
        }
        Commands::Remove {
            id,
            version,
            reason,
        } => {
            let outcome = cli::remove::run(RemoveRequest {
                identifier: id,
                version,
                reason,
            })
            .await;
            cli::outcome_exit_code(outcome)
        }
        Commands::Login => cli::result_exit_code(cli::login::run().await),
        Commands::Logout => cli::result_exit_code(cli::login::logout()),
    }
}
