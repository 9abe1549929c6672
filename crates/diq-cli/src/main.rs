use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use diq_core::DiqError;

mod app;
mod commands;
mod logging;
mod notifier;

#[derive(Parser)]
#[command(name = "diq")]
#[command(about = "DecisionIQ CLI - log decisions and track how they turned out", long_about = None)]
struct Cli {
    /// API base URL (overrides DIQ_API_URL and config.toml)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding config.toml, session.toml and logs/
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account, then sign in
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Update username and email
    Profile {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
    },
    /// List decisions, newest first
    List,
    /// Decisions whose situation or decision contains QUERY
    Search { query: String },
    /// Decisions still waiting for an outcome
    Pending,
    /// Record a new decision
    Log(commands::decisions::LogArgs),
    /// Record how a decision turned out
    Outcome(commands::decisions::OutcomeArgs),
    /// Delete a decision
    Delete { id: String },
    /// Success rate and averages
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let app = match app::App::bootstrap(cli.config_dir.as_deref(), cli.api_url) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(&app, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Client errors have already been shown through the notifier.
            if e.downcast_ref::<DiqError>().is_none() {
                eprintln!("{} {:#}", "error:".red().bold(), e);
            }
            tracing::debug!("[CLI] Command failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &app::App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            commands::auth::login(app, &username, password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(app, &username, &email, password).await,
        Commands::Logout => commands::auth::logout(app).await,
        Commands::Whoami => commands::auth::whoami(app).await,
        Commands::Profile { username, email } => {
            commands::auth::update_profile(app, &username, &email).await
        }
        Commands::List => commands::decisions::list(app).await,
        Commands::Search { query } => commands::decisions::search(app, &query).await,
        Commands::Pending => commands::decisions::pending(app).await,
        Commands::Log(args) => commands::decisions::log(app, args).await,
        Commands::Outcome(args) => commands::decisions::outcome(app, args).await,
        Commands::Delete { id } => commands::decisions::delete(app, &id).await,
        Commands::Stats => commands::decisions::stats(app).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "diq",
            "outcome",
            "65f0c2",
            "--failure",
            "--stress",
            "8",
            "--api-url",
            "http://example.test/api",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://example.test/api"));
        assert!(matches!(cli.command, Commands::Outcome(_)));
    }
}
