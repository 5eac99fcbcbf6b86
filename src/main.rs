//! asc-submit - Automated App Store review submission
//!
//! CLI binary for promoting a TestFlight build to an App Store version and
//! submitting it for review.

use anyhow::Result;
use asc_submit::auth::ConnectCredentials;
use asc_submit::types::ReleaseNotes;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "asc-submit")]
#[command(about = "Submit App Store versions for review from TestFlight builds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// App Store Connect API key inputs, taken from flags or the environment
/// so the binary drops straight into a CI step
#[derive(Args)]
struct CredentialArgs {
    /// Issuer id of the App Store Connect API key
    #[arg(long, env = "APP_STORE_CONNECT_ISSUER_ID")]
    issuer_id: String,

    /// Key id of the App Store Connect API key
    #[arg(long, env = "APP_STORE_CONNECT_KEY_ID")]
    key_id: String,

    /// Private key contents (.p8 PEM, plain or base64-encoded)
    #[arg(long, env = "APP_STORE_CONNECT_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Path to the .p8 private key file
    #[arg(long, env = "APP_STORE_CONNECT_PRIVATE_KEY_PATH")]
    private_key_path: Option<PathBuf>,
}

impl CredentialArgs {
    fn resolve(self) -> asc_submit::error::Result<ConnectCredentials> {
        ConnectCredentials::resolve(
            self.issuer_id,
            self.key_id,
            self.private_key,
            self.private_key_path.as_deref(),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Promote a TestFlight build to an App Store version and submit it
    /// for review
    Submit {
        /// App id in App Store Connect
        #[arg(long, env = "APP_STORE_CONNECT_APP_ID")]
        app_id: String,

        /// Version string to submit (e.g. "2.0.1303")
        #[arg(long)]
        version: String,

        /// Japanese "What's New" text
        #[arg(long, env = "WHATS_NEW_JA")]
        notes_ja: String,

        /// English "What's New" text
        #[arg(long, env = "WHATS_NEW_EN")]
        notes_en: String,

        /// Chinese "What's New" text
        #[arg(long, env = "WHATS_NEW_ZH")]
        notes_zh: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Find the TestFlight build for a version label and print its details
    FindBuild {
        /// App id in App Store Connect
        #[arg(long, env = "APP_STORE_CONNECT_APP_ID")]
        app_id: String,

        /// Version string to look for
        #[arg(long)]
        version: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test App Store Connect credentials
    Test {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Show credential setup instructions
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            app_id,
            version,
            notes_ja,
            notes_en,
            notes_zh,
            credentials,
        } => {
            let notes = ReleaseNotes {
                ja: notes_ja,
                en: notes_en,
                zh: notes_zh,
            };
            cli::run_submit(&credentials.resolve()?, &app_id, &version, notes).await?;
        }
        Commands::FindBuild {
            app_id,
            version,
            credentials,
        } => {
            cli::run_find_build(&credentials.resolve()?, &app_id, &version).await?;
        }
        Commands::Auth { action } => match action {
            AuthAction::Test { credentials } => {
                cli::run_auth_test(&credentials.resolve()?).await?;
            }
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(())
}
