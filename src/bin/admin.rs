//! CLI administration tool for the signup form.
//!
//! Reads the same environment (and `.env` file) as the server and operates on
//! the configured duplicate store and mail relay without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # List stored signups
//! cargo run --bin admin -- list
//!
//! # Count stored signups
//! cargo run --bin admin -- count
//!
//! # Check whether an address is already registered
//! cargo run --bin admin -- check someone@example.com
//!
//! # Send a confirmation email to test the relay settings
//! cargo run --bin admin -- send-test someone@example.com
//! ```

use signup_form::config::{self, Config};
use signup_form::logging;
use signup_form::prelude::{Notifier, SignupRepository};
use signup_form::server::{build_notifier, build_repository};
use signup_form::utils::email_validator::{is_valid_email, normalize_email};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing the signup list.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List stored signups in storage order
    List,

    /// Show the number of stored signups
    Count,

    /// Check whether an address is already stored
    Check {
        /// Address to look up (surrounding whitespace is ignored)
        email: String,
    },

    /// Send a confirmation email through the configured relay
    SendTest {
        /// Recipient address
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    logging::init_tracing(&config)?;

    match cli.command {
        Commands::List => list_signups(&config).await?,
        Commands::Count => count_signups(&config).await?,
        Commands::Check { email } => check_signup(&config, &email).await?,
        Commands::SendTest { email, yes } => send_test(&config, &email, yes).await?,
    }

    Ok(())
}

/// Prints every stored address with its position.
///
/// # Output Format
///
/// ```text
/// 📋 Signups
///
///      1  first@example.com
///      2  second@example.com
///
///   Total: 2
/// ```
async fn list_signups(config: &Config) -> Result<()> {
    println!("{}", "📋 Signups".bright_blue().bold());
    println!();

    let emails = build_repository(config)
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read signups: {}", e))?;

    if emails.is_empty() {
        println!("{}", "  No signups yet".yellow());
        return Ok(());
    }

    for (index, email) in emails.iter().enumerate() {
        println!(
            "  {:>4}  {}",
            (index + 1).to_string().bright_black(),
            email.cyan()
        );
    }

    println!();
    println!(
        "  Total: {}",
        emails.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn count_signups(config: &Config) -> Result<()> {
    let count = build_repository(config)
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read signups: {}", e))?
        .len();

    println!("{} {}", "📊 Signups:".bright_blue().bold(), count.to_string().bright_white().bold());

    Ok(())
}

/// Reports whether an address is stored, using the same exact match as the form.
async fn check_signup(config: &Config, email: &str) -> Result<()> {
    let email = normalize_email(email);

    let found = build_repository(config)
        .contains(email)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read signups: {}", e))?;

    if found {
        println!("{} {}", "✅ Registered:".green().bold(), email.cyan());
    } else {
        println!("{} {}", "❌ Not registered:".red().bold(), email.cyan());
        if !is_valid_email(email) {
            println!("{}", "  (this is not a valid email address)".yellow());
        }
    }

    Ok(())
}

/// Sends one confirmation email after a confirmation prompt.
///
/// Nothing is written to the store.
async fn send_test(config: &Config, email: &str, skip_confirm: bool) -> Result<()> {
    let email = normalize_email(email);

    if !is_valid_email(email) {
        anyhow::bail!("'{}' is not a valid email address", email);
    }

    let notifier = build_notifier(config);
    if !notifier.is_configured() {
        anyhow::bail!("SMTP_USERNAME and SMTP_PASSWORD must be set to send email");
    }

    println!("{}", "✉️  Send test confirmation".bright_blue().bold());
    println!("  Relay: {}:{}", config.mail.smtp_host.cyan(), config.mail.smtp_port);
    println!("  To:    {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Send this email?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    if notifier.send(email).await {
        println!("{}", "✅ Confirmation sent".green().bold());
        Ok(())
    } else {
        anyhow::bail!("Failed to send confirmation (see log output for the cause)")
    }
}
