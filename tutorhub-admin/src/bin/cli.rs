//! Command line client for the admin API
//!
//! Keeps the signed-in session in a local file so consecutive commands
//! stay authenticated.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use tutorhub_admin::AdminClient;
use tutorhub_core::model::{Account, Booking, TutorApplication};
use tutorhub_core::token;

#[derive(Parser)]
#[command(name = "tutorhub-cli")]
#[command(about = "Administer a TutorHub deployment from the terminal")]
struct Cli {
    /// Base URL of the admin API
    #[arg(long, default_value = "http://localhost:3000")]
    api_url: String,

    /// Where the signed-in session is stored
    #[arg(long, default_value = ".tutorhub-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login { email: String, password: String },
    /// Revoke the current session's tokens
    Logout,
    /// Show the signed-in admin
    Me,
    /// List user accounts
    Users {
        /// Only accounts with this role (student, tutor, admin)
        #[arg(long)]
        role: Option<String>,
    },
    /// Block an account
    Block { uid: String },
    /// Unblock an account
    Unblock { uid: String },
    /// List tutor applications
    Applications {
        /// Only applications with this status (pending, approved, rejected)
        #[arg(long)]
        status: Option<String>,
    },
    /// Review a tutor application
    Review {
        id: String,
        /// approved or rejected
        status: String,
    },
    /// List bookings
    Bookings {
        /// Only bookings with this status (active, completed, cancelled)
        #[arg(long)]
        status: Option<String>,
        /// Earliest session date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest session date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show dashboard statistics
    Stats,
    /// Follow dashboard statistics as they change
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut client = AdminClient::new(&cli.api_url, &cli.session_file);

    // Login and logout manage the session themselves.
    if !matches!(cli.command, Commands::Login { .. } | Commands::Logout) {
        check_session(&client)?;
    }

    match cli.command {
        Commands::Login { email, password } => {
            let admin = client.login(&email, &password).await?;
            println!("Logged in as {} ({})", admin.display_name, admin.email);
        }
        Commands::Logout => {
            let message = client.logout().await?;
            println!("{message}");
        }
        Commands::Me => {
            let profile = client.me().await?;
            println!(
                "{} <{}> [{}]",
                profile.display_name,
                profile.email,
                profile.role.as_str()
            );
        }
        Commands::Users { role } => {
            let users = client.list_users(role.as_deref()).await?;
            print_users(&users);
        }
        Commands::Block { uid } => {
            println!("{}", client.set_block_status(&uid, true).await?);
        }
        Commands::Unblock { uid } => {
            println!("{}", client.set_block_status(&uid, false).await?);
        }
        Commands::Applications { status } => {
            let applications = client.list_applications(status.as_deref()).await?;
            print_applications(&applications);
        }
        Commands::Review { id, status } => {
            println!("{}", client.review_application(&id, &status).await?);
        }
        Commands::Bookings { status, from, to } => {
            let bookings = client
                .list_bookings(status.as_deref(), from.as_deref(), to.as_deref())
                .await?;
            print_bookings(&bookings);
        }
        Commands::Stats => {
            let stats = client.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Watch => {
            println!("Watching dashboard statistics (Ctrl-C to stop)");
            client
                .watch_stats(|stats| {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&stats).unwrap_or_default()
                    );
                })
                .await?;
        }
    }

    Ok(())
}

/// Refuse to call the API with a stored token that has already expired.
fn check_session(client: &AdminClient) -> Result<()> {
    if let Some(session) = client.session() {
        if let Ok(claims) = token::peek(&session.token) {
            if claims.is_expired() {
                bail!("Stored session has expired; run login again");
            }
        }
    }
    Ok(())
}

fn print_users(users: &[Account]) {
    if users.is_empty() {
        println!("No accounts found");
        return;
    }
    for user in users {
        let flags = match (user.is_blocked, user.is_tutor_verified) {
            (true, true) => " [blocked, verified]",
            (true, false) => " [blocked]",
            (false, true) => " [verified]",
            (false, false) => "",
        };
        println!(
            "{}  {:<8}  {} <{}>{}",
            user.uid,
            user.role.as_str(),
            user.display_name.as_deref().unwrap_or("-"),
            user.email,
            flags
        );
    }
}

fn print_applications(applications: &[TutorApplication]) {
    if applications.is_empty() {
        println!("No applications found");
        return;
    }
    for app in applications {
        println!(
            "{}  {:<8}  {}  {} ({})",
            app.id,
            app.status.as_str(),
            app.submitted_at.format("%Y-%m-%d"),
            app.full_name.as_deref().unwrap_or("-"),
            app.subject.as_deref().unwrap_or("-")
        );
    }
}

fn print_bookings(bookings: &[Booking]) {
    if bookings.is_empty() {
        println!("No bookings found");
        return;
    }
    for booking in bookings {
        let price = booking
            .price
            .map(|p| format!("${p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {:<9}  {}  {}",
            booking.id,
            booking.canonical_status().as_str(),
            booking.start_at.format("%Y-%m-%d %H:%M"),
            price
        );
    }
}
