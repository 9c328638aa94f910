//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use chambaya_core::config;
use chambaya_core::interrupt;
use chambaya_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "chambaya")]
#[command(version)]
#[command(about = "ChambaYa job marketplace client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(flatten)]
    Session(SessionCommands),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Commands that talk to the API with the stored session.
#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Log in and show where the app would take you next
    Login {
        /// Account email
        #[arg(long, conflicts_with = "google_id")]
        email: Option<String>,

        /// Account password
        #[arg(long, env = "CHAMBAYA_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Log in with a Google account id instead of a password
        #[arg(long, value_name = "ID")]
        google_id: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Re-run post-login routing for the stored session
    Next,

    /// Read and manage notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Browse works
    Works {
        #[command(subcommand)]
        command: WorkCommands,
    },

    /// Rate the other party of a finished work
    Rate {
        /// Id of the user being rated
        #[arg(long, value_name = "USER_ID")]
        user: String,

        /// Id of the work
        #[arg(long, value_name = "WORK_ID")]
        work: String,

        /// Score from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        score: u8,

        /// Optional comment
        #[arg(long)]
        comment: Option<String>,

        /// Role the rated user played in the work
        #[arg(long = "as", value_enum, value_name = "ROLE")]
        rated_as: commands::ratings::RatedRole,
    },

    /// Apply to a work as the logged-in user
    Apply {
        /// Id of the work
        #[arg(long, value_name = "WORK_ID")]
        work: String,
    },
}

#[derive(clap::Subcommand)]
enum NotificationCommands {
    /// List recent notifications
    List {
        /// Maximum number to fetch (defaults to [notifications].list_limit)
        #[arg(long)]
        limit: Option<u32>,

        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Show the bell badge once
    Badge,
    /// Keep polling and print the badge whenever it changes (Ctrl+C to stop)
    Watch {
        /// Poll interval (defaults to [notifications].poll_interval_secs)
        #[arg(long, value_name = "SECS")]
        interval_secs: Option<u64>,
    },
    /// Mark one notification as read
    Read {
        #[arg(value_name = "NOTIFICATION_ID")]
        id: String,
    },
    /// Mark all notifications as read
    ReadAll,
    /// Delete one notification
    Delete {
        #[arg(value_name = "NOTIFICATION_ID")]
        id: String,
    },
    /// Delete notifications older than N days
    Clean {
        /// Age threshold in days (server default: 30)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show notification counters
    Stats,
}

#[derive(clap::Subcommand)]
enum WorkCommands {
    /// List published works
    List,
    /// Show one work
    Show {
        #[arg(value_name = "WORK_ID")]
        id: String,
    },
    /// Show the active-work status used for post-login routing
    Active,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    interrupt::init()?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
        Commands::Session(command) => {
            // watch owns Ctrl+C and stops cleanly
            let handles_interrupt = matches!(
                command,
                SessionCommands::Notifications {
                    command: NotificationCommands::Watch { .. }
                }
            );
            if handles_interrupt {
                return dispatch_session(command).await;
            }
            tokio::select! {
                biased;
                () = interrupt::wait_for_interrupt() => Err(interrupt::InterruptedError.into()),
                result = dispatch_session(command) => result,
            }
        }
    }
}

async fn dispatch_session(command: SessionCommands) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let _log_guard = match logging::init(&config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };
    let app = commands::App::open(config)?;

    match command {
        SessionCommands::Login {
            email,
            password,
            google_id,
        } => match (email, password, google_id) {
            (Some(email), Some(password), None) => {
                commands::auth::login_password(&app, email, password).await
            }
            (None, _, Some(id)) => commands::auth::login_google(&app, id).await,
            _ => anyhow::bail!("Please specify --email and --password, or --google-id"),
        },
        SessionCommands::Logout => {
            commands::auth::logout(&app);
            Ok(())
        }
        SessionCommands::Whoami => {
            commands::auth::whoami(&app);
            Ok(())
        }
        SessionCommands::Next => commands::auth::next(&app).await,

        SessionCommands::Notifications { command } => match command {
            NotificationCommands::List { limit, unread } => {
                commands::notifications::list(&app, limit, unread).await
            }
            NotificationCommands::Badge => commands::notifications::badge(&app).await,
            NotificationCommands::Watch { interval_secs } => {
                commands::notifications::watch(&app, interval_secs).await
            }
            NotificationCommands::Read { id } => commands::notifications::read(&app, &id).await,
            NotificationCommands::ReadAll => commands::notifications::read_all(&app).await,
            NotificationCommands::Delete { id } => {
                commands::notifications::delete(&app, &id).await
            }
            NotificationCommands::Clean { days } => {
                commands::notifications::clean(&app, days).await
            }
            NotificationCommands::Stats => commands::notifications::stats(&app).await,
        },

        SessionCommands::Works { command } => match command {
            WorkCommands::List => commands::works::list(&app).await,
            WorkCommands::Show { id } => commands::works::show(&app, &id).await,
            WorkCommands::Active => commands::works::active(&app).await,
        },

        SessionCommands::Rate {
            user,
            work,
            score,
            comment,
            rated_as,
        } => commands::ratings::rate(&app, user, work, score, comment, rated_as).await,

        SessionCommands::Apply { work } => commands::works::apply(&app, &work).await,
    }
}
