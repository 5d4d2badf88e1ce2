// Teddy - Dear Teddy journal analysis service
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use teddy::analysis::AnalysisPipeline;
use teddy::config::{load_config, Config};
use teddy::notify::{Channel, NotificationTracker};
use teddy::providers::OpenAiProvider;
use teddy::server::TeddyServer;
use teddy::store::{JournalStore, NewEntry};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "teddy")]
#[command(about = "Dear Teddy journal analysis service", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Bind address (default: from config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Save a journal entry and analyze it
    Analyze {
        /// User the entry belongs to
        #[arg(long)]
        user: String,
        /// Entry title
        #[arg(long)]
        title: String,
        /// Self-reported anxiety level, 1-10
        #[arg(long)]
        anxiety: u8,
        /// Entry text; read from stdin when omitted
        #[arg(long)]
        content: Option<String>,
    },
    /// Show the history summary a user's next analysis would see
    History {
        /// User id
        user: String,
    },
    /// Notification dedup commands
    Notify {
        #[command(subcommand)]
        notify_command: NotifyCommand,
    },
    /// Drop old notification records
    Prune {
        /// Retention window in days (default: from config)
        #[arg(long)]
        days: Option<i64>,
    },
}

#[derive(Parser, Debug)]
enum NotifyCommand {
    /// Record that a user received a notification today
    Track {
        /// Channel: email, sms, or weekly_summary
        channel: String,
        /// User id
        user: String,
    },
    /// Check whether a user already received a notification
    Check {
        /// Channel: email, sms, or weekly_summary
        channel: String,
        /// User id
        user: String,
        /// Look-back window in days (0 = today only)
        #[arg(long, default_value_t = 0)]
        days: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = load_config()?;

    match args.command {
        Command::Serve { bind } => run_serve(config, bind).await,
        Command::Analyze {
            user,
            title,
            anxiety,
            content,
        } => run_analyze(config, user, title, anxiety, content).await,
        Command::History { user } => run_history(config, &user),
        Command::Notify { notify_command } => run_notify(config, notify_command),
        Command::Prune { days } => run_prune(config, days),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("teddy=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_store(config: &Config) -> Result<Arc<JournalStore>> {
    let store = JournalStore::open(&config.db_path())
        .with_context(|| format!("Failed to open journal store at {}", config.db_path().display()))?;
    Ok(Arc::new(store))
}

fn build_pipeline(config: &Config, store: Arc<JournalStore>) -> Result<AnalysisPipeline> {
    let provider = OpenAiProvider::with_base_url(config.api_key.clone(), config.base_url.clone())
        .context("Failed to create provider")?
        .with_model(config.model.clone());
    Ok(AnalysisPipeline::new(store, Arc::new(provider)))
}

async fn run_serve(config: Config, bind: Option<String>) -> Result<()> {
    let store = open_store(&config)?;
    let provider = OpenAiProvider::with_base_url(config.api_key.clone(), config.base_url.clone())
        .context("Failed to create provider")?
        .with_model(config.model.clone());

    let server = TeddyServer::new(store, Arc::new(provider), config.model.clone());
    let bind_address = bind.unwrap_or(config.bind_address);
    server.serve(&bind_address).await
}

async fn run_analyze(
    config: Config,
    user: String,
    title: String,
    anxiety: u8,
    content: Option<String>,
) -> Result<()> {
    let content = match content {
        Some(text) => text,
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                anyhow::bail!("No entry text. Pass --content or pipe the entry on stdin.");
            }
            let mut buffer = String::new();
            stdin.read_to_string(&mut buffer)?;
            buffer
        }
    };

    let store = open_store(&config)?;
    let pipeline = build_pipeline(&config, store)?;

    let (_, report) = pipeline
        .save_and_analyze(NewEntry {
            user_id: user,
            title,
            content,
            anxiety_level: anxiety,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_history(config: Config, user: &str) -> Result<()> {
    let store = open_store(&config)?;
    let pipeline = build_pipeline(&config, store)?;

    match pipeline.history_block_for_user(user)? {
        Some(block) => println!("{block}"),
        None => println!("Not enough entries yet to summarize."),
    }
    Ok(())
}

fn run_notify(config: Config, command: NotifyCommand) -> Result<()> {
    let store = open_store(&config)?;
    let tracker = NotificationTracker::new(store);

    match command {
        NotifyCommand::Track { channel, user } => {
            let channel: Channel = channel.parse()?;
            if tracker.track(channel, &user)? {
                println!("Tracked {channel} notification for {user}.");
            } else {
                println!("{user} already received a {channel} notification today.");
            }
        }
        NotifyCommand::Check {
            channel,
            user,
            days,
        } => {
            let channel: Channel = channel.parse()?;
            let received = tracker.has_received(channel, &user, days)?;
            println!("{received}");
        }
    }
    Ok(())
}

fn run_prune(config: Config, days: Option<i64>) -> Result<()> {
    let store = open_store(&config)?;
    let tracker = NotificationTracker::new(store);

    let days = days.unwrap_or(config.prune_after_days);
    let removed = tracker.prune(days)?;
    println!("Removed {removed} notification records older than {days} days.");
    Ok(())
}
