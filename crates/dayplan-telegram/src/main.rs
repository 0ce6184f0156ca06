//! Dayplan Telegram bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p dayplan-telegram
//! ```

use clap::Parser;
use dayplan_core::config;
use dayplan_telegram::DayplanBot;
use tracing_subscriber::EnvFilter;

/// Dayplan Telegram bot - collect tasks and plan your day
#[derive(Parser, Debug)]
#[command(name = "dayplan-telegram")]
#[command(about = "Telegram bot that turns your tasks into an AI-sorted day plan")]
struct Args {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables from .env.local or .env if present.
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    // Initialize logging based on verbosity.
    let filter = match args.verbose {
        0 => "dayplan_telegram=info,dayplan_core=info,dayplan_store=info,teloxide=warn",
        1 => "dayplan_telegram=debug,dayplan_core=debug,dayplan_store=debug,teloxide=info",
        2 => "dayplan_telegram=trace,dayplan_core=trace,dayplan_store=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Ensure the state directories exist before the store loads snapshots.
    if let Err(e) = config::ensure_all_dirs() {
        tracing::warn!(error = %e, "Failed to create state directories");
    }

    let bot = DayplanBot::new(&config::state_dir())?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] Dayplan Telegram Bot");
            println!("   Bot: @{}", username);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n[phone] Open Telegram and send /start to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
