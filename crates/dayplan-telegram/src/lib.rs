//! Telegram bot interface for Dayplan.
//!
//! This crate wires the session engine to Telegram: commands and inline
//! buttons become engine events, engine replies become messages with
//! keyboards built from the engine's named layouts.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `OPENROUTER_API_KEY`: enables the /plan command
//! - `OPENROUTER_MODEL`: model to use for planning
//! - `DAYPLAN_STATE_DIR`: override the state directory
//!
//! # Commands
//!
//! - `/start` - Welcome message and help
//! - `/help` - Show available commands
//! - `/newlist` - Start a new task list
//! - `/quicklist` - Create a list from one message
//! - `/list` - Show the current list
//! - `/plan` - AI-sorted day plan
//! - `/cancel` - Abort the current multi-step action

pub mod bot;
pub mod completion;
pub mod error;
pub mod handlers;
pub mod keyboards;

pub use bot::DayplanBot;
pub use completion::MaybeCompletion;
pub use error::{BotError, Result};
pub use handlers::{BotEngine, Command};
