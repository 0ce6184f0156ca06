//! Main Telegram bot implementation.

use std::path::Path;
use std::sync::Arc;

use dayplan_core::Engine;
use dayplan_store::{PlanArchive, PrefsSource, SessionStore};
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::completion::MaybeCompletion;
use crate::error::{BotError, Result};
use crate::handlers::{handle_callback, handle_command, handle_message, BotEngine, Command};

/// The Dayplan Telegram bot.
pub struct DayplanBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared engine across handlers.
    engine: Arc<BotEngine>,
}

impl DayplanBot {
    /// Create a new bot instance.
    ///
    /// Requires `TELEGRAM_BOT_TOKEN` to be set; AI planning is enabled when
    /// `OPENROUTER_API_KEY` is present and quietly disabled otherwise.
    pub fn new(state_dir: &Path) -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| BotError::NoToken)?;

        let completion = MaybeCompletion::from_env();
        if !completion.is_configured() {
            warn!("OPENROUTER_API_KEY not set - /plan will be unavailable");
        }
        let model = completion.model();

        let engine = Engine::new(
            Arc::new(SessionStore::with_snapshots(state_dir)),
            PrefsSource::new(state_dir),
            PlanArchive::new(state_dir),
            completion,
            model,
        );

        Ok(Self {
            bot: Bot::new(token),
            engine: Arc::new(engine),
        })
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::StartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Run the bot with long polling until interrupted.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let bot = self.bot.clone();
        let engine_for_commands = Arc::clone(&self.engine);
        let engine_for_messages = Arc::clone(&self.engine);
        let engine_for_callbacks = Arc::clone(&self.engine);

        let handler = dptree::entry()
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, q: teloxide::types::CallbackQuery| {
                    let engine = Arc::clone(&engine_for_callbacks);
                    async move { handle_callback(bot, q, engine).await }
                },
            ))
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let engine = Arc::clone(&engine_for_commands);
                        async move { handle_command(bot, msg, cmd, engine).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        // Commands that didn't parse fall through to here.
                        msg.text().map(|t| t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(|bot: Bot, msg: Message| async move {
                        if let Some(text) = msg.text() {
                            bot.send_message(
                                msg.chat.id,
                                format!(
                                    "Unknown command: {}\n\nUse /help to see available commands.",
                                    text.split_whitespace().next().unwrap_or(text)
                                ),
                            )
                            .await?;
                        }
                        Ok(())
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        msg.text().map(|t| !t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(move |bot: Bot, msg: Message| {
                        let engine = Arc::clone(&engine_for_messages);
                        async move { handle_message(bot, msg, engine).await }
                    }),
            );

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
