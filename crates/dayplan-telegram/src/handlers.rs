//! Command, message, and callback handlers for the Telegram bot.

use std::sync::Arc;

use dayplan_core::{Action, Engine, EngineError, Reply};
use dayplan_planner::PlannerError;
use dayplan_store::StoreError;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::completion::MaybeCompletion;
use crate::keyboards;

/// The concrete engine the bot runs.
pub type BotEngine = Engine<MaybeCompletion>;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and get help")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Start a new task list")]
    NewList,

    #[command(description = "Create a list from one message (newlines or commas)")]
    QuickList,

    #[command(description = "Show the current task list")]
    List,

    #[command(description = "Get an AI-sorted plan for your day")]
    Plan,

    #[command(description = "Cancel the current multi-step action")]
    Cancel,
}

/// Turns an engine error into the message the user sees.
///
/// Every error is recoverable: the text tells the user what to do next, and
/// their session (if any) is untouched.
fn describe_error(err: &EngineError) -> String {
    match err {
        EngineError::Store(StoreError::NoActiveSession) => {
            "❌ You don't have an active task list!\n\nStart one with /newlist.".to_string()
        }
        EngineError::Store(StoreError::IndexOutOfRange { .. }) => {
            "❌ That task number is no longer valid.\n\nShow the list and try again.".to_string()
        }
        EngineError::Store(StoreError::EmptyText) => {
            "❌ The text must not be empty. Try again:".to_string()
        }
        EngineError::Store(StoreError::TextTooLong { limit }) => {
            format!("❌ Too long (limit {} characters). Try a shorter one:", limit)
        }
        EngineError::Store(StoreError::NoPendingOperation) => {
            "❌ Nothing is waiting for that input. Use the buttons to start over.".to_string()
        }
        EngineError::Planner(PlannerError::Configuration(_)) => {
            "⚠️ AI planning is not configured.\n\nSet OPENROUTER_API_KEY to enable /plan."
                .to_string()
        }
        EngineError::Planner(_) => {
            "⚠️ <b>Could not build a plan</b>\n\nTry again later.".to_string()
        }
    }
}

/// Sends a rendered reply, mapping its named keyboard onto real buttons.
async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    let mut request = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);
    if let Some(markup) = keyboards::build(&reply.keyboard) {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

/// Sends either the reply or the message for its error.
async fn send_outcome(
    bot: &Bot,
    chat_id: ChatId,
    outcome: Result<Reply, EngineError>,
) -> ResponseResult<()> {
    match outcome {
        Ok(reply) => send_reply(bot, chat_id, reply).await,
        Err(e) => {
            debug!(chat_id = %chat_id, error = %e, "Operation rejected");
            bot.send_message(chat_id, describe_error(&e))
                .parse_mode(ParseMode::Html)
                .await?;
            Ok(())
        }
    }
}

/// Handle the /start command.
async fn handle_start(bot: Bot, msg: Message, engine: Arc<BotEngine>) -> ResponseResult<()> {
    let planning = if engine.store().has_session(msg.chat.id.0).await {
        // A session survived a restart; remind the user it is still there.
        "\n\n📋 You have a task list in progress; /list shows it."
    } else {
        ""
    };

    let welcome = format!(
        "Welcome to Dayplan! 🗓️\n\n\
        I help you collect your tasks and turn them into a day plan.\n\n\
        <b>Getting started:</b>\n\
        1. /newlist - start a task list\n\
        2. Send tasks one message at a time\n\
        3. /plan - let the AI sort them around your productive hours\n\n\
        Type /help for all commands.{}",
        planning
    );

    bot.send_message(msg.chat.id, welcome)
        .parse_mode(ParseMode::Html)
        .await?;

    info!(chat_id = %msg.chat.id, user = ?msg.from.as_ref().map(|u| &u.username), "User started bot");
    Ok(())
}

/// Handle the /help command.
async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Handle the /plan command: snapshot, ask the model, render or apologize.
async fn handle_plan(bot: Bot, msg: Message, engine: Arc<BotEngine>) -> ResponseResult<()> {
    // The round trip takes a while; show a typing indicator meanwhile.
    bot.send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
        .await?;

    let outcome = engine.build_plan(msg.chat.id.0).await;
    if let Err(e) = &outcome {
        warn!(chat_id = %msg.chat.id, error = %e, "Plan request failed");
    }
    send_outcome(&bot, msg.chat.id, outcome).await
}

/// Dispatch commands to appropriate handlers.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    engine: Arc<BotEngine>,
) -> ResponseResult<()> {
    let owner_id = msg.chat.id.0;
    match cmd {
        Command::Start => handle_start(bot, msg, engine).await,
        Command::Help => handle_help(bot, msg).await,
        Command::NewList => {
            let reply = engine.start_list(owner_id).await;
            send_reply(&bot, msg.chat.id, reply).await
        }
        Command::QuickList => {
            let reply = engine.begin_quick(owner_id).await;
            send_reply(&bot, msg.chat.id, reply).await
        }
        Command::List => {
            let outcome = engine.show_list(owner_id).await;
            send_outcome(&bot, msg.chat.id, outcome).await
        }
        Command::Plan => handle_plan(bot, msg, engine).await,
        Command::Cancel => {
            let outcome = engine.handle_action(owner_id, Action::Cancel).await;
            send_outcome(&bot, msg.chat.id, outcome).await
        }
    }
}

/// Handle regular text messages: the state machine decides what they mean.
pub async fn handle_message(bot: Bot, msg: Message, engine: Arc<BotEngine>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(chat_id = %msg.chat.id, "Text message received");
    let outcome = engine.handle_text(msg.chat.id.0, text).await;
    send_outcome(&bot, msg.chat.id, outcome).await
}

/// Handle inline-button callbacks.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    engine: Arc<BotEngine>,
) -> ResponseResult<()> {
    // Acknowledge first so the button stops spinning.
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        warn!("Callback without a message, ignoring");
        return Ok(());
    };

    let Some(action) = q.data.as_deref().and_then(Action::parse) else {
        error!(chat_id = %chat_id, data = ?q.data, "Unknown callback data");
        return Ok(());
    };

    let outcome = engine.handle_action(chat_id.0, action).await;
    send_outcome(&bot, chat_id, outcome).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_store_error_has_a_distinct_message() {
        let errors = [
            EngineError::Store(StoreError::NoActiveSession),
            EngineError::Store(StoreError::IndexOutOfRange { index: 9, len: 2 }),
            EngineError::Store(StoreError::EmptyText),
            EngineError::Store(StoreError::TextTooLong { limit: 200 }),
            EngineError::Store(StoreError::NoPendingOperation),
        ];
        let messages: Vec<String> = errors.iter().map(describe_error).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_planner_failures_read_as_no_plan() {
        let msg = describe_error(&EngineError::Planner(PlannerError::UnparseableReply(
            "bad".into(),
        )));
        assert!(msg.contains("Could not build a plan"));

        let msg = describe_error(&EngineError::Planner(PlannerError::Completion(
            "timeout".into(),
        )));
        assert!(msg.contains("Could not build a plan"));

        // Unconfigured planning points at the fix instead.
        let msg = describe_error(&EngineError::Planner(PlannerError::Configuration(
            "no key".into(),
        )));
        assert!(msg.contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_text_too_long_names_the_limit() {
        let msg = describe_error(&EngineError::Store(StoreError::TextTooLong { limit: 50 }));
        assert!(msg.contains("50"));
    }
}
