//! Telegram update handlers.
//!
//! Handlers check the allow-list, call into [`actions`](crate::actions) and
//! send or edit the resulting screen.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InlineQuery, Me, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::{debug, warn};

use crate::actions::{self, SearchReply};
use crate::callbacks::Callback;
use crate::commands::Command;
use crate::inline;
use crate::render::{self, Screen};
use crate::state::BotState;

type HandlerResult = ResponseResult<()>;

/// Routing for every update kind the bot handles.
pub fn schema() -> UpdateHandler<RequestError> {
    let messages = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(on_command),
        )
        .branch(dptree::endpoint(on_text));

    dptree::entry()
        .branch(messages)
        .branch(Update::filter_callback_query().endpoint(on_callback))
        .branch(Update::filter_inline_query().endpoint(on_inline_query))
}

async fn send(bot: &Bot, chat: ChatId, screen: Screen) -> HandlerResult {
    bot.send_message(chat, screen.text)
        .parse_mode(ParseMode::Html)
        .reply_markup(screen.keyboard)
        .await?;
    Ok(())
}

async fn edit(bot: &Bot, chat: ChatId, id: MessageId, screen: Screen) -> HandlerResult {
    match bot
        .edit_message_text(chat, id, screen.text)
        .parse_mode(ParseMode::Html)
        .reply_markup(screen.keyboard)
        .await
    {
        Ok(_) => Ok(()),
        // Pressing the same button twice renders the same screen.
        Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => Err(e),
    }
}

async fn refuse(bot: &Bot, msg: &Message) -> HandlerResult {
    warn!(
        chat_id = msg.chat.id.0,
        user_id = msg.from.as_ref().map(|u| u.id.0),
        "Message from user not on allow-list"
    );
    bot.send_message(msg.chat.id, render::not_allowed()).await?;
    Ok(())
}

fn sender(msg: &Message) -> Option<u64> {
    msg.from.as_ref().map(|u| u.id.0)
}

async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    me: Me,
    state: Arc<BotState>,
) -> HandlerResult {
    if !state.is_allowed(sender(&msg)) {
        return refuse(&bot, &msg).await;
    }

    debug!(chat_id = msg.chat.id.0, command = ?cmd, "Command");
    let chat = msg.chat.id;

    if let Some(query) = cmd.query() {
        if query.is_empty() {
            bot.send_message(chat, "🔍 Usage: /search <name>").await?;
            return Ok(());
        }
        return start_search(bot, chat, query.to_string(), state).await;
    }

    let screen = match cmd {
        Command::Start => {
            state.sessions.clear(chat.0).await;
            render::main_menu(me.user.username.as_deref())
        }
        Command::Help => render::help(),
        Command::Downloads => actions::downloads(&state).await,
        Command::Status => actions::status(&state).await,
        Command::Search(_) | Command::Imdb(_) => return Ok(()),
    };
    send(&bot, chat, screen).await
}

async fn on_text(bot: Bot, msg: Message, state: Arc<BotState>) -> HandlerResult {
    let Some(text) = msg.text().map(str::trim) else {
        return Ok(());
    };
    if !state.is_allowed(sender(&msg)) {
        return refuse(&bot, &msg).await;
    }
    if text.is_empty() {
        return Ok(());
    }
    if text.starts_with('/') {
        return send(&bot, msg.chat.id, render::help()).await;
    }

    start_search(bot, msg.chat.id, text.to_string(), state).await
}

/// Post a placeholder and run the search in the background, so the chat
/// keeps answering buttons while indexers are queried.
async fn start_search(bot: Bot, chat: ChatId, query: String, state: Arc<BotState>) -> HandlerResult {
    let placeholder = bot
        .send_message(chat, render::searching(&query))
        .parse_mode(ParseMode::Html)
        .await?;

    tokio::spawn(async move {
        let sent = match actions::search(&state, chat.0, &query).await {
            SearchReply::Ready(screen) => edit(&bot, chat, placeholder.id, screen).await,
            SearchReply::Superseded => bot
                .delete_message(chat, placeholder.id)
                .await
                .map(|_| ()),
        };
        if let Err(e) = sent {
            warn!(chat_id = chat.0, error = %e, "Failed to deliver search results");
        }
    });

    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> HandlerResult {
    let allowed = state.is_allowed(Some(q.from.id.0));
    let callback = q.data.as_deref().and_then(Callback::parse);

    let mut answer = bot.answer_callback_query(q.id.clone());
    if !allowed {
        warn!(user_id = q.from.id.0, "Button press from user not on allow-list");
        answer = answer.text(render::not_allowed());
    } else if callback.is_none() {
        debug!(payload = ?q.data, "Unknown callback payload");
        answer = answer.text("Unknown action");
    }
    answer.await?;

    let (Some(callback), true) = (callback, allowed) else {
        return Ok(());
    };
    let Some((chat, message_id)) = q.message.as_ref().map(|m| (m.chat().id, m.id())) else {
        return Ok(());
    };

    let screen = match callback {
        Callback::Noop => return Ok(()),
        Callback::Menu => {
            state.sessions.clear(chat.0).await;
            render::main_menu(None)
        }
        Callback::Downloads => actions::downloads(&state).await,
        Callback::Status => actions::status(&state).await,
        Callback::Transfer(hash) => actions::transfer_detail(&state, &hash).await,
        Callback::Delete(hash) => actions::delete(&state, &hash).await,
        Callback::Navigate(transition) => actions::navigate(&state, chat.0, transition).await,
    };

    edit(&bot, chat, message_id, screen).await
}

async fn on_inline_query(bot: Bot, q: InlineQuery, state: Arc<BotState>) -> HandlerResult {
    let suggestions = match (&state.imdb, state.is_allowed(Some(q.from.id.0))) {
        (Some(imdb), true) => imdb.suggest(&q.query).await.unwrap_or_else(|e| {
            warn!(query = %q.query, error = %e, "Title suggestions failed");
            Vec::new()
        }),
        _ => Vec::new(),
    };

    debug!(
        user_id = q.from.id.0,
        query = %q.query,
        suggestions = suggestions.len(),
        "Inline query"
    );

    bot.answer_inline_query(q.id.clone(), inline::articles(&suggestions))
        .cache_time(inline::CACHE_SECS)
        .is_personal(true)
        .await?;
    Ok(())
}
