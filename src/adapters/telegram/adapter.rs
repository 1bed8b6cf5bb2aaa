//! Telegram long-polling transport.
//!
//! Polls for messages and callback queries, turns them into dialogue
//! events and hands them to the [`Dispatcher`] in the order received.
//! Callback queries are acknowledged in their own task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use frankenstein::client_reqwest::Bot;
use frankenstein::methods::{AnswerCallbackQueryParams, GetUpdatesParams, SendMessageParams};
use frankenstein::types::{
    AllowedUpdate, CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup,
    MaybeInaccessibleMessage, Message as TgMessage, ReplyMarkup,
};
use frankenstein::updates::UpdateContent;
use frankenstein::AsyncTelegramApi;
use secrecy::{ExposeSecret, Secret};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dispatch::{Dispatcher, ReplySink, Step};
use super::render::{Button, RenderedMessage, Renderer};
use crate::application::DialogueEngine;
use crate::domain::dialogue::{Action, Event, Output};
use crate::domain::foundation::UserId;

/// What an inbound text message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Event(Event),
    /// A slash command the bot does not know.
    UnknownCommand(String),
    /// Blank text; nothing to do.
    Ignore,
}

/// Classifies message text. `/start` enters, `/cancel` aborts.
pub fn classify_text(text: &str) -> Inbound {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Inbound::Ignore;
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return Inbound::Event(Event::Text(text.to_string()));
    };

    // "/start@my_bot extra" -> "start"
    let name = command
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .split('@')
        .next()
        .unwrap_or_default();

    match name {
        "start" => Inbound::Event(Event::Entry),
        "cancel" => Inbound::Event(Event::Abort),
        other => Inbound::UnknownCommand(other.to_string()),
    }
}

/// Telegram adapter bound to one bot token.
pub struct TelegramAdapter {
    bot: Bot,
    dispatcher: Dispatcher<TelegramReplies>,
    polling_timeout_secs: u32,
}

impl TelegramAdapter {
    pub fn new(
        bot_token: &Secret<String>,
        engine: Arc<DialogueEngine>,
        renderer: Renderer,
        polling_timeout_secs: u32,
    ) -> Self {
        let bot = Bot::new(bot_token.expose_secret());
        let replies = TelegramReplies {
            bot: bot.clone(),
            renderer,
        };
        Self {
            bot,
            dispatcher: Dispatcher::new(engine, replies),
            polling_timeout_secs,
        }
    }

    /// Run the long-polling loop until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        info!(polling_timeout_secs = self.polling_timeout_secs, "Telegram adapter started");
        let mut offset: Option<i64> = None;

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let params = GetUpdatesParams::builder()
                .maybe_offset(offset)
                .timeout(self.polling_timeout_secs)
                .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery])
                .build();

            let updates = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.bot.get_updates(&params) => {
                    match result {
                        Ok(response) => response.result,
                        Err(e) => {
                            let backoff = extract_retry_after(&e).unwrap_or(5);
                            warn!(error = %e, backoff_secs = backoff, "Telegram get_updates failed; retrying");
                            tokio::time::sleep(Duration::from_secs(backoff)).await;
                            continue;
                        }
                    }
                }
            };

            for update in updates {
                offset = Some(i64::from(update.update_id) + 1);

                match update.content {
                    UpdateContent::Message(message) => self.route_message(&message),
                    UpdateContent::CallbackQuery(query) => self.route_callback(&query),
                    _ => {}
                }
            }
        }

        info!("Telegram adapter stopped");
    }

    fn route_message(&self, message: &TgMessage) {
        let Some(ref from) = message.from else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };

        let user_id = UserId::from(from.id);
        let step = match classify_text(text) {
            Inbound::Event(event) => Step::Event(event),
            Inbound::UnknownCommand(command) => {
                debug!(user_id = %user_id, command = %command, "Unknown command");
                Step::Notice(Output::Unrecognized)
            }
            Inbound::Ignore => return,
        };

        self.dispatcher.dispatch(user_id, message.chat.id, step);
    }

    fn route_callback(&self, query: &CallbackQuery) {
        self.acknowledge(query.id.clone());

        let user_id = UserId::from(query.from.id);
        let message_chat = query.message.as_ref().map(|message| match message {
            MaybeInaccessibleMessage::Message(message) => message.chat.id,
            MaybeInaccessibleMessage::InaccessibleMessage(message) => message.chat.id,
        });
        let Some(chat_id) = reply_chat_id(message_chat, query.from.id) else {
            warn!(user_id = %user_id, "No chat to answer callback in");
            return;
        };

        let step = match query.data.as_deref().map(str::parse::<Action>) {
            Some(Ok(action)) => Step::Event(Event::Action(action)),
            Some(Err(err)) => {
                debug!(user_id = %user_id, error = %err, "Unknown callback data");
                Step::Notice(Output::Unrecognized)
            }
            None => return,
        };

        self.dispatcher.dispatch(user_id, chat_id, step);
    }

    fn acknowledge(&self, callback_query_id: String) {
        let bot = self.bot.clone();
        tokio::spawn(async move {
            let ack = AnswerCallbackQueryParams::builder()
                .callback_query_id(callback_query_id)
                .build();
            if let Err(e) = bot.answer_callback_query(&ack).await {
                debug!(error = %e, "Failed to answer callback query");
            }
        });
    }
}

/// Sends rendered outputs through the Bot API.
struct TelegramReplies {
    bot: Bot,
    renderer: Renderer,
}

#[async_trait]
impl ReplySink for TelegramReplies {
    async fn deliver(&self, chat_id: i64, outputs: Vec<Output>) {
        for output in &outputs {
            let rendered = self.renderer.render(output);
            self.send(chat_id, rendered).await;
        }
    }
}

impl TelegramReplies {
    async fn send(&self, chat_id: i64, message: RenderedMessage) {
        let params = match keyboard_markup(&message.keyboard) {
            Some(markup) => SendMessageParams::builder()
                .chat_id(ChatId::Integer(chat_id))
                .text(message.text)
                .reply_markup(ReplyMarkup::InlineKeyboardMarkup(markup))
                .build(),
            None => SendMessageParams::builder()
                .chat_id(ChatId::Integer(chat_id))
                .text(message.text)
                .build(),
        };

        if let Err(e) = self.bot.send_message(&params).await {
            warn!(error = %e, chat_id, "Failed to send telegram message");
        }
    }
}

/// Chat a callback is answered in: the chat holding the pressed button,
/// else the user's private chat.
fn reply_chat_id(message_chat: Option<i64>, from_id: u64) -> Option<i64> {
    message_chat.or_else(|| i64::try_from(from_id).ok())
}

fn keyboard_markup(rows: &[Vec<Button>]) -> Option<InlineKeyboardMarkup> {
    if rows.is_empty() {
        return None;
    }

    let inline_keyboard = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| match button {
                    Button::Callback { label, data } => InlineKeyboardButton::builder()
                        .text(label.clone())
                        .callback_data(data.clone())
                        .build(),
                    Button::Url { label, url } => InlineKeyboardButton::builder()
                        .text(label.clone())
                        .url(url.clone())
                        .build(),
                })
                .collect()
        })
        .collect();

    Some(
        InlineKeyboardMarkup::builder()
            .inline_keyboard(inline_keyboard)
            .build(),
    )
}

/// Extract `retry_after` seconds from a frankenstein error (429 rate limiting).
fn extract_retry_after(error: &frankenstein::Error) -> Option<u64> {
    let msg = error.to_string();
    if !(msg.contains("retry after") || msg.contains("Retry-After")) {
        return None;
    }
    msg.split_whitespace()
        .find_map(|word| word.parse::<u64>().ok())
        .or(Some(5))
}
