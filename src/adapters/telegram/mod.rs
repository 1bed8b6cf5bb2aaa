//! Telegram transport.
//!
//! - `TelegramAdapter` - long-polling loop feeding the dialogue engine
//! - `Dispatcher` - per-user queues keeping each user's events in order
//! - `Renderer` - output wording, inline keyboards and WhatsApp share links

mod adapter;
mod dispatch;
mod render;

pub use adapter::{classify_text, Inbound, TelegramAdapter};
pub use dispatch::{Dispatcher, ReplySink, Step};
pub use render::{action_label, Button, RenderedMessage, Renderer};
