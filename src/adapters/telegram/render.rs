//! Output rendering for Telegram.
//!
//! Turns transport-neutral [`Output`]s into message text plus an inline
//! keyboard. Kept free of frankenstein types so the wording and layout can
//! be tested without a bot.

use url::Url;

use crate::domain::dialogue::{Action, Menu, Output, ReviewOrigin};

/// Telegram rejects longer messages.
const MAX_MESSAGE_CHARS: usize = 4096;

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    /// Sends `data` back as a callback query.
    Callback { label: String, data: String },
    /// Opens `url`.
    Url { label: String, url: String },
}

/// A message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub text: String,
    /// Keyboard rows, top to bottom. Empty means no keyboard.
    pub keyboard: Vec<Vec<Button>>,
}

/// Renders outputs; knows the share-link base for exports.
#[derive(Debug, Clone)]
pub struct Renderer {
    export_base_url: Url,
}

impl Renderer {
    pub fn new(export_base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            export_base_url: Url::parse(export_base_url)?,
        })
    }

    pub fn render(&self, output: &Output) -> RenderedMessage {
        let text = match output {
            Output::NotAuthorized => {
                "You are not authorized. Please contact the administrator.".to_string()
            }
            Output::NoQuestionsConfigured => "Error: no questions are configured for your business type. \
                 Please contact the administrator."
                .to_string(),
            Output::NoTemplateConfigured => "Error: no review prompt is configured for your business type. \
                 Please contact the administrator."
                .to_string(),
            Output::ServiceUnavailable => {
                "The service is temporarily unavailable. Please try again later.".to_string()
            }
            Output::Welcome { question_count, .. } => format!(
                "Welcome! The questionnaire has {} question{}. Choose an action:",
                question_count,
                if *question_count == 1 { "" } else { "s" }
            ),
            Output::Question {
                number,
                total,
                text,
                replacing,
            } => {
                let mut rendered = format!("📝 Question {}/{}:\n{}", number, total, text);
                if *replacing {
                    rendered.push_str("\nEnter a new answer:");
                }
                rendered
            }
            Output::AnswerRecorded { answer } => {
                format!("Answer: \"{}\"\nChoose an action:", answer)
            }
            Output::Review { text, origin } => {
                let heading = match origin {
                    ReviewOrigin::Generated => "🎉 Your review is ready:",
                    ReviewOrigin::Edited => "✏️ Review updated:",
                    ReviewOrigin::Kept => "Editing cancelled. Current review:",
                };
                format!("{}\n\"{}\"", heading, text)
            }
            Output::EditReviewPrompt => {
                "Send the edited review, or press 'Back' to keep the current one:".to_string()
            }
            Output::Export { .. } => {
                "Tap the button below to share your review via WhatsApp:".to_string()
            }
            Output::GenerationFailed => {
                "Review generation failed. Please try again later.".to_string()
            }
            Output::Cancelled => "Questionnaire cancelled.".to_string(),
            Output::Unrecognized => "Unrecognized action.".to_string(),
            Output::Busy => "Still working on your review, please wait...".to_string(),
            Output::NoActiveDialogue => {
                "There is no active questionnaire. Send /start to begin.".to_string()
            }
        };

        let mut keyboard = Vec::new();
        if let Output::Export { review } = output {
            keyboard.push(vec![Button::Url {
                label: "📤 Open WhatsApp".to_string(),
                url: self.share_url(review),
            }]);
        }
        if let Some(menu) = output.menu() {
            keyboard.extend(menu_rows(menu));
        }

        RenderedMessage {
            text: fit_message(text),
            keyboard,
        }
    }

    /// `export_base_url?text=<url-encoded review>`
    pub fn share_url(&self, review: &str) -> String {
        let mut url = self.export_base_url.clone();
        url.query_pairs_mut().append_pair("text", review);
        url.to_string()
    }
}

/// Button label for an action.
pub fn action_label(action: Action) -> &'static str {
    match action {
        Action::Begin => "✅ Start questionnaire",
        Action::Cancel => "❌ Cancel",
        Action::EditCurrent => "🔄 Change answer",
        Action::Advance => "⏭ Next",
        Action::EditReview => "✏️ Edit review",
        Action::Export => "✅ Send to WhatsApp",
        Action::Restart => "🔄 Start over",
        Action::CancelEdit => "Back",
    }
}

fn menu_rows(menu: Menu) -> Vec<Vec<Button>> {
    let button = |action: &Action| Button::Callback {
        label: action_label(*action).to_string(),
        data: action.as_str().to_string(),
    };

    match menu {
        // one choice per row
        Menu::Start => menu.actions().iter().map(|a| vec![button(a)]).collect(),
        _ => vec![menu.actions().iter().map(button).collect()],
    }
}

fn fit_message(text: String) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    cut.push('…');
    cut
}
