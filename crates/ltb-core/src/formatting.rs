//! Confirmation payload formatting and user-facing message copy.
//!
//! Display text uses Telegram Markdown emphasis (`*bold*`). Values pass
//! through verbatim; the transport must tolerate markup collisions in
//! user-supplied content.

use serde::Deserialize;

/// Structured confirmation payload carried inside a type-2 result record's
/// `message` field.
#[derive(Clone, Debug, Deserialize)]
pub struct ConfirmationPayload {
    #[serde(rename = "Name", default = "unknown_name")]
    pub name: String,
    #[serde(rename = "Attributes", default)]
    pub attributes: Vec<ConfirmationAttribute>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ConfirmationAttribute {
    #[serde(rename = "Key", default)]
    pub key: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

fn unknown_name() -> String {
    "???".to_string()
}

impl ConfirmationPayload {
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Render a confirmation payload for display: emphasized name line, then one
/// `*key*: value` line per attribute, in input order.
pub fn format_confirmation(payload: &ConfirmationPayload) -> String {
    let mut lines = vec![format!("*{}*", payload.name)];
    for attr in &payload.attributes {
        lines.push(format!("*{}*: {}", attr.key, attr.value));
    }
    lines.join("\n")
}

pub fn start_message() -> String {
    "👋 Hi! I'm the Telegram chat for your Lify AI app.\n\n\
     To link your account, send me the telegram token from your profile in the app.\n\n\
     💡 Just copy and paste it — then you can start sending messages."
        .to_string()
}

pub fn token_saved_message() -> String {
    "✅ Token saved! You can now send messages.".to_string()
}

pub fn token_prompt_message() -> String {
    "🔑 Send me the telegram token (JWT) you got in the app.\n\n\
     💡 Just paste it here — without the word `Bearer`."
        .to_string()
}

pub fn processing_message() -> String {
    "🕐 Processing your request...".to_string()
}

pub fn error_message(detail: &str) -> String {
    format!("❌ Error: {detail}")
}

pub fn timeout_message() -> String {
    "❌ Gave up waiting for a response from the backend.".to_string()
}

pub fn confirmation_message(formatted: &str) -> String {
    format!("🤖 Confirmation:\n\n{formatted}")
}

pub fn unparsed_confirmation_message(raw: &str) -> String {
    format!("🤖 Confirmation received, but its payload could not be parsed:\n{raw}")
}

pub fn response_message(raw: &str) -> String {
    format!("🤖 Response:\n{raw}")
}
