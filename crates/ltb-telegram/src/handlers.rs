//! Telegram update handlers.
//!
//! Only text updates matter to this bot: `/start` replies with the onboarding
//! text, everything else goes to the session coordinator. Non-text content is
//! out of scope and silently ignored.

use std::sync::Arc;

use teloxide::prelude::*;

use ltb_core::{domain::UserId, formatting::start_message};

use crate::router::AppState;

fn parse_command(text: &str) -> Option<(String, String)> {
    if !text.trim_start().starts_with('/') {
        return None;
    }

    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    Some((cmd, rest))
}

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let user_id = UserId(user.id.0 as i64);

    if let Some((cmd, _args)) = parse_command(text) {
        if cmd == "start" {
            let _ = bot.send_message(msg.chat.id, start_message()).await;
        }
        return Ok(());
    }

    if let Err(e) = state.coordinator.handle_message(user_id, text).await {
        tracing::error!(user = user_id.0, "message handling failed: {e}");
    }

    Ok(())
}
