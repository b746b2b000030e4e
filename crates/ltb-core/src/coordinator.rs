//! Per-message entry point.
//!
//! The coordinator owns the token-bootstrap decision: the first plausible
//! credential a user sends installs their session, and every later message is
//! submitted as a backend job whose poller runs as a detached task.

use std::sync::Arc;

use crate::{
    backend::BackendApi,
    domain::UserId,
    formatting::{error_message, processing_message, token_prompt_message, token_saved_message},
    messaging::MessagingPort,
    poller::JobPoller,
    session::SessionStore,
    Result,
};

/// Structural JWT shape check: exactly three non-empty period-separated
/// segments. This is the bootstrap credential policy; the onboarding copy
/// tells users to paste the token without a `Bearer` prefix.
pub fn looks_like_jwt(text: &str) -> bool {
    let mut segments = text.split('.');
    matches!(
        (segments.next(), segments.next(), segments.next(), segments.next()),
        (Some(a), Some(b), Some(c), None) if !a.is_empty() && !b.is_empty() && !c.is_empty()
    )
}

pub struct Coordinator {
    store: Arc<dyn SessionStore>,
    backend: Arc<dyn BackendApi>,
    messenger: Arc<dyn MessagingPort>,
    poller: Arc<JobPoller>,
    provider_prefix: String,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        backend: Arc<dyn BackendApi>,
        messenger: Arc<dyn MessagingPort>,
        poller: Arc<JobPoller>,
        provider_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            backend,
            messenger,
            poller,
            provider_prefix: provider_prefix.into(),
        }
    }

    /// Handle one inbound `(user, text)` event.
    ///
    /// The synchronous part (bootstrap or submit + acknowledgment) completes
    /// before this returns; the polling engine for a submitted job keeps
    /// running detached.
    pub async fn handle_message(&self, user_id: UserId, raw_text: &str) -> Result<()> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let Some(credential) = self.store.get(user_id).await else {
            return self.bootstrap(user_id, text).await;
        };

        let correlation = format!("{}:{}", self.provider_prefix, user_id.0);
        let job = match self
            .backend
            .submit(&credential, text, Some(correlation.as_str()))
            .await
        {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!(user = user_id.0, "submission failed: {e}");
                self.messenger
                    .send_text(user_id, &error_message(&e.to_string()))
                    .await?;
                return Ok(());
            }
        };

        tracing::info!(user = user_id.0, %job, "job submitted");
        self.messenger
            .send_text(user_id, &processing_message())
            .await?;

        let poller = self.poller.clone();
        tokio::spawn(async move {
            poller.run(user_id, credential, job).await;
        });

        Ok(())
    }

    /// First message from a user with no session: treat it as a credential.
    /// No job is submitted on this turn regardless of outcome, and a stored
    /// credential is never overwritten.
    async fn bootstrap(&self, user_id: UserId, text: &str) -> Result<()> {
        if looks_like_jwt(text) {
            self.store.set(user_id, text.to_string()).await;
            tracing::info!(user = user_id.0, "session installed");
            self.messenger
                .send_text(user_id, &token_saved_message())
                .await?;
        } else {
            self.messenger
                .send_markdown(user_id, &token_prompt_message())
                .await?;
        }
        Ok(())
    }
}
