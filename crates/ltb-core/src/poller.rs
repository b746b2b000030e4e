//! Per-job polling engine.
//!
//! One `run` call drives one submitted job through
//! `Polling -> Fetching -> Delivered`, with error exits to `Failed` from any
//! state. The engine owns its credential snapshot by value, never touches the
//! session store, and retains nothing once a terminal state is reached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    backend::BackendApi,
    domain::{JobId, UserId},
    errors::Error,
    formatting::{
        confirmation_message, error_message, format_confirmation, response_message,
        timeout_message, unparsed_confirmation_message, ConfirmationPayload,
    },
    messaging::MessagingPort,
};

/// Suspension point between status checks. Injected so tests run on virtual
/// time instead of real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    /// Delay between two status checks for the same job.
    pub interval: Duration,

    /// Optional ceiling on status checks per job. `None` preserves the
    /// upstream behavior: the loop is unbounded and relies on the backend
    /// eventually leaving the processing state.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: None,
        }
    }
}

pub struct JobPoller {
    backend: Arc<dyn BackendApi>,
    messenger: Arc<dyn MessagingPort>,
    sleeper: Arc<dyn Sleeper>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        messenger: Arc<dyn MessagingPort>,
        sleeper: Arc<dyn Sleeper>,
        config: PollConfig,
    ) -> Self {
        Self {
            backend,
            messenger,
            sleeper,
            config,
        }
    }

    /// Drive one job to completion and deliver the outcome to its owner.
    ///
    /// Every exit path ends in a user-visible message; failures terminate
    /// this job only and are never retried.
    pub async fn run(&self, user_id: UserId, credential: String, job: JobId) {
        let mut checks = 0u32;
        loop {
            match self.backend.status(&credential, &job).await {
                Ok(status) if status.is_processing() => {}
                Ok(status) => {
                    tracing::debug!(job = %job, code = status.0, "job left processing state");
                    break;
                }
                Err(e) => {
                    tracing::warn!(job = %job, "status check failed: {e}");
                    self.deliver(user_id, &error_message(&e.to_string())).await;
                    return;
                }
            }

            checks += 1;
            if let Some(max) = self.config.max_attempts {
                if checks >= max {
                    tracing::warn!(job = %job, checks, "poll ceiling reached, giving up");
                    self.deliver(user_id, &timeout_message()).await;
                    return;
                }
            }
            self.sleeper.sleep(self.config.interval).await;
        }

        let record = match self.backend.latest(&credential, 1, 0).await {
            Ok(records) => match records.into_iter().next() {
                Some(record) => record,
                None => {
                    self.deliver(user_id, &error_message(&Error::EmptyResult.to_string()))
                        .await;
                    return;
                }
            },
            Err(e) => {
                tracing::warn!(job = %job, "result fetch failed: {e}");
                self.deliver(user_id, &error_message(&e.to_string())).await;
                return;
            }
        };

        if record.is_confirmation() {
            match ConfirmationPayload::parse(&record.message) {
                Ok(payload) => {
                    let text = confirmation_message(&format_confirmation(&payload));
                    self.deliver_markdown(user_id, &text).await;
                }
                // Malformed payload is not fatal: degrade to raw text.
                Err(e) => {
                    tracing::debug!(job = %job, "confirmation payload did not parse: {e}");
                    self.deliver(user_id, &unparsed_confirmation_message(&record.message))
                        .await;
                }
            }
        } else {
            self.deliver(user_id, &response_message(&record.message))
                .await;
        }
    }

    async fn deliver(&self, user_id: UserId, text: &str) {
        if let Err(e) = self.messenger.send_text(user_id, text).await {
            tracing::warn!(user = user_id.0, "delivery failed: {e}");
        }
    }

    async fn deliver_markdown(&self, user_id: UserId, text: &str) {
        if let Err(e) = self.messenger.send_markdown(user_id, text).await {
            tracing::warn!(user = user_id.0, "delivery failed: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::backend::ResultRecord;
    use crate::domain::JobStatus;
    use crate::messaging::MessagingCapabilities;
    use crate::Result;

    /// Scripted backend: statuses are consumed front-to-back, then the
    /// `latest` answer is handed out.
    #[derive(Default)]
    pub struct FakeBackend {
        pub statuses: Mutex<VecDeque<Result<JobStatus>>>,
        pub latest_answer: Mutex<Option<Result<Vec<ResultRecord>>>>,
        pub submit_answer: Mutex<Option<Result<JobId>>>,
        pub status_calls: Mutex<u32>,
        pub latest_calls: Mutex<u32>,
        pub submits: Mutex<Vec<(String, String, Option<String>)>>,
    }

    impl FakeBackend {
        pub fn with_statuses(codes: &[i32]) -> Self {
            let fake = Self::default();
            *fake.statuses.lock().unwrap() =
                codes.iter().map(|&c| Ok(JobStatus(c))).collect();
            fake
        }

        pub fn answer_latest(self, answer: Result<Vec<ResultRecord>>) -> Self {
            *self.latest_answer.lock().unwrap() = Some(answer);
            self
        }

        pub fn record(kind: i32, message: &str) -> ResultRecord {
            serde_json::from_value(serde_json::json!({"type": kind, "message": message}))
                .unwrap()
        }
    }

    #[async_trait]
    impl BackendApi for FakeBackend {
        async fn submit(
            &self,
            credential: &str,
            text: &str,
            correlation: Option<&str>,
        ) -> Result<JobId> {
            self.submits.lock().unwrap().push((
                credential.to_string(),
                text.to_string(),
                correlation.map(|s| s.to_string()),
            ));
            self.submit_answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(JobId("job-1".to_string())))
        }

        async fn status(&self, _credential: &str, _job: &JobId) -> Result<JobStatus> {
            *self.status_calls.lock().unwrap() += 1;
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(JobStatus(0)))
        }

        async fn latest(
            &self,
            _credential: &str,
            count: u32,
            offset: u32,
        ) -> Result<Vec<ResultRecord>> {
            assert_eq!((count, offset), (1, 0), "engine only asks for the newest record");
            *self.latest_calls.lock().unwrap() += 1;
            self.latest_answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(Vec::new()))
        }
    }

    /// Records every outbound send as `(user, text, markdown)`.
    #[derive(Default)]
    pub struct FakeMessenger {
        pub sent: Mutex<Vec<(UserId, String, bool)>>,
    }

    impl FakeMessenger {
        pub fn texts(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|s| s.1.clone()).collect()
        }

        pub fn last(&self) -> Option<(UserId, String, bool)> {
            self.sent.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_markdown: true,
                max_message_len: 4096,
            }
        }

        async fn send_text(&self, user_id: UserId, text: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((user_id, text.to_string(), false));
            Ok(())
        }

        async fn send_markdown(&self, user_id: UserId, text: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((user_id, text.to_string(), true));
            Ok(())
        }
    }

    /// Records sleeps without waiting.
    #[derive(Default)]
    pub struct FakeSleeper {
        pub slept: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for FakeSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }
}
