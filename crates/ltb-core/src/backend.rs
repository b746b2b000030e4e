//! Lify backend client.
//!
//! Three job-style operations over HTTP (`/Chat`), each a single round trip
//! carrying the session's bearer credential. No retries at this layer; every
//! failure is surfaced verbatim to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{JobId, JobStatus},
    errors::Error,
    Result,
};

/// One entry of the latest-results query (`GET /Chat/Count/{count}/{offset}`).
///
/// `kind == 2` marks a structured confirmation payload: `message` is then
/// itself serialized JSON. Any other kind is plain display text.
#[derive(Clone, Debug, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "type")]
    pub kind: i32,
    #[serde(default)]
    pub message: String,
}

impl ResultRecord {
    pub const CONFIRMATION: i32 = 2;

    pub fn is_confirmation(&self) -> bool {
        self.kind == Self::CONFIRMATION
    }
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    #[serde(rename = "Message")]
    message: &'a str,
    #[serde(rename = "Attributes", skip_serializing_if = "Option::is_none")]
    attributes: Option<SubmitAttributes>,
}

#[derive(Serialize)]
struct SubmitAttributes {
    #[serde(rename = "userIds")]
    user_ids: Vec<String>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(rename = "type")]
    kind: i32,
}

/// Port for driving the backend job API. `HttpBackend` is the production
/// implementation; tests substitute scripted fakes.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Submit one message as a backend job, optionally tagged with a
    /// correlation id (`"tg:<user_id>"`).
    async fn submit(
        &self,
        credential: &str,
        text: &str,
        correlation: Option<&str>,
    ) -> Result<JobId>;

    async fn status(&self, credential: &str, job: &JobId) -> Result<JobStatus>;

    /// Ordered latest-results window, most recent first. May be empty.
    async fn latest(&self, credential: &str, count: u32, offset: u32)
        -> Result<Vec<ResultRecord>>;
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn submit(
        &self,
        credential: &str,
        text: &str,
        correlation: Option<&str>,
    ) -> Result<JobId> {
        let body = SubmitBody {
            message: text,
            attributes: correlation.map(|c| SubmitAttributes {
                user_ids: vec![c.to_string()],
            }),
        };

        let resp = self
            .http
            .post(format!("{}/Chat", self.base_url))
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;
        let resp = Self::check(resp).await?;

        let parsed: SubmitResponse = resp.json().await?;
        Ok(JobId(parsed.id))
    }

    async fn status(&self, credential: &str, job: &JobId) -> Result<JobStatus> {
        let resp = self
            .http
            .get(format!("{}/Chat/{}", self.base_url, job.0))
            .bearer_auth(credential)
            .send()
            .await?;
        let resp = Self::check(resp).await?;

        let parsed: StatusResponse = resp.json().await?;
        Ok(JobStatus(parsed.kind))
    }

    async fn latest(
        &self,
        credential: &str,
        count: u32,
        offset: u32,
    ) -> Result<Vec<ResultRecord>> {
        let resp = self
            .http
            .get(format!("{}/Chat/Count/{count}/{offset}", self.base_url))
            .bearer_auth(credential)
            .send()
            .await?;
        let resp = Self::check(resp).await?;

        let records: Vec<ResultRecord> = resp.json().await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_body_matches_backend_contract() {
        let body = SubmitBody {
            message: "hello",
            attributes: Some(SubmitAttributes {
                user_ids: vec!["tg:42".to_string()],
            }),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"Message":"hello","Attributes":{"userIds":["tg:42"]}}"#
        );
    }

    #[test]
    fn submit_body_omits_attributes_without_correlation() {
        let body = SubmitBody {
            message: "hello",
            attributes: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"Message":"hello"}"#);
    }

    #[test]
    fn responses_deserialize_from_backend_shapes() {
        let sub: SubmitResponse = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(sub.id, "abc");

        let st: StatusResponse = serde_json::from_str(r#"{"type":1}"#).unwrap();
        assert_eq!(st.kind, 1);

        let recs: Vec<ResultRecord> =
            serde_json::from_str(r#"[{"type":2,"message":"{}"},{"type":0,"message":"hi"}]"#)
                .unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs[0].is_confirmation());
        assert!(!recs[1].is_confirmation());
        assert_eq!(recs[1].message, "hi");
    }

    #[test]
    fn result_record_tolerates_missing_message() {
        let rec: ResultRecord = serde_json::from_str(r#"{"type":0}"#).unwrap();
        assert_eq!(rec.message, "");
    }
}
