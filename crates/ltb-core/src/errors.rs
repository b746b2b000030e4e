/// Core error type for the bridge.
///
/// Adapter crates should map their specific errors into this type so the bot
/// core can handle failures consistently (user-facing message vs recoverable).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// The backend answered with a non-2xx status. The body is carried
    /// verbatim because it is relayed to the user as-is.
    #[error("backend rejected request: {status} {body}")]
    Backend { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The latest-results query came back empty after a job left the
    /// processing state.
    #[error("backend returned no results")]
    EmptyResult,

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
