/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Backend job id returned by submission (opaque string).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

/// Integer-coded job status as reported by `GET /Chat/{id}`.
///
/// Code `1` is the single non-terminal "processing" value; every other code
/// ends the poll loop. The loop does not distinguish success from other
/// terminal codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JobStatus(pub i32);

impl JobStatus {
    pub const PROCESSING: i32 = 1;

    pub fn is_processing(self) -> bool {
        self.0 == Self::PROCESSING
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_code_one_is_processing() {
        assert!(JobStatus(1).is_processing());
        assert!(!JobStatus(0).is_processing());
        assert!(!JobStatus(2).is_processing());
        assert!(!JobStatus(-1).is_processing());
    }
}
