use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to fetch calendar feed: {0}")]
    Fetch(String),
    #[error("calendar feed is not valid iCalendar: {0}")]
    Feed(String),
    #[error("failed to send message: {0}")]
    Send(String),
}

impl CheckError {
    /// Whether the process should report failure to its scheduler.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CheckError::Send(_))
    }
}
