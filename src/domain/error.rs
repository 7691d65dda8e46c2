//! Error types for jiraflow.
//!
//! This module defines the centralized error type [`JiraflowError`] and a type alias
//! [`Result`] used throughout the crate. Every failure an invocation can hit falls
//! into one of four classes (configuration, not found, network, persistence), and
//! the router renders each of them as a single visible result entry.

use thiserror::Error;

/// The main error type for jiraflow operations.
///
/// # Examples
///
/// ```
/// use jiraflow::JiraflowError;
///
/// let err = JiraflowError::NotFound("no timer for PROJ-1".to_string());
/// assert!(!err.is_fatal());
/// assert_eq!(err.to_string(), "Not found: no timer for PROJ-1");
/// ```
#[derive(Debug, Error)]
pub enum JiraflowError {
    /// The tracker is not configured or rejected the credentials.
    ///
    /// Recoverable by logging in again; never fatal.
    #[error("Not logged in: {0}")]
    Configuration(String),

    /// The tracker rejected the stored credentials (HTTP 401).
    ///
    /// The router forgets the token when it sees this, so the next main menu
    /// offers Login again.
    #[error("Credentials rejected: {0}")]
    Unauthorized(String),

    /// The tracker refused the request although the credentials are valid
    /// (HTTP 403), typically because it wants a CAPTCHA solved in the browser.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// A timer, bookmark or ticket the query refers to does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A remote call failed. Retried by the user on the next invocation,
    /// never automatically.
    #[error("Network error: {0}")]
    Network(String),

    /// The local store could not be read or written.
    #[error("Storage error: {0}")]
    Persistence(String),

    /// A side-effect command string could not be parsed.
    #[error("Unknown command: {0}")]
    InvalidCommand(String),

    /// A routing pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document or a response body could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JiraflowError {
    /// Returns `true` for errors that abort the current invocation.
    ///
    /// Persistence failures (including raw I/O and JSON errors) are fatal for the
    /// invocation but must still be rendered as an error entry by the caller.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Io(_) | Self::Json(_))
    }

    /// A short suggestion shown as the subtitle of the error entry.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Configuration(_) | Self::Unauthorized(_) => {
                Some("Open the main menu and select Login.")
            }
            Self::AccessDenied(_) => Some("Log in to Jira in the browser, then try again."),
            Self::Network(_) => Some("Check your connection and try again."),
            Self::Persistence(_) | Self::Io(_) | Self::Json(_) => {
                Some("The workflow data directory may be unreadable.")
            }
            Self::NotFound(_) | Self::InvalidCommand(_) | Self::InvalidPattern(_) => None,
        }
    }
}

impl From<reqwest::Error> for JiraflowError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// A specialized `Result` type for jiraflow operations.
pub type Result<T> = std::result::Result<T, JiraflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_class_is_fatal() {
        let io = JiraflowError::from(std::io::Error::other("disk gone"));
        assert!(io.is_fatal());
        assert!(JiraflowError::Persistence("x".into()).is_fatal());
        assert!(!JiraflowError::Network("x".into()).is_fatal());
        assert!(!JiraflowError::Configuration("x".into()).is_fatal());
    }

    #[test]
    fn not_found_has_no_hint() {
        assert!(JiraflowError::NotFound("PROJ-1".into()).hint().is_none());
        assert!(JiraflowError::Configuration("no token".into()).hint().is_some());
    }

    #[test]
    fn rejected_and_denied_read_differently() {
        let rejected = JiraflowError::Unauthorized("401".into());
        let denied = JiraflowError::AccessDenied("CAPTCHA_CHALLENGE".into());

        assert!(!rejected.is_fatal());
        assert_ne!(rejected.hint(), denied.hint());
        assert_eq!(denied.to_string(), "Access denied: CAPTCHA_CHALLENGE");
    }
}
