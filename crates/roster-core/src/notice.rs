//! User-facing notifications.
//!
//! Every mutation ends in a [`Notice`]: a success toast, or an error toast
//! whose wording depends on what went wrong. Nothing is retried.

use std::fmt;
use std::sync::Mutex;

use crate::Error;
use crate::error::{ApiErrorKind, AuthError};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A dismissible user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Describe a failed operation on `subject` (e.g. "employee").
    ///
    /// 400, 404, 409 and 5xx responses each get their own wording; the
    /// server's message is appended when it sent one.
    pub fn from_error(subject: &str, err: &Error) -> Self {
        let base = match err {
            Error::Api(api) => match api.kind() {
                ApiErrorKind::Validation => format!("Invalid {subject} data"),
                ApiErrorKind::NotFound => format!("The {subject} was not found"),
                ApiErrorKind::Conflict => {
                    format!("A {subject} with the same unique value already exists")
                }
                ApiErrorKind::Unauthorized => "Your session has expired, please log in again".to_string(),
                ApiErrorKind::Server => "Server error, please try again later".to_string(),
                ApiErrorKind::Other => format!("Request failed with status {}", api.status),
            },
            Error::Transport(_) => "Could not reach the server".to_string(),
            Error::Auth(AuthError::SessionExpired) => {
                "Your session has expired, please log in again".to_string()
            }
            Error::Auth(_) => "Authentication failed".to_string(),
            Error::InvalidInput(e) => e.to_string(),
            Error::Export(e) => format!("Export failed: {e}"),
            Error::Cancelled => "Request cancelled".to_string(),
        };

        let message = match err.as_api().and_then(|api| api.message.as_deref()) {
            Some(detail) if !detail.is_empty() => format!("{base}: {detail}"),
            _ => base,
        };

        Self::error(message)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives notices for display.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// A notifier that keeps every notice, for inspection after the fact.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, TransportError};

    fn api(status: u16) -> Error {
        Error::Api(ApiError::new(status, None))
    }

    #[test]
    fn distinct_messages_per_status() {
        let messages: Vec<String> = [400, 404, 409, 500]
            .into_iter()
            .map(|s| Notice::from_error("employee", &api(s)).message)
            .collect();

        assert_eq!(messages[0], "Invalid employee data");
        assert_eq!(messages[1], "The employee was not found");
        assert!(messages[2].contains("already exists"));
        assert!(messages[3].starts_with("Server error"));
    }

    #[test]
    fn appends_server_detail() {
        let err = Error::Api(ApiError::new(409, Some("email taken".into())));
        let notice = Notice::from_error("employee", &err);
        assert!(notice.is_error());
        assert!(notice.message.ends_with(": email taken"));
    }

    #[test]
    fn transport_errors_are_reported() {
        let err = Error::Transport(TransportError::Timeout);
        assert_eq!(
            Notice::from_error("vehicle", &err).message,
            "Could not reach the server"
        );
    }

    #[test]
    fn log_collects_notices() {
        let log = NoticeLog::new();
        log.notify(Notice::success("saved"));
        log.notify(Notice::error("failed"));
        assert_eq!(log.notices().len(), 2);
    }
}
