//! Error types for roster operations.
//!
//! One unified error type with explicit variants for transport,
//! authentication, API status, input validation and export failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for roster operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, missing session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success HTTP status returned by the API.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (invalid URL, id, payload shape).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Export encoding failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// The operation was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns the API error if this is a non-success HTTP status.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server rejected the access token.
    #[error("session expired")]
    SessionExpired,

    /// Login response did not carry the expected tokens.
    #[error("malformed login response: {reason}")]
    MalformedLogin { reason: String },
}

/// Broad classification of an API status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400: the payload failed server-side validation.
    Validation,
    /// 401 or 403.
    Unauthorized,
    /// 404.
    NotFound,
    /// 409: a unique field already holds this value.
    Conflict,
    /// 5xx.
    Server,
    /// Any other non-success status.
    Other,
}

/// A non-success HTTP response from the API.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Message from the response body, if one was present.
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Classify the status code.
    pub fn kind(&self) -> ApiErrorKind {
        match self.status {
            400 => ApiErrorKind::Validation,
            401 | 403 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Other,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid record identifier.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Unknown resource name.
    #[error("unknown resource '{value}'")]
    Resource { value: String },

    /// Payload is not a JSON object.
    #[error("invalid record: {reason}")]
    Record { reason: String },

    /// Invalid validation rule in a form schema.
    #[error("invalid rule for field '{field}': {reason}")]
    Rule { field: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Export encoding errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("docx: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
