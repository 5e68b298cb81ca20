//! Error types for the PetClinic workload.
//!
//! Every setup step and task returns a [`TaskError`] instead of panicking. The
//! session layer decides what to do with it: log it, count it, and carry on.

use std::fmt;

/// Failure talking to the target over HTTP.
///
/// Produced by [`ApiClient`](crate::client::ApiClient) implementations and by
/// [`ApiResponse::error_for_status`](crate::client::ApiResponse::error_for_status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (connect, TLS, timeout, body read)
    Transport(String),
    /// The target answered with a non-2xx status
    Status {
        /// HTTP status code returned by the target
        status: u16,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(reason) => write!(f, "transport error: {}", reason),
            ClientError::Status { status } => write!(f, "unexpected HTTP status {}", status),
        }
    }
}

impl std::error::Error for ClientError {}

/// Failure producing fake data for a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// A generated phone number had fewer than ten digits after normalization
    ShortTelephone {
        /// The raw phone number as generated
        raw: String,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::ShortTelephone { raw } => {
                write!(f, "phone number '{}' has fewer than 10 digits", raw)
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Outcome of a setup step or task that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The action was not attempted and no request was sent
    Skipped(&'static str),
    /// Network-level failure, see [`ClientError::Transport`]
    Transport(String),
    /// Non-2xx response
    Status(u16),
    /// The response body was not the JSON shape we can read
    Decode(String),
    /// A create call succeeded but the body carried no usable `id`
    MissingId {
        /// Which entity was being created ("owner" or "pet")
        entity: &'static str,
    },
    /// The response decoded but failed a shape or status assertion
    Assertion(String),
    /// The request body could not be generated
    Data(DataError),
}

impl TaskError {
    /// `true` when the target answered 2xx but the answer was wrong.
    ///
    /// These are the failures the host runner cannot see on its own, so the
    /// runner binding flags them on the request metric.
    pub fn is_response_shape(&self) -> bool {
        matches!(
            self,
            TaskError::Decode(_) | TaskError::MissingId { .. } | TaskError::Assertion(_)
        )
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Skipped(reason) => write!(f, "skipped: {}", reason),
            TaskError::Transport(reason) => write!(f, "transport error: {}", reason),
            TaskError::Status(status) => write!(f, "unexpected HTTP status {}", status),
            TaskError::Decode(reason) => write!(f, "could not decode response: {}", reason),
            TaskError::MissingId { entity } => {
                write!(f, "{} id missing in response", entity)
            }
            TaskError::Assertion(reason) => write!(f, "assertion failed: {}", reason),
            TaskError::Data(err) => write!(f, "could not build request body: {}", err),
        }
    }
}

impl std::error::Error for TaskError {}

impl From<ClientError> for TaskError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(reason) => TaskError::Transport(reason),
            ClientError::Status { status } => TaskError::Status(status),
        }
    }
}

impl From<DataError> for TaskError {
    fn from(err: DataError) -> Self {
        TaskError::Data(err)
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        TaskError::Decode(err.to_string())
    }
}
