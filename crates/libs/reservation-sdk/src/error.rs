use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

use crate::operation::Operation;

pub mod code {
    pub const CONFIG_DUPLICATE_CREDENTIAL_ARGS: &str = "SDK_CONFIG_DUPLICATE_CREDENTIAL_ARGS";
    pub const CONFIG_INVALID: &str = "SDK_CONFIG_INVALID";
    pub const CREDENTIAL_FILE_UNREADABLE: &str = "SDK_CREDENTIAL_FILE_UNREADABLE";
    pub const CREDENTIAL_FILE_INVALID: &str = "SDK_CREDENTIAL_FILE_INVALID";
    pub const CREDENTIAL_TYPE_UNSUPPORTED: &str = "SDK_CREDENTIAL_TYPE_UNSUPPORTED";
    pub const CREDENTIAL_DEFAULT_NOT_FOUND: &str = "SDK_CREDENTIAL_DEFAULT_NOT_FOUND";
    pub const OPERATION_NOT_IMPLEMENTED: &str = "SDK_OPERATION_NOT_IMPLEMENTED";
    pub const REMOTE_DEADLINE_EXCEEDED: &str = "SDK_REMOTE_DEADLINE_EXCEEDED";
    pub const REMOTE_SERVICE_UNAVAILABLE: &str = "SDK_REMOTE_SERVICE_UNAVAILABLE";
    pub const REMOTE_CALL_FAILED: &str = "SDK_REMOTE_CALL_FAILED";
}

/// Classification of every failure the transport contract can surface.
///
/// `Config`, `CredentialLoad` and `NotImplemented` are local; everything
/// else mirrors a status reported by the remote service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    Config,
    CredentialLoad,
    NotImplemented,
    DeadlineExceeded,
    ServiceUnavailable,
    Cancelled,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Unauthenticated,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    Internal,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::CredentialLoad => "credential_load",
            Self::NotImplemented => "not_implemented",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Cancelled => "cancelled",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::Unauthenticated => "unauthenticated",
            Self::ResourceExhausted => "resource_exhausted",
            Self::FailedPrecondition => "failed_precondition",
            Self::Aborted => "aborted",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_remote(self) -> bool {
        !matches!(self, Self::Config | Self::CredentialLoad | Self::NotImplemented)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[error("{kind} [{machine_code}]: {message}")]
pub struct TransportError {
    pub kind: ErrorKind,
    pub machine_code: String,
    pub message: String,
    #[serde(default)]
    pub user_actionable: bool,
    #[serde(default)]
    pub details: BTreeMap<String, JsonValue>,
}

impl TransportError {
    pub fn new(kind: ErrorKind, machine_code: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            machine_code: machine_code.to_owned(),
            message: message.into(),
            user_actionable: false,
            details: BTreeMap::new(),
        }
    }

    pub fn with_user_actionable(mut self, user_actionable: bool) -> Self {
        self.user_actionable = user_actionable;
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    pub fn config(machine_code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, machine_code, message).with_user_actionable(true)
    }

    pub fn credential_load(machine_code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialLoad, machine_code, message).with_user_actionable(true)
    }

    pub fn not_implemented(operation: Operation) -> Self {
        Self::new(
            ErrorKind::NotImplemented,
            code::OPERATION_NOT_IMPLEMENTED,
            format!("transport does not implement {}", operation.as_str()),
        )
        .with_detail("operation", JsonValue::String(operation.as_str().to_owned()))
    }

    /// Builds an error carrying a status reported by the remote service.
    pub fn remote(kind: ErrorKind, message: impl Into<String>) -> Self {
        let machine_code = match kind {
            ErrorKind::DeadlineExceeded => code::REMOTE_DEADLINE_EXCEEDED,
            ErrorKind::ServiceUnavailable => code::REMOTE_SERVICE_UNAVAILABLE,
            _ => code::REMOTE_CALL_FAILED,
        };
        Self::new(kind, machine_code, message)
    }

    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::remote(ErrorKind::DeadlineExceeded, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::remote(ErrorKind::ServiceUnavailable, message)
    }

    pub fn is_not_implemented(&self) -> bool {
        self.kind == ErrorKind::NotImplemented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_implemented_names_the_operation() {
        let err = TransportError::not_implemented(Operation::SplitCapacityCommitment);
        assert_eq!(err.kind, ErrorKind::NotImplemented);
        assert_eq!(err.machine_code, code::OPERATION_NOT_IMPLEMENTED);
        assert_eq!(
            err.details.get("operation"),
            Some(&JsonValue::String("split_capacity_commitment".to_owned()))
        );
    }

    #[test]
    fn remote_errors_pick_status_specific_codes() {
        assert_eq!(
            TransportError::service_unavailable("down").machine_code,
            code::REMOTE_SERVICE_UNAVAILABLE
        );
        assert_eq!(
            TransportError::remote(ErrorKind::NotFound, "missing").machine_code,
            code::REMOTE_CALL_FAILED
        );
        assert!(ErrorKind::NotFound.is_remote());
        assert!(!ErrorKind::CredentialLoad.is_remote());
    }

    #[test]
    fn display_includes_kind_and_code() {
        let err = TransportError::config(code::CONFIG_INVALID, "bad host");
        assert_eq!(err.to_string(), "config [SDK_CONFIG_INVALID]: bad host");
        assert!(err.user_actionable);
    }
}
