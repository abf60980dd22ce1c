use derive_more::Display;
use formstate_core::{
    accessor::AccessError,
    config::ConfigError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    form::FormError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// The same request may succeed if sent again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Conflict)
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<AccessError> for Error {
    fn from(err: AccessError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Record does not exist.
    NotFound,

    /// Another writer holds the record; retry the request.
    Conflict,

    /// The request names something this runtime does not handle.
    Unsupported,

    /// The caller cannot remediate this.
    Internal,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::Conflict => Self::Conflict,
            ErrorClass::Unsupported => Self::Unsupported,
            ErrorClass::Internal | ErrorClass::InvariantViolation => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Accessor,
    Config,
    Form,
    Model,
    View,
    Wire,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Accessor => Self::Accessor,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Form => Self::Form,
            CoreErrorOrigin::Model => Self::Model,
            CoreErrorOrigin::View => Self::View,
            CoreErrorOrigin::Wire => Self::Wire,
        }
    }
}
