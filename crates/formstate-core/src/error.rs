use crate::{accessor::AccessError, config::ConfigError, form::FormError, form::WireError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a form-origin invariant violation.
    pub(crate) fn form_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Form,
            message.into(),
        )
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.class, ErrorClass::Conflict)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<AccessError> for InternalError {
    fn from(err: AccessError) -> Self {
        let class = match &err {
            AccessError::Contention { .. } => ErrorClass::Conflict,
            AccessError::NotFound { .. } => ErrorClass::NotFound,
            AccessError::Store { .. } => ErrorClass::Internal,
        };

        Self::new(class, ErrorOrigin::Accessor, err.to_string())
    }
}

impl From<WireError> for InternalError {
    fn from(err: WireError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Wire, err.to_string())
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Config, err.to_string())
    }
}

impl From<FormError> for InternalError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Access(err) => err.into(),
            FormError::Wire(err) => err.into(),
            FormError::Listener(err) => *err,
            FormError::UnknownEvent(_) => {
                Self::new(ErrorClass::Unsupported, ErrorOrigin::Form, err.to_string())
            }
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Accessor,
    Config,
    Form,
    Model,
    View,
    Wire,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Accessor => "accessor",
            Self::Config => "config",
            Self::Form => "form",
            Self::Model => "model",
            Self::View => "view",
            Self::Wire => "wire",
        };
        write!(f, "{label}")
    }
}
