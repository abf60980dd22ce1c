use serde::{Deserialize, Serialize};

///
/// MessageKind
/// Severity shown by the presentation layer.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Info,
    Failure,
}

///
/// Message
///
/// Translated, user-visible message attached to a component.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    /// Success messages fade on the client; failures stay until dismissed.
    pub auto_close: bool,
}

impl Message {
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            auto_close: matches!(kind, MessageKind::Success),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Success)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Info)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Failure)
    }
}
