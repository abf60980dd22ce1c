use crate::form::FormError;
use derive_more::Display;
use std::str::FromStr;

///
/// FormEvent
///
/// Built-in form transitions addressable by name from the view layer.
/// `reset` is accepted as an alias of `initialize`.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum FormEvent {
    #[display("clear")]
    Clear,
    #[display("save")]
    Save,
    #[display("saveAndClear")]
    SaveAndClear,
    #[display("initialize")]
    Initialize,
    #[display("delete")]
    Delete,
}

impl FormEvent {
    /// Every event name the form registers, aliases included.
    pub const NAMES: [&'static str; 6] = [
        "clear",
        "save",
        "saveAndClear",
        "initialize",
        "reset",
        "delete",
    ];

    /// Resolve an event name, `None` when the form does not handle it.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clear" => Some(Self::Clear),
            "save" => Some(Self::Save),
            "saveAndClear" => Some(Self::SaveAndClear),
            "initialize" | "reset" => Some(Self::Initialize),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl FromStr for FormEvent {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FormError::UnknownEvent(s.to_string()))
    }
}
