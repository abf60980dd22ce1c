//! Reference entity accessors.
//!
//! `MemoryAccessor` keeps records in process memory and applies the model's
//! field rules on save; `StoreSnapshot` is its serializable form.
mod memory;
mod snapshot;


pub use memory::{CallCounts, MemoryAccessor, SaveHook};
pub use snapshot::{StoreSnapshot, StoredRow};

///
/// CONSTANTS
///

/// Message key for a required field left blank.
pub const MISSING_FIELD_KEY: &str = "core.validate.field.error.missing";
