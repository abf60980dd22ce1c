//! ## Crate layout
//! - `core`: entity models, values, the form state machine, field
//!   components, accessors, the view layer and observability.
//! - `error`: the public error taxonomy.
//!
//! The `prelude` module carries the vocabulary needed to assemble and drive
//! a form view.

pub use formstate_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, ErrorKind, ErrorOrigin};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        config::{FieldConfig, ViewConfig},
        prelude::*,
        store::MemoryAccessor,
        view::{ViewRequest, ViewResponse},
    };
    pub use serde::{Deserialize, Serialize};
}
