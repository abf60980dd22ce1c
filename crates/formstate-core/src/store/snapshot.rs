use crate::entity::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

///
/// StoreSnapshot
/// Serializable image of a `MemoryAccessor`.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub rows: Vec<StoredRow>,
}

const fn first_id() -> u64 {
    1
}

///
/// StoredRow
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StoredRow {
    pub id: EntityId,
    #[serde(default)]
    pub fields: BTreeMap<String, JsonValue>,
}
