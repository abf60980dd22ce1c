use crate::form::FormEvent;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for form events.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

/// Point-in-time copy handed to report consumers.
pub type EventReport = EventState;

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Event entrypoints
    pub initialize_calls: u64,
    pub save_calls: u64,
    pub save_and_clear_calls: u64,
    pub delete_calls: u64,
    pub clear_calls: u64,

    // Outcomes
    pub events_completed: u64,
    pub events_rejected: u64,
    pub events_failed: u64,

    // Error routing
    pub field_errors_routed: u64,
    pub global_errors_routed: u64,

    // Recoveries
    pub not_found_fallbacks: u64,
    pub contention_failures: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub events: u64,
    pub saves_rejected: u64,
    pub not_found_fallbacks: u64,
    pub contention_failures: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current counters.
pub(crate) fn report() -> EventReport {
    with_state(Clone::clone)
}

/// Bump the per-event entrypoint counter.
pub(crate) const fn count_call(ops: &mut EventOps, event: FormEvent) {
    let slot = match event {
        FormEvent::Initialize => &mut ops.initialize_calls,
        FormEvent::Save => &mut ops.save_calls,
        FormEvent::SaveAndClear => &mut ops.save_and_clear_calls,
        FormEvent::Delete => &mut ops.delete_calls,
        FormEvent::Clear => &mut ops.clear_calls,
    };
    *slot = slot.saturating_add(1);
}
