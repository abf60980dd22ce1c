//! Metrics sink boundary.
//!
//! Form logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between event handling
//! and the thread-local metrics state.
use crate::{form::FormEvent, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// EventOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventOutcome {
    /// The transition ran to completion with a valid form.
    Completed,
    /// The transition ran to completion but the accessor rejected the record.
    Rejected,
    /// The transition aborted and left the form untouched.
    Failed,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    EventStart {
        event: FormEvent,
        entity_path: &'a str,
    },
    EventFinish {
        event: FormEvent,
        entity_path: &'a str,
        outcome: EventOutcome,
    },
    ErrorsRouted {
        entity_path: &'a str,
        field_errors: u64,
        global_errors: u64,
    },
    NotFoundFallback {
        entity_path: &'a str,
    },
    Contention {
        entity_path: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into the global event state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::EventStart { event, entity_path } => {
                metrics::with_state_mut(|m| {
                    metrics::count_call(&mut m.ops, event);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.events = entry.events.saturating_add(1);
                });
            }
            MetricsEvent::EventFinish {
                entity_path,
                outcome,
                ..
            } => {
                metrics::with_state_mut(|m| match outcome {
                    EventOutcome::Completed => {
                        m.ops.events_completed = m.ops.events_completed.saturating_add(1);
                    }
                    EventOutcome::Rejected => {
                        m.ops.events_rejected = m.ops.events_rejected.saturating_add(1);
                        let entry = m.entities.entry(entity_path.to_string()).or_default();
                        entry.saves_rejected = entry.saves_rejected.saturating_add(1);
                    }
                    EventOutcome::Failed => {
                        m.ops.events_failed = m.ops.events_failed.saturating_add(1);
                    }
                });
            }
            MetricsEvent::ErrorsRouted {
                field_errors,
                global_errors,
                ..
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.field_errors_routed =
                        m.ops.field_errors_routed.saturating_add(field_errors);
                    m.ops.global_errors_routed =
                        m.ops.global_errors_routed.saturating_add(global_errors);
                });
            }
            MetricsEvent::NotFoundFallback { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.not_found_fallbacks = m.ops.not_found_fallbacks.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.not_found_fallbacks = entry.not_found_fallbacks.saturating_add(1);
                });
            }
            MetricsEvent::Contention { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.contention_failures = m.ops.contention_failures.saturating_add(1);
                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.contention_failures = entry.contention_failures.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// Span
/// RAII guard that emits start/finish metrics events for one form event.
/// A span dropped without an outcome finishes as `Failed`, so early returns
/// are still accounted.
///

pub(crate) struct Span<'a> {
    event: FormEvent,
    entity_path: &'a str,
    outcome: EventOutcome,
}

impl<'a> Span<'a> {
    #[must_use]
    pub(crate) fn new(event: FormEvent, entity_path: &'a str) -> Self {
        record(MetricsEvent::EventStart { event, entity_path });

        Self {
            event,
            entity_path,
            outcome: EventOutcome::Failed,
        }
    }

    pub(crate) const fn set_outcome(&mut self, outcome: EventOutcome) {
        self.outcome = outcome;
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        record(MetricsEvent::EventFinish {
            event: self.event,
            entity_path: self.entity_path,
            outcome: self.outcome,
        });
    }
}
