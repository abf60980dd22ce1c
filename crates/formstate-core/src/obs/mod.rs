//! Observability: runtime counters and the sink boundary.
//!
//! Form logic never touches counters directly; it emits `MetricsEvent`s
//! through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport, EventState};
pub use sink::{
    EventOutcome, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
