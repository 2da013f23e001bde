//! Stats Module
//!
//! The keyspace statistics core.
//!
//! ## Pipeline
//! ```text
//!   records ──▶ classify(key) ──▶ Aggregator ──▶ AggregationResult
//!                  │                               │
//!           "s/k:<module>/…" → module        per-label counters
//!           anything else    → "misc"        + grand totals
//! ```

mod aggregate;
mod classify;
mod format;

pub use aggregate::{aggregate, AggregationResult, Aggregator, NamespaceStats};
pub use classify::{classify, parse_namespace, MISC_LABEL};
pub use format::format_bytes;
