//! Mirrors a single remote iCalendar feed into Postgres and re-exposes the
//! reconciled state as a regenerated `.ics` document over HTTP.
//!
//! A background task polls the remote feed on a fixed interval and reconciles
//! each entry against the store (insert / update / no-op, keyed by UID).
//! Events that disappear from the remote feed are never deleted.

pub mod config;
pub mod feed;
pub mod server;
pub mod store;
pub mod sync;
