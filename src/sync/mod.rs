//! The reconciliation engine and the background scheduling loop around it.

pub mod reconcile;
pub mod scheduler;
