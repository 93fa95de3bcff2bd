//! Invariant checks over `GameState`.
//!
//! The auditor sits beside the engine for tests and CI. A violation means a
//! bug upstream, so `audit` fails on the first one it finds.

pub mod auditor;

pub use auditor::{AuditError, AuditLevel, Finding, StateAuditor};
