//! Diagnostic sink for negative cache decisions.
//!
//! Observers only see the outcome; a decision never depends on what an
//! observer does with it.

use tracing::debug;

use crate::reason::{Check, Rejection};

pub trait PolicyObserver {
    fn rejected(&self, check: Check, reason: Rejection);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PolicyObserver for NoopObserver {
    fn rejected(&self, _check: Check, _reason: Rejection) {}
}

/// Emits one `debug` event per rejection on the `cachet::policy` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PolicyObserver for TracingObserver {
    fn rejected(&self, check: Check, reason: Rejection) {
        debug!(
            target: "cachet::policy",
            check = %check,
            reason = %reason,
            "Cache decision rejected"
        );
    }
}

/// Observer selected from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostics {
    Tracing,
    Off,
}

impl PolicyObserver for Diagnostics {
    fn rejected(&self, check: Check, reason: Rejection) {
        if let Diagnostics::Tracing = self {
            TracingObserver.rejected(check, reason);
        }
    }
}

impl<F> PolicyObserver for F
where
    F: Fn(Check, Rejection),
{
    fn rejected(&self, check: Check, reason: Rejection) {
        self(check, reason)
    }
}
