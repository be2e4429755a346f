//! Environment dependencies for the contract.

use city_tours_core::{Clock, ValueLedger};
use std::sync::Arc;

/// Host dependencies injected into the contract.
///
/// Production hosts supply their own clock and ledger; tests inject a
/// `ManualClock` and an `InMemoryLedger` (or a failure-injecting wrapper)
/// to drive time and money deterministically.
#[derive(Clone)]
pub struct HostEnvironment {
    clock: Arc<dyn Clock>,
    ledger: Arc<dyn ValueLedger>,
}

impl HostEnvironment {
    /// Creates a new `HostEnvironment`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ledger: Arc<dyn ValueLedger>) -> Self {
        Self { clock, ledger }
    }

    /// The host clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The host value ledger.
    #[must_use]
    pub fn ledger(&self) -> &dyn ValueLedger {
        self.ledger.as_ref()
    }
}

impl std::fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEnvironment").finish_non_exhaustive()
    }
}
