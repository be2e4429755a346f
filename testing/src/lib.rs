//! # City Tours Testing
//!
//! Test doubles and fixtures for exercising the City Tours contract
//! deterministically:
//!
//! - [`FailingLedger`]: wraps any [`ValueLedger`] and injects transfer
//!   failures on demand, for all-or-nothing atomicity tests
//! - [`fixtures`]: well-known principals and a funded clock-plus-ledger
//!   harness mirroring the accounts a local devnet would provision
//!
//! The deterministic clock and in-memory ledger themselves live in
//! `city-tours-core::environment`, since the demo binary shares them.

use city_tours_core::{Amount, Principal, TransferError, ValueLedger};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ledger wrapper that fails a configurable number of upcoming transfers.
///
/// Balances and successful transfers delegate to the wrapped ledger, so a
/// test can let an escrow capture succeed and then arm a failure for the
/// refund that follows.
pub struct FailingLedger {
    inner: Arc<dyn ValueLedger>,
    failures_remaining: AtomicU64,
}

impl FailingLedger {
    /// Wraps `inner` with no failures armed.
    #[must_use]
    pub fn new(inner: Arc<dyn ValueLedger>) -> Self {
        Self {
            inner,
            failures_remaining: AtomicU64::new(0),
        }
    }

    /// Arms exactly one transfer failure.
    pub fn fail_next_transfer(&self) {
        self.failures_remaining.store(1, Ordering::SeqCst);
    }

    /// Arms the next `count` transfers to fail.
    pub fn fail_transfers(&self, count: u64) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }
}

impl ValueLedger for FailingLedger {
    fn transfer(
        &self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let armed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if armed {
            return Err(TransferError::Rejected {
                reason: "injected transfer failure".to_string(),
            });
        }
        self.inner.transfer(from, to, amount)
    }

    fn balance(&self, account: &Principal) -> Amount {
        self.inner.balance(account)
    }
}

/// Well-known principals and pre-funded environments for scenario tests.
pub mod fixtures {
    use city_tours_core::{Amount, InMemoryLedger, ManualClock, Principal, Tick};
    use std::sync::Arc;

    /// The deploying (administrator) principal.
    #[must_use]
    pub fn deployer() -> Principal {
        Principal::new("deployer")
    }

    /// The contract's own escrow account.
    #[must_use]
    pub fn escrow() -> Principal {
        Principal::new("city-tours.escrow")
    }

    /// A numbered wallet principal, `wallet_1` style.
    #[must_use]
    pub fn wallet(n: u32) -> Principal {
        Principal::new(format!("wallet_{n}"))
    }

    /// Default balance given to each funded wallet.
    pub const WALLET_FUNDS: Amount = Amount::new(100_000);

    /// Tick the test clock starts at.
    pub const GENESIS_TICK: Tick = Tick::new(1);

    /// A clock at [`GENESIS_TICK`] and a ledger with `wallets` funded
    /// wallets, ready to drive a contract.
    #[must_use]
    pub fn host(wallets: u32) -> (Arc<ManualClock>, Arc<InMemoryLedger>) {
        let clock = Arc::new(ManualClock::new(GENESIS_TICK));
        let ledger = Arc::new(InMemoryLedger::new());
        for n in 1..=wallets {
            ledger.credit(&wallet(n), WALLET_FUNDS);
        }
        (clock, ledger)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use city_tours_core::{Clock, InMemoryLedger};

    #[test]
    fn failing_ledger_fails_only_armed_transfers() {
        let inner = Arc::new(InMemoryLedger::new());
        let alice = fixtures::wallet(1);
        let bob = fixtures::wallet(2);
        inner.credit(&alice, Amount::new(1_000));

        let ledger = FailingLedger::new(inner);
        ledger.fail_next_transfer();

        let err = ledger.transfer(&alice, &bob, Amount::new(10)).unwrap_err();
        assert!(matches!(err, TransferError::Rejected { .. }));
        assert_eq!(ledger.balance(&alice), Amount::new(1_000));

        // Next transfer goes through untouched.
        ledger.transfer(&alice, &bob, Amount::new(10)).unwrap();
        assert_eq!(ledger.balance(&bob), Amount::new(10));
    }

    #[test]
    fn host_fixture_funds_wallets() {
        let (clock, ledger) = fixtures::host(2);
        assert_eq!(clock.current_tick(), fixtures::GENESIS_TICK);
        assert_eq!(ledger.balance(&fixtures::wallet(1)), fixtures::WALLET_FUNDS);
        assert_eq!(ledger.balance(&fixtures::wallet(2)), fixtures::WALLET_FUNDS);
        assert_eq!(ledger.balance(&fixtures::deployer()), Amount::new(0));
    }
}
