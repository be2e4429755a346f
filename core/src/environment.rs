//! Injectable host dependencies.
//!
//! The contract never reaches for ambient global state. The host clock and
//! the value-transfer primitive are abstracted behind traits and injected,
//! so unit tests can run against a fake clock and ledger.

use crate::types::{Amount, Principal, Tick};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Clock trait - supplies the host's current logical tick.
///
/// Production hosts read their own chain/runtime clock; tests use
/// [`ManualClock`] for deterministic control.
pub trait Clock: Send + Sync {
    /// The current logical tick.
    fn current_tick(&self) -> Tick;
}

/// Failure modes of the host's value-transfer primitive.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TransferError {
    /// The source account does not hold enough value.
    #[error("insufficient funds: balance {balance} < requested {requested}")]
    InsufficientFunds {
        /// Balance of the source account at transfer time.
        balance: Amount,
        /// Amount that was requested.
        requested: Amount,
    },

    /// The host rejected the transfer for a reason of its own.
    #[error("ledger rejected the transfer: {reason}")]
    Rejected {
        /// Host-provided rejection reason.
        reason: String,
    },
}

/// Atomic value transfer between accounts on the host ledger.
///
/// A transfer either completes in full or fails without moving anything;
/// the contract relies on this to keep escrow movements atomic with the
/// record mutations they accompany.
pub trait ValueLedger: Send + Sync {
    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the transfer cannot complete; no value
    /// moves in that case.
    fn transfer(&self, from: &Principal, to: &Principal, amount: Amount)
    -> Result<(), TransferError>;

    /// Current balance of `account` (zero for accounts never credited).
    fn balance(&self, account: &Principal) -> Amount;
}

/// Manually driven clock for the demo binary and tests.
///
/// Starts at a given tick and only moves when told to, keeping
/// time-dependent behavior deterministic.
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: AtomicU64,
}

impl ManualClock {
    /// Creates a clock positioned at `start`.
    #[must_use]
    pub const fn new(start: Tick) -> Self {
        Self {
            tick: AtomicU64::new(start.value()),
        }
    }

    /// Advances the clock by `ticks`.
    pub fn advance(&self, ticks: u64) {
        self.tick.fetch_add(ticks, Ordering::SeqCst);
    }

    /// Moves the clock to an absolute tick.
    pub fn set(&self, tick: Tick) {
        self.tick.store(tick.value(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn current_tick(&self) -> Tick {
        Tick::new(self.tick.load(Ordering::SeqCst))
    }
}

/// In-memory account ledger for the demo binary and tests.
///
/// Accounts that were never credited have a zero balance, mirroring host
/// ledgers where every principal implicitly owns an account.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<Principal, u64>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `account` with `amount`, creating it if needed.
    pub fn credit(&self, account: &Principal, amount: Amount) {
        let mut balances = self.lock_balances();
        let balance = balances.entry(account.clone()).or_insert(0);
        *balance = balance.saturating_add(amount.units());
    }

    fn lock_balances(&self) -> std::sync::MutexGuard<'_, HashMap<Principal, u64>> {
        // Recover the inner map on poisoning; balances stay consistent
        // because every mutation completes before the guard drops.
        self.balances
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ValueLedger for InMemoryLedger {
    fn transfer(
        &self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let mut balances = self.lock_balances();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount.units() {
            return Err(TransferError::InsufficientFunds {
                balance: Amount::new(available),
                requested: amount,
            });
        }

        *balances.entry(from.clone()).or_insert(0) = available - amount.units();
        let destination = balances.entry(to.clone()).or_insert(0);
        *destination = destination.saturating_add(amount.units());
        Ok(())
    }

    fn balance(&self, account: &Principal) -> Amount {
        Amount::new(self.lock_balances().get(account).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    #[test]
    fn manual_clock_advances_and_sets() {
        let clock = ManualClock::new(Tick::new(10));
        assert_eq!(clock.current_tick(), Tick::new(10));

        clock.advance(5);
        assert_eq!(clock.current_tick(), Tick::new(15));

        clock.set(Tick::new(100));
        assert_eq!(clock.current_tick(), Tick::new(100));
    }

    #[test]
    fn transfer_moves_value_between_accounts() {
        let ledger = InMemoryLedger::new();
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");
        ledger.credit(&alice, Amount::new(500));

        ledger.transfer(&alice, &bob, Amount::new(200)).unwrap();

        assert_eq!(ledger.balance(&alice), Amount::new(300));
        assert_eq!(ledger.balance(&bob), Amount::new(200));
    }

    #[test]
    fn transfer_fails_without_moving_value() {
        let ledger = InMemoryLedger::new();
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");
        ledger.credit(&alice, Amount::new(50));

        let result = ledger.transfer(&alice, &bob, Amount::new(100));
        assert_eq!(
            result,
            Err(TransferError::InsufficientFunds {
                balance: Amount::new(50),
                requested: Amount::new(100),
            })
        );

        assert_eq!(ledger.balance(&alice), Amount::new(50));
        assert_eq!(ledger.balance(&bob), Amount::new(0));
    }

    #[test]
    fn unknown_accounts_have_zero_balance() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance(&Principal::new("nobody")), Amount::new(0));
    }
}
