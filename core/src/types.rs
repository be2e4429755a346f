//! Primitive types shared between the contract and its host environment.

use serde::{Deserialize, Serialize};

/// Opaque identity of an account on the host ledger.
///
/// The host authenticates callers; the contract only ever compares
/// principals for equality and uses them as map keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Creates a principal from a host-provided identity string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value of the host's monotonic logical clock.
///
/// Ticks only ever move forward; the contract never advances the clock
/// itself. Time-dependent rules ("has the tour started yet?") are expressed
/// as comparisons against the current tick at call time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tick(u64);

impl Tick {
    /// Creates a tick from a raw clock value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw clock value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns this tick advanced by `ticks`.
    #[must_use]
    pub const fn plus(self, ticks: u64) -> Self {
        Self(self.0.saturating_add(ticks))
    }

    /// Number of ticks from `self` until `later` (zero if already reached).
    #[must_use]
    pub const fn until(self, later: Self) -> u64 {
        later.0.saturating_sub(self.0)
    }

    /// Whether this tick has been reached at `current`.
    #[must_use]
    pub const fn has_passed(self, current: Self) -> bool {
        self.0 <= current.0
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tick {}", self.0)
    }
}

/// Unsigned payment amount in the host ledger's base unit.
///
/// Integer base units avoid fractional rounding, following the same
/// reasoning as cent-denominated money types.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(u64);

impl Amount {
    /// Creates an amount from base units.
    #[must_use]
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// Returns the amount in base units.
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0
    }

    /// Checks if this amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Checked subtraction; `None` on underflow.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} units", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_until_counts_forward_only() {
        let now = Tick::new(100);
        assert_eq!(now.until(Tick::new(244)), 144);
        assert_eq!(now.until(Tick::new(100)), 0);
        assert_eq!(now.until(Tick::new(50)), 0);
    }

    #[test]
    fn tick_has_passed_is_inclusive() {
        let start = Tick::new(200);
        assert!(!start.has_passed(Tick::new(199)));
        assert!(start.has_passed(Tick::new(200)));
        assert!(start.has_passed(Tick::new(201)));
    }

    #[test]
    fn amount_checked_arithmetic() {
        let a = Amount::new(100);
        assert_eq!(a.checked_sub(Amount::new(40)), Some(Amount::new(60)));
        assert_eq!(a.checked_sub(Amount::new(101)), None);
        assert_eq!(Amount::new(u64::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn principal_display_roundtrip() {
        let p = Principal::new("wallet_1");
        assert_eq!(p.as_str(), "wallet_1");
        assert_eq!(p.to_string(), "wallet_1");
    }
}
