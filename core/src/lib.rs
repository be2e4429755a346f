//! # City Tours Core
//!
//! Host-environment abstractions for the City Tours marketplace contract.
//!
//! The contract itself is pure state logic. Everything the surrounding
//! execution environment provides — caller identity, a monotonic logical
//! clock, and atomic value transfer between accounts — is modelled here as
//! plain types and injectable traits:
//!
//! - [`Principal`]: an opaque account identity
//! - [`Tick`]: a value of the host's logical clock
//! - [`Amount`]: an unsigned payment unit
//! - [`environment::Clock`]: supplies the current tick
//! - [`environment::ValueLedger`]: moves value between accounts atomically
//!
//! Production hosts implement the traits against their own runtime. The
//! [`environment::ManualClock`] and [`environment::InMemoryLedger`] reference
//! implementations back the demo binary and the test suites.

pub mod environment;
pub mod types;

pub use environment::{Clock, InMemoryLedger, ManualClock, TransferError, ValueLedger};
pub use types::{Amount, Principal, Tick};
