//! # City Tours
//!
//! A tour-booking marketplace expressed as deterministic on-ledger state
//! logic: guides register and get verified by the administrator, verified
//! guides publish immutable tours, travelers book with escrowed payment,
//! cancellations apply a time-sensitive refund policy, and reviews of
//! completed bookings fold into each guide's running rating.
//!
//! The host execution environment supplies caller identity, a monotonic
//! logical clock, and atomic value transfer; all three are injected through
//! [`HostEnvironment`] so the contract stays a pure, testable state
//! machine.
//!
//! # Example
//!
//! ```ignore
//! use city_tours::{CityTours, ContractConfig, HostEnvironment, NewTour};
//! use city_tours_core::{Amount, InMemoryLedger, ManualClock, Principal, Tick};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(Tick::new(1)));
//! let ledger = Arc::new(InMemoryLedger::new());
//! let config = ContractConfig::new(
//!     Principal::new("deployer"),
//!     Principal::new("city-tours.escrow"),
//! );
//! let mut contract = CityTours::new(config, HostEnvironment::new(clock.clone(), ledger.clone()));
//!
//! let guide = Principal::new("wallet_1");
//! contract.register(&guide)?;
//! contract.verify(&Principal::new("deployer"), &guide)?;
//! let tour_id = contract.create_tour(&guide, NewTour {
//!     title: "Paris Walking Tour".into(),
//!     description: "Explore the heart of Paris".into(),
//!     price: Amount::new(100),
//!     duration_minutes: 180,
//!     location: "Paris".into(),
//!     start_tick: Tick::new(200),
//! })?;
//! # Ok::<(), city_tours::ContractError>(())
//! ```

pub mod booking;
pub mod catalog;
pub mod contract;
pub mod environment;
pub mod error;
pub mod registry;
pub mod store;
pub mod types;

pub use contract::{CityTours, ContractConfig, DEFAULT_CANCELLATION_WINDOW};
pub use environment::HostEnvironment;
pub use error::{ContractError, EntityKind};
pub use store::CityToursStore;
pub use types::{Booking, BookingId, BookingStatus, Guide, NewTour, Tour, TourId};
