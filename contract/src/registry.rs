//! Guide registry: registration, verification, and reputation bookkeeping.

use crate::error::{ContractError, EntityKind};
use crate::types::Guide;
use city_tours_core::{Principal, Tick};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Registry of all guide records, keyed by identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GuideRegistry {
    guides: HashMap<Principal, Guide>,
}

impl GuideRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `caller` as a new, unverified guide.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::AlreadyRegistered`] if a record already
    /// exists for this identity; the existing record is untouched.
    pub fn register(&mut self, caller: &Principal, now: Tick) -> Result<(), ContractError> {
        if self.guides.contains_key(caller) {
            return Err(ContractError::AlreadyRegistered);
        }
        self.guides
            .insert(caller.clone(), Guide::new(caller.clone(), now));
        Ok(())
    }

    /// Marks a guide as verified. Re-verifying is a no-op success.
    ///
    /// Caller authorization (admin-only) is enforced by the contract facade;
    /// the registry only manages records.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] if the identity has no record.
    pub fn verify(&mut self, guide: &Principal) -> Result<(), ContractError> {
        let record = self
            .guides
            .get_mut(guide)
            .ok_or(ContractError::NotFound(EntityKind::Guide))?;
        record.verified = true;
        Ok(())
    }

    /// Whether `guide` holds a verified record.
    #[must_use]
    pub fn is_verified(&self, guide: &Principal) -> bool {
        self.guides.get(guide).is_some_and(|g| g.verified)
    }

    /// Counts a guide-initiated cancellation against the guide's record.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] if the identity has no record.
    /// Unreachable through the public surface: only the booking path calls
    /// this, and bookings only reference registered guides.
    pub fn record_cancellation(&mut self, guide: &Principal) -> Result<(), ContractError> {
        let record = self
            .guides
            .get_mut(guide)
            .ok_or(ContractError::NotFound(EntityKind::Guide))?;
        record.cancellations = record.cancellations.saturating_add(1);
        Ok(())
    }

    /// Folds a review score into the guide's running average.
    ///
    /// `new_rating = floor((rating * total_reviews + score) / (total_reviews + 1))`
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] if the identity has no record.
    pub fn record_review(&mut self, guide: &Principal, score: u8) -> Result<(), ContractError> {
        let record = self
            .guides
            .get_mut(guide)
            .ok_or(ContractError::NotFound(EntityKind::Guide))?;
        let reviews = record.total_reviews;
        let folded = record
            .rating
            .saturating_mul(reviews)
            .saturating_add(u64::from(score));
        record.rating = folded / (reviews.saturating_add(1));
        record.total_reviews = reviews.saturating_add(1);
        Ok(())
    }

    /// Read-only lookup of a guide record.
    #[must_use]
    pub fn get(&self, guide: &Principal) -> Option<&Guide> {
        self.guides.get(guide)
    }

    /// Number of registered guides.
    #[must_use]
    pub fn count(&self) -> usize {
        self.guides.len()
    }
}
