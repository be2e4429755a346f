//! CLI walkthrough of the City Tours contract.
//!
//! Simulates a host environment with a manually driven clock and an
//! in-memory ledger, then runs the full marketplace lifecycle: register,
//! verify, create a tour, book it, cancel one booking, complete and review
//! another.

use city_tours::{CityTours, CityToursStore, ContractConfig, HostEnvironment, NewTour};
use city_tours_core::{Amount, InMemoryLedger, ManualClock, Principal, Tick, ValueLedger};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== City Tours: Tour-Booking Marketplace ===\n");

    // Simulated host: a manual clock and an in-memory ledger.
    let clock = Arc::new(ManualClock::new(Tick::new(1)));
    let ledger = Arc::new(InMemoryLedger::new());

    let deployer = Principal::new("deployer");
    let escrow = Principal::new("city-tours.escrow");
    let guide = Principal::new("wallet_1");
    let alice = Principal::new("wallet_2");
    let bob = Principal::new("wallet_3");
    for traveler in [&alice, &bob] {
        ledger.credit(traveler, Amount::new(1_000));
    }

    let config = ContractConfig::new(deployer.clone(), escrow.clone());
    let env = HostEnvironment::new(clock.clone(), ledger.clone());
    let store = CityToursStore::new(CityTours::new(config, env));

    // Guide onboarding.
    println!("Registering and verifying guide {guide}...");
    store.register(&guide).await?;
    store.verify(&deployer, &guide).await?;

    // Publish a tour starting 200 ticks out.
    let tour_id = store
        .create_tour(
            &guide,
            NewTour {
                title: "Paris Walking Tour".to_string(),
                description: "Explore the heart of Paris".to_string(),
                price: Amount::new(100),
                duration_minutes: 180,
                location: "Paris".to_string(),
                start_tick: Tick::new(200),
            },
        )
        .await?;
    println!("Guide published {tour_id}\n");

    // Two travelers book; escrow captures both payments.
    let alice_booking = store.book_tour(&alice, tour_id).await?;
    let bob_booking = store.book_tour(&bob, tour_id).await?;
    println!("Bookings: {alice_booking} (alice), {bob_booking} (bob)");
    println!("Escrow now holds {}\n", ledger.balance(&escrow));

    // Alice cancels well before the start: full refund.
    store.cancel_booking(&alice, alice_booking).await?;
    let cancelled = store
        .get_booking_details(alice_booking)
        .await
        .ok_or("missing booking")?;
    println!(
        "Alice cancelled early: status '{}', refunded: {}",
        cancelled.status, cancelled.refund_status
    );
    println!("Alice's balance is back to {}\n", ledger.balance(&alice));

    // Time passes; Bob's tour happens.
    clock.set(Tick::new(250));
    let completed = store
        .get_booking_details(bob_booking)
        .await
        .ok_or("missing booking")?;
    println!("After the start tick, Bob's booking reads '{}'", completed.status);

    // Bob reviews the tour.
    store.submit_review(&bob, bob_booking, 5).await?;
    let info = store.get_guide_info(&guide).await.ok_or("missing guide")?;
    println!(
        "Guide {guide}: rating {} from {} review(s), {} cancellation(s)",
        info.rating, info.total_reviews, info.cancellations
    );

    println!("\n=== Demo complete ===");
    Ok(())
}
