//! Simple SDK Example
//!
//! Walks through the Queueboard API against a running daemon.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package queueboard-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple
//!    ```

use queueboard_sdk::{DisplayFeed, DisplayFilter, PressOutcome, QueueboardClient};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Queueboard SDK - Simple Example");
    println!("===============================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = QueueboardClient::connect("http://127.0.0.1:9630").await?;
    println!("   ✓ Connected\n");

    // 2. Follow company A on a live feed
    println!("2. Subscribing to company A...");
    let mut feed =
        DisplayFeed::connect("ws://127.0.0.1:9630", DisplayFilter::default().company("A")).await?;
    println!("   ✓ Subscribed\n");

    // 3. Advance the queue
    println!("3. Calling the next customer...");
    let queue = client.increment("A").await?;
    println!("   ✓ Now serving {}\n", queue.label);

    // 4. Issue a ticket through the station
    println!("4. Pressing key 1 on the station...");
    match client.press("1").await? {
        PressOutcome::Issued { label, .. } => println!("   ✓ Issued {}", label),
        PressOutcome::CoolingDown { remaining_ms } => {
            println!("   ⚠ Cooling down, {}ms left", remaining_ms)
        }
        PressOutcome::Unbound => println!("   ⚠ Key not bound"),
    }
    tokio::time::sleep(Duration::from_millis(500)).await;
    let status = client.station_status().await?;
    println!("     - Station: {} ({})\n", status.message, status.state);

    // 5. Drain what the feed saw
    println!("5. Display updates:");
    while let Ok(Some(entry)) = tokio::time::timeout(Duration::from_millis(200), feed.next()).await {
        let entry = entry?;
        println!("     | {} {} -> {}", entry.kind, entry.company, entry.label);
    }
    feed.unsubscribe().await?;
    println!();

    // 6. Snapshot
    println!("6. Full board:");
    let board = client.display_snapshot().await?;
    for entry in &board.entries {
        println!("     - {:<6} {}: {}", entry.kind, entry.company, entry.label);
    }

    println!("\n✓ Example completed successfully!");
    Ok(())
}
