//! # Example: serialized
//!
//! Five simulated requests through a capacity-1 gate: each handler sleeps,
//! then performs its terminating write; the gate runs them strictly one at a
//! time, in arrival order.
//!
//! ## Flow
//! ```text
//! admit(r1..r5) ──► AdmissionQueue (capacity = 1)
//!     ├─► r1 running, r2..r5 queued
//!     ├─► r1 res.end() ──► slot freed ──► r2 running
//!     └─► ... until the backlog drains
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example serialized
//! ```

use std::time::Duration;

use floodgate::{Gate, QueueConfig, Respond};
use tokio_util::sync::CancellationToken;

/// Stand-in for a framework response: collects the terminating write.
struct Body {
    tag: &'static str,
}

impl Respond for Body {
    fn end(&mut self, body: &[u8]) {
        println!("[{}] sent {} bytes", self.tag, body.len());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. One slot: fully serialized handlers.
    let gate = Gate::new(QueueConfig::with_capacity(1))?;

    // 2. Admit five "requests" back to back.
    let tags = ["r1", "r2", "r3", "r4", "r5"];
    let mut tickets = Vec::new();
    for tag in tags {
        let ticket = gate.admit(
            Body { tag },
            CancellationToken::new(),
            move |mut res| async move {
                println!("[{tag}] handler started");
                tokio::time::sleep(Duration::from_millis(200)).await;
                res.end(b"hello world");
            },
        )?;
        println!(
            "[{tag}] admitted: active={} queued={}",
            gate.queue().active(),
            gate.queue().depth()
        );
        tickets.push(ticket);
    }

    // 3. Wait for every completion, in order.
    for (tag, ticket) in tags.iter().zip(tickets) {
        let outcome = ticket.wait().await;
        println!("[{tag}] settled: {outcome:?}");
    }

    Ok(())
}
