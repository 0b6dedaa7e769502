//! # Example: disconnect
//!
//! A queued request whose client disconnects is cancelled before it runs; a
//! running request survives a disconnect and finishes normally.
//!
//! ## Flow
//! ```text
//! admit(a) ──► running               (disconnect later: no effect)
//! admit(b) ──► queued ──► client disconnects ──► cancelled, never runs
//! a res.end() ──► slot freed ──► backlog already empty
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example disconnect
//! ```

use std::sync::Arc;
use std::time::Duration;

use floodgate::{Gate, Outcome, QueueConfig, Respond};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

struct Body {
    tag: &'static str,
}

impl Respond for Body {
    fn end(&mut self, _body: &[u8]) {
        println!("[{}] response sent", self.tag);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let gate = Gate::new(QueueConfig::with_capacity(1))?;
    let release = Arc::new(Notify::new());

    // `a` takes the only slot and holds it until released.
    let a_disconnect = CancellationToken::new();
    let hold = Arc::clone(&release);
    let a = gate.admit(
        Body { tag: "a" },
        a_disconnect.clone(),
        move |mut res| async move {
            println!("[a] handler started");
            hold.notified().await;
            res.end(b"a");
        },
    )?;

    // `b` waits behind it.
    let b_disconnect = CancellationToken::new();
    let b = gate.admit(
        Body { tag: "b" },
        b_disconnect.clone(),
        |mut res| async move {
            println!("[b] handler started (should never print)");
            res.end(b"b");
        },
    )?;
    println!(
        "queued: active={} depth={}",
        gate.queue().active(),
        gate.queue().depth()
    );

    // b's client leaves while b still waits: b is cancelled.
    b_disconnect.cancel();
    println!("[b] settled: {:?}", b.wait().await);

    // a's client leaves mid-flight: no effect, a runs to completion.
    a_disconnect.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;
    release.notify_one();
    let outcome = a.wait().await;
    assert_eq!(outcome, Outcome::Finished);
    println!("[a] settled: {outcome:?}");

    Ok(())
}
