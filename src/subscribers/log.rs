//! Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints queue lifecycle events to stdout in a human-readable
//! format. Primarily useful for development, debugging, and the examples.
//!
//! ## Output format
//! ```text
//! [enqueued] item=#3 depth=2
//! [started] item=#3 active=1
//! [finished] item=#3 active=0
//! [cancelled] item=#4 depth=1
//! [rejected] depth=8
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Enqueued => {
                if let (Some(item), Some(depth)) = (e.item, e.depth) {
                    println!("[enqueued] item={item} depth={depth}");
                }
            }
            EventKind::Started => {
                if let (Some(item), Some(active)) = (e.item, e.active) {
                    println!("[started] item={item} active={active}");
                }
            }
            EventKind::Finished => {
                if let (Some(item), Some(active)) = (e.item, e.active) {
                    println!("[finished] item={item} active={active}");
                }
            }
            EventKind::Cancelled => {
                if let (Some(item), Some(depth)) = (e.item, e.depth) {
                    println!("[cancelled] item={item} depth={depth}");
                }
            }
            EventKind::Rejected => {
                println!("[rejected] depth={:?}", e.depth);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
