//! The response-side seam: terminating writes and their interception.
//!
//! ## Contents
//! - [`Respond`] — the capability the hosting framework must provide: a
//!   terminating write that can be intercepted.
//! - [`EndSignal`] — decorator that fires a completion signal the first time
//!   the terminating write happens, then steps aside.
//!
//! "Handler returned" and "response fully sent" are different moments when
//! handlers stream asynchronously; the queue frees a slot on the latter.

mod end_signal;

pub use end_signal::EndSignal;

/// A response-like collaborator exposing a terminating write.
///
/// This is the only thing floodgate needs from the hosting framework's
/// response type. Implementations forward `end` to whatever flushes and
/// closes the underlying response stream.
///
/// # Example
/// ```
/// use floodgate::Respond;
///
/// struct Buffer(Vec<u8>);
///
/// impl Respond for Buffer {
///     fn end(&mut self, body: &[u8]) {
///         self.0.extend_from_slice(body);
///     }
/// }
/// ```
pub trait Respond: Send {
    /// Performs the terminating write: the final bytes after which the
    /// response is considered fully sent.
    fn end(&mut self, body: &[u8]);

    /// Reports whether a completion signal is already armed on this response.
    ///
    /// [`EndSignal`] overrides this to `true`; plain responses keep the
    /// default `false`. Used to keep wrapping idempotent when middleware
    /// chains stack.
    fn instrumented(&self) -> bool {
        false
    }
}
