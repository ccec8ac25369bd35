//! Process-wide cancellation flag.
//!
//! The CLI's ctrl-c handler sets it; `TransferBatch::execute` checks it
//! between items and cancels the paste. Relaxed atomics are enough for a
//! one-way flag.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent, signal-safe).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Install a ctrl-c handler that requests shutdown and then runs `on_signal`.
pub fn install_handler<F>(on_signal: F) -> Result<(), ctrlc::Error>
where
    F: FnMut() + Send + 'static,
{
    let mut on_signal = on_signal;
    ctrlc::set_handler(move || {
        request();
        on_signal();
    })
}
