//! Interrupt handling for one-shot runs

use std::future::Future;
use std::io;

use tokio::sync::watch;
use tracing::{debug, warn};

/// Forward interrupts from `next_interrupt` to a run's cancel channel
///
/// The first interrupt flips `cancel`, so the run stops at the next round boundary.
/// Returns `true` when a second interrupt arrives and the caller should exit at once,
/// `false` if the signal source fails first.
pub async fn relay_interrupts<F, Fut>(mut next_interrupt: F, cancel: watch::Sender<bool>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    debug!("relay_interrupts: called");
    if let Err(e) = next_interrupt().await {
        debug!(error = %e, "relay_interrupts: signal source failed");
        return false;
    }
    warn!("Interrupt received, stopping after the current round (interrupt again to quit)");
    let _ = cancel.send(true);

    if let Err(e) = next_interrupt().await {
        debug!(error = %e, "relay_interrupts: signal source failed");
        return false;
    }
    warn!("Second interrupt received, exiting");
    true
}
