//! Generic "poll source, apply handler" loop.
//!
//! The command-drain and cache-cleanup loops are the same shape: run one
//! step, catch and log its failure, repeat until the stop flag flips.
//! Each instantiation isolates its own failures — one loop blowing up an
//! iteration never affects the other.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use castpulse_core::error::Result;

/// Spawn a named poll loop. `step` is awaited repeatedly; an `Err` is
/// logged and the loop continues. The loop exits only when `stop` flips
/// to true, which also cancels a step in flight at its next await point.
pub fn spawn_poll_loop<F, Fut>(
    name: &'static str,
    mut stop: watch::Receiver<bool>,
    mut step: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            if *stop.borrow() {
                break;
            }
            tokio::select! {
                _ = stop.changed() => {
                    if *stop.borrow() {
                        break;
                    }
                }
                result = step() => {
                    if let Err(e) = result {
                        tracing::error!("Error in {name} loop: {e}");
                    }
                }
            }
        }
        tracing::debug!("{name} loop stopped");
    })
}
