//! The re-observe capability.
//!
//! A poller only knows how to ask for a fresh [`Observation`]. Whether that
//! runs a cluster command or reloads a console page is up to the implementor.

use crate::observation::Observation;
use crate::result::ProbeResult;
use async_trait::async_trait;
use std::future::Future;

/// Produces a fresh observation each time it is called
#[async_trait]
pub trait Observe: Send {
    /// Capture one observation
    ///
    /// An `Err` means the capability itself is broken (the command could not
    /// be started, the browser went away). Pollers surface it immediately.
    async fn observe(&mut self) -> ProbeResult<Observation>;

    /// What is being observed, for failure reports
    fn describe(&self) -> String {
        "observation".to_string()
    }
}

#[async_trait]
impl<F, Fut> Observe for F
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = ProbeResult<Observation>> + Send,
{
    async fn observe(&mut self) -> ProbeResult<Observation> {
        (self)().await
    }
}
