//! Radio link and counter delivery
//!
//! The radio collaborator interface hides the WiFi chip and the TCP plumbing
//! behind a handful of async operations; the [`manager`] drives it through
//! bring-up, association, and periodic delivery of the pending counter value.

pub mod manager;

use crate::platform::Result;

pub use manager::DeliveryManager;

/// Why the last join attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinFailure {
    /// Authentication rejected (wrong passphrase)
    BadAuth,
    /// No access point with the configured SSID in range
    NoNetwork,
    /// Any other chip-reported failure
    Other,
}

/// Observed state of the association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Associated, link usable
    Up,
    /// Join still in progress
    Joining,
    /// Not associated
    Down(JoinFailure),
}

/// Radio collaborator interface
///
/// One method per phase of the link lifecycle plus delivery. Implementations
/// own the chip, the network stack, and the collector endpoint; the manager
/// only sequences calls.
#[allow(async_fn_in_trait)]
pub trait RadioInterface {
    /// Power up and initialize the radio chip
    async fn init(&mut self) -> Result<()>;

    /// Enable station mode after a successful init
    async fn enable_sta(&mut self) -> Result<()>;

    /// Kick off an association attempt; completion is observed through
    /// [`link_status`](Self::link_status)
    async fn start_join(&mut self, ssid: &str, password: &str) -> Result<()>;

    /// Current association state
    async fn link_status(&mut self) -> LinkStatus;

    /// Tear down the association so the next join starts clean
    async fn leave(&mut self);

    /// Report one counter value to the collector
    async fn deliver(&mut self, value: u32) -> Result<()>;
}
