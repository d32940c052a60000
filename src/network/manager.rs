//! Delivery manager
//!
//! Drives the radio through bring-up, association, and delivery on the
//! network core. The manager is a polled state machine: every call to
//! [`DeliveryManager::poll`] advances at most one phase, so a slow or absent
//! access point never blocks checkpointing on the same core.

use crate::config;
use crate::core::mailbox::CoreMailbox;
use crate::devices::display::{DisplayInterface, SharedDisplay};
use crate::network::{JoinFailure, LinkStatus, RadioInterface};
use crate::{log_info, log_warn};

/// Bring-up phase of the radio link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioState {
    /// Chip not initialized yet (or init failed)
    Uninitialized,
    /// Chip up, station mode not enabled yet
    Initialized,
    /// Station mode enabled, not associated
    StaEnabled,
    /// Join attempt in flight
    Associating,
    /// Associated, deliveries allowed
    Associated,
}

fn due(last: Option<u64>, now_ms: u64, interval_ms: u64) -> bool {
    match last {
        None => true,
        Some(t) => now_ms - t >= interval_ms,
    }
}

/// Radio link and delivery state machine
pub struct DeliveryManager<'a, R: RadioInterface, D: DisplayInterface> {
    radio: R,
    mailbox: &'a CoreMailbox,
    display: &'a SharedDisplay<D>,
    state: RadioState,
    last_init_ms: Option<u64>,
    last_join_ms: Option<u64>,
    last_send_ms: Option<u64>,
    send_failures: u8,
    last_failure: Option<JoinFailure>,
}

impl<'a, R: RadioInterface, D: DisplayInterface> DeliveryManager<'a, R, D> {
    /// Create a manager owning the radio
    pub fn new(radio: R, mailbox: &'a CoreMailbox, display: &'a SharedDisplay<D>) -> Self {
        Self {
            radio,
            mailbox,
            display,
            state: RadioState::Uninitialized,
            last_init_ms: None,
            last_join_ms: None,
            last_send_ms: None,
            send_failures: 0,
            last_failure: None,
        }
    }

    /// Current bring-up phase
    pub fn state(&self) -> RadioState {
        self.state
    }

    /// Reason the most recent join attempt failed, if any
    pub fn last_failure(&self) -> Option<JoinFailure> {
        self.last_failure
    }

    /// Advance the state machine one step
    pub async fn poll(&mut self, now_ms: u64) {
        match self.state {
            RadioState::Uninitialized => self.try_init(now_ms).await,
            RadioState::Initialized => self.try_enable_sta().await,
            RadioState::StaEnabled => self.try_join(now_ms).await,
            RadioState::Associating => self.watch_join().await,
            RadioState::Associated => self.run_delivery(now_ms).await,
        }
    }

    async fn try_init(&mut self, now_ms: u64) {
        if !due(self.last_init_ms, now_ms, config::RADIO_INIT_RETRY_MS) {
            return;
        }
        self.last_init_ms = Some(now_ms);

        if let Err(e) = self.radio.init().await {
            log_warn!("Radio init failed: {}", e);
            self.display.render_link("Link down");
            return;
        }
        log_info!("Radio initialized");
        self.state = RadioState::Initialized;
        // Station mode follows in the same poll
        self.try_enable_sta().await;
    }

    async fn try_enable_sta(&mut self) {
        match self.radio.enable_sta().await {
            Ok(()) => self.state = RadioState::StaEnabled,
            Err(e) => {
                log_warn!("Station mode enable failed: {}", e);
            }
        }
    }

    async fn try_join(&mut self, now_ms: u64) {
        if !due(self.last_join_ms, now_ms, config::JOIN_RETRY_MS) {
            return;
        }
        self.last_join_ms = Some(now_ms);

        match self
            .radio
            .start_join(config::WIFI_SSID, config::WIFI_PASSWORD)
            .await
        {
            Ok(()) => {
                self.state = RadioState::Associating;
                self.display.render_link("Joining");
            }
            Err(e) => {
                log_warn!("Join request failed: {}", e);
            }
        }
    }

    async fn watch_join(&mut self) {
        match self.radio.link_status().await {
            LinkStatus::Up => {
                log_info!("Link up");
                self.state = RadioState::Associated;
                self.send_failures = 0;
                self.last_failure = None;
                // Deliver a pending value right away after (re)association
                self.last_send_ms = None;
                self.display.render_link("Link up");
            }
            LinkStatus::Joining => {}
            LinkStatus::Down(reason) => {
                log_warn!("Join failed");
                self.last_failure = Some(reason);
                self.state = RadioState::StaEnabled;
                self.display.render_link("Link down");
            }
        }
    }

    async fn run_delivery(&mut self, now_ms: u64) {
        if let LinkStatus::Down(reason) = self.radio.link_status().await {
            log_warn!("Link lost");
            self.last_failure = Some(reason);
            self.state = RadioState::StaEnabled;
            self.display.render_link("Link down");
            return;
        }

        let Some(value) = self.mailbox.pending_delivery() else {
            return;
        };
        if !due(self.last_send_ms, now_ms, config::DELIVERY_RETRY_MS) {
            return;
        }
        self.last_send_ms = Some(now_ms);

        match self.radio.deliver(value).await {
            Ok(()) => {
                self.mailbox.confirm_delivery();
                self.send_failures = 0;
            }
            Err(e) => {
                self.send_failures += 1;
                log_warn!(
                    "Delivery failed ({} in a row): {}",
                    self.send_failures,
                    e
                );
                if self.send_failures >= config::DELIVERY_FAILS_TO_RECONNECT {
                    // The association may be stale even though the chip
                    // still reports it up; rebuild it from scratch
                    log_warn!("Forcing reassociation");
                    self.radio.leave().await;
                    self.state = RadioState::StaEnabled;
                    self.send_failures = 0;
                    self.last_join_ms = None;
                    self.display.render_link("Link down");
                }
            }
        }
    }
}
