//! Mock radio for host testing

use crate::network::{JoinFailure, LinkStatus, RadioInterface};
use crate::platform::error::{PlatformError, Result};
use core::cell::{Cell, RefCell};
use std::string::String;
use std::vec::Vec;

/// One recorded call on the mock radio
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    Init,
    EnableSta,
    Join { ssid: String, password: String },
    Leave,
    Deliver(u32),
}

/// Scriptable in-memory radio
///
/// Defaults to the happy path: init succeeds, a join comes up immediately,
/// and every delivery is accepted. Tests inject failures up front.
#[derive(Debug)]
pub struct MockRadio {
    init_failures: Cell<u32>,
    deliver_failures: Cell<u32>,
    /// Status reported once a join has been started
    join_outcome: Cell<LinkStatus>,
    status: Cell<LinkStatus>,
    delivered: RefCell<Vec<u32>>,
    calls: RefCell<Vec<RadioCall>>,
}

impl MockRadio {
    /// Create a happy-path radio
    pub fn new() -> Self {
        Self {
            init_failures: Cell::new(0),
            deliver_failures: Cell::new(0),
            join_outcome: Cell::new(LinkStatus::Up),
            status: Cell::new(LinkStatus::Down(JoinFailure::Other)),
            delivered: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Fail the next `n` init attempts
    pub fn fail_inits(&self, n: u32) {
        self.init_failures.set(n);
    }

    /// Fail the next `n` deliveries
    pub fn fail_deliveries(&self, n: u32) {
        self.deliver_failures.set(n);
    }

    /// Status every subsequent join resolves to
    pub fn set_join_outcome(&self, status: LinkStatus) {
        self.join_outcome.set(status);
    }

    /// Override the currently reported link status
    pub fn set_status(&self, status: LinkStatus) {
        self.status.set(status);
    }

    /// Values delivered so far
    pub fn delivered(&self) -> Vec<u32> {
        self.delivered.borrow().clone()
    }

    /// All recorded calls
    pub fn calls(&self) -> Vec<RadioCall> {
        self.calls.borrow().clone()
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioInterface for MockRadio {
    async fn init(&mut self) -> Result<()> {
        self.calls.borrow_mut().push(RadioCall::Init);
        let remaining = self.init_failures.get();
        if remaining > 0 {
            self.init_failures.set(remaining - 1);
            return Err(PlatformError::InitializationFailed);
        }
        Ok(())
    }

    async fn enable_sta(&mut self) -> Result<()> {
        self.calls.borrow_mut().push(RadioCall::EnableSta);
        Ok(())
    }

    async fn start_join(&mut self, ssid: &str, password: &str) -> Result<()> {
        self.calls.borrow_mut().push(RadioCall::Join {
            ssid: ssid.into(),
            password: password.into(),
        });
        self.status.set(self.join_outcome.get());
        Ok(())
    }

    async fn link_status(&mut self) -> LinkStatus {
        self.status.get()
    }

    async fn leave(&mut self) {
        self.calls.borrow_mut().push(RadioCall::Leave);
        self.status.set(LinkStatus::Down(JoinFailure::Other));
    }

    async fn deliver(&mut self, value: u32) -> Result<()> {
        self.calls.borrow_mut().push(RadioCall::Deliver(value));
        let remaining = self.deliver_failures.get();
        if remaining > 0 {
            self.deliver_failures.set(remaining - 1);
            return Err(PlatformError::ResourceUnavailable);
        }
        self.delivered.borrow_mut().push(value);
        Ok(())
    }
}
