//! Mock GPIO implementation for testing

use crate::platform::{
    traits::{GpioInterface, GpioMode},
    Result,
};
use core::cell::Cell;

/// Mock GPIO implementation
///
/// Tracks pin state (high/low) and mode for test verification. The input
/// level is settable through a shared `Cell` so a test can drive the sensor
/// line while the coordinator holds the pin.
#[derive(Debug)]
pub struct MockGpio {
    state: Cell<bool>,
    mode: GpioMode,
}

impl MockGpio {
    /// Create a new mock input pin with pull-up, idle high (the sensor line
    /// is active-low)
    pub fn new_input() -> Self {
        Self {
            state: Cell::new(true),
            mode: GpioMode::InputPullUp,
        }
    }

    /// Drive the simulated input level
    pub fn set_level(&self, high: bool) {
        self.state.set(high);
    }
}

impl GpioInterface for MockGpio {
    fn read(&self) -> bool {
        self.state.get()
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_level_follows_set_level() {
        let pin = MockGpio::new_input();
        assert!(pin.read());

        pin.set_level(false);
        assert!(!pin.read());
    }
}
