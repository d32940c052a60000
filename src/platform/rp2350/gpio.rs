//! RP2350 GPIO implementation

use crate::platform::{
    traits::{GpioInterface, GpioMode},
    Result,
};
use embassy_rp::gpio::Input;

/// Input pin backed by the embassy-rp GPIO driver
///
/// The pull resistor is chosen when the `Input` is constructed; runtime
/// mode changes only update the recorded mode.
pub struct Rp2350Gpio<'d> {
    pin: Input<'d>,
    mode: GpioMode,
}

impl<'d> Rp2350Gpio<'d> {
    /// Wrap a configured input pin
    pub fn new(pin: Input<'d>, mode: GpioMode) -> Self {
        Self { pin, mode }
    }
}

impl<'d> GpioInterface for Rp2350Gpio<'d> {
    fn read(&self) -> bool {
        self.pin.is_high()
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
