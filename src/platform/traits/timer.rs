//! Timer interface trait
//!
//! Blocking delay support for device drivers that need settle times (the
//! HD44780 controller in particular).

use crate::platform::Result;

/// Timer interface trait
pub trait TimerInterface {
    /// Busy-wait for `us` microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Busy-wait for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }
}
