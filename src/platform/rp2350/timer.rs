//! RP2350 timer implementation

use crate::platform::{traits::TimerInterface, Result};
use embassy_time::Duration;

/// Busy-wait delays on the embassy time driver
///
/// The display driver needs microsecond-scale strobes, which are too short
/// to yield on; blocking here keeps the sensor loop's timing tight.
pub struct Rp2350Timer;

impl Rp2350Timer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Rp2350Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for Rp2350Timer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        embassy_time::block_for(Duration::from_micros(us as u64));
        Ok(())
    }
}
