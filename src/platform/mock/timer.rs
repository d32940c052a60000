//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};

/// Mock Timer implementation
///
/// Accumulates requested delays instead of sleeping so driver tests run
/// instantly.
#[derive(Debug, Default)]
pub struct MockTimer {
    elapsed_us: u64,
}

impl MockTimer {
    /// Create a new mock timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Total delay time requested so far
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.elapsed_us = self.elapsed_us.wrapping_add(us as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_accumulate() {
        let mut timer = MockTimer::new();
        timer.delay_us(500).unwrap();
        timer.delay_ms(2).unwrap();
        assert_eq!(timer.elapsed_us(), 2500);
    }
}
