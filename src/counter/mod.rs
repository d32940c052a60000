//! Pulse counting, shift scheduling, and checkpoint policy

pub mod coordinator;
pub mod shift;

pub use coordinator::PulseCoordinator;
pub use shift::{classify, continues_current_shift, is_previous_day, ShiftState};
