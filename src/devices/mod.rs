//! External collaborator drivers
//!
//! The RTC and the character display are collaborators, not part of the
//! counting core: the coordinator only ever asks the clock for a snapshot
//! and fires render calls at the display. Both drivers sit behind the
//! platform I2C trait so they run against the mock bus in host tests.

pub mod display;
pub mod rtc;

pub use display::{DisplayInterface, Hd44780, SharedDisplay};
pub use rtc::{ClockSnapshot, Ds3231};
