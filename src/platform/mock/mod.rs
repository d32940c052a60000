//! Mock platform implementations for host testing
//!
//! These implementations simulate the target hardware in memory so the
//! counting, storage, and delivery logic can be exercised in ordinary host
//! unit tests.

pub mod flash;
pub mod gpio;
pub mod i2c;
pub mod radio;
pub mod timer;

pub use flash::{MockFlash, MockLockout};
pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use radio::{MockRadio, RadioCall};
pub use timer::MockTimer;
