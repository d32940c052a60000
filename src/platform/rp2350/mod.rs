//! RP2350 (Pico 2 W) platform implementations
//!
//! Target-only code. Everything here is reachable solely through the
//! `pico2_w` feature; host builds and tests use the mock platform instead.

pub mod flash;
pub mod gpio;
pub mod i2c;
pub mod radio;
pub mod timer;

pub use flash::{lockout_point, Rp2350Flash, Rp2350Lockout, STORAGE_OFFSET};
pub use gpio::Rp2350Gpio;
pub use i2c::Rp2350I2c;
pub use radio::Cyw43Radio;
pub use timer::Rp2350Timer;
