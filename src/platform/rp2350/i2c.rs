//! RP2350 I2C implementation
//!
//! Blocking mode: the display and RTC transactions are short and run on
//! the sensor core's polling loop, where an async bus would buy nothing.

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::I2cInterface,
    Result,
};
use embassy_rp::i2c::{Blocking, I2c, Instance};

/// I2C bus backed by the embassy-rp blocking driver
pub struct Rp2350I2c<'d, T: Instance> {
    i2c: I2c<'d, T, Blocking>,
}

impl<'d, T: Instance> Rp2350I2c<'d, T> {
    /// Wrap a configured blocking I2C peripheral
    pub fn new(i2c: I2c<'d, T, Blocking>) -> Self {
        Self { i2c }
    }
}

impl<'d, T: Instance> I2cInterface for Rp2350I2c<'d, T> {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.i2c.blocking_write(addr, data).map_err(map_i2c_error)
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.i2c.blocking_read(addr, buffer).map_err(map_i2c_error)
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .blocking_write_read(addr, write_data, read_buffer)
            .map_err(map_i2c_error)
    }
}

fn map_i2c_error(e: embassy_rp::i2c::Error) -> PlatformError {
    use embassy_rp::i2c::{AbortReason, Error};
    match e {
        Error::Abort(AbortReason::NoAcknowledge) => PlatformError::I2c(I2cError::Nack),
        Error::Abort(_) => PlatformError::I2c(I2cError::BusError),
        Error::AddressOutOfRange(_) | Error::AddressReserved(_) => {
            PlatformError::I2c(I2cError::InvalidAddress)
        }
        _ => PlatformError::I2c(I2cError::BusError),
    }
}
