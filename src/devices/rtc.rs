//! DS3231 real-time clock driver
//!
//! Exposes the clock as a single `now()` read returning a [`ClockSnapshot`],
//! plus a one-time `set()` for provisioning. Registers are BCD-encoded;
//! the year register holds two digits (2000-based).

use crate::platform::{traits::I2cInterface, Result};

/// DS3231 7-bit I2C address
const DS3231_ADDR: u8 = 0x68;

/// Register address of the seconds register (start of the time block)
const REG_SECONDS: u8 = 0x00;

/// Read-only copy of the current date and time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockSnapshot {
    /// Seconds (0..=59)
    pub sec: u8,
    /// Minutes (0..=59)
    pub min: u8,
    /// Hour of day (0..=23)
    pub hour: u8,
    /// Calendar day (1..=31)
    pub day: u8,
    /// Calendar month (1..=12)
    pub month: u8,
    /// Two-digit year (0..=99)
    pub year: u8,
}

/// DS3231 driver over a platform I2C bus
pub struct Ds3231<I2C: I2cInterface> {
    i2c: I2C,
}

fn bcd_to_dec(val: u8) -> u8 {
    (val >> 4) * 10 + (val & 0x0F)
}

fn dec_to_bcd(val: u8) -> u8 {
    ((val / 10) << 4) | (val % 10)
}

impl<I2C: I2cInterface> Ds3231<I2C> {
    /// Create a driver over an initialized I2C bus
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Read the current date and time
    pub fn now(&mut self) -> Result<ClockSnapshot> {
        let mut buf = [0u8; 7];
        self.i2c.write_read(DS3231_ADDR, &[REG_SECONDS], &mut buf)?;

        Ok(ClockSnapshot {
            sec: bcd_to_dec(buf[0]),
            min: bcd_to_dec(buf[1]),
            // Mask the 12/24-hour mode bits
            hour: bcd_to_dec(buf[2] & 0x3F),
            // buf[3] is the day-of-week register, unused here
            day: bcd_to_dec(buf[4]),
            month: bcd_to_dec(buf[5] & 0x7F),
            year: bcd_to_dec(buf[6]),
        })
    }

    /// One-time provisioning write
    ///
    /// `weekday` is 1..=7; the counting logic never reads it back but the
    /// chip requires a value.
    pub fn set(&mut self, snapshot: &ClockSnapshot, weekday: u8) -> Result<()> {
        let data = [
            REG_SECONDS,
            dec_to_bcd(snapshot.sec),
            dec_to_bcd(snapshot.min),
            dec_to_bcd(snapshot.hour),
            dec_to_bcd(weekday),
            dec_to_bcd(snapshot.day),
            dec_to_bcd(snapshot.month),
            dec_to_bcd(snapshot.year),
        ];
        self.i2c.write(DS3231_ADDR, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{I2cTransaction, MockI2c};

    #[test]
    fn bcd_conversions() {
        assert_eq!(bcd_to_dec(0x59), 59);
        assert_eq!(bcd_to_dec(0x00), 0);
        assert_eq!(dec_to_bcd(59), 0x59);
        assert_eq!(dec_to_bcd(7), 0x07);
    }

    #[test]
    fn now_decodes_registers() {
        let mut i2c = MockI2c::new();
        // 18:38:00 on 2026-08-27 (Thursday = register 4)
        i2c.set_read_data(&[0x00, 0x38, 0x18, 0x04, 0x27, 0x08, 0x26]);

        let mut rtc = Ds3231::new(i2c);
        let snap = rtc.now().unwrap();

        assert_eq!(
            snap,
            ClockSnapshot {
                sec: 0,
                min: 38,
                hour: 18,
                day: 27,
                month: 8,
                year: 26,
            }
        );
    }

    #[test]
    fn set_writes_bcd_block() {
        let i2c = MockI2c::new();
        let mut rtc = Ds3231::new(i2c);

        let snap = ClockSnapshot {
            sec: 0,
            min: 38,
            hour: 18,
            day: 27,
            month: 11,
            year: 25,
        };
        rtc.set(&snap, 5).unwrap();

        let log = rtc.i2c.transactions();
        assert_eq!(
            log[0],
            I2cTransaction::Write {
                addr: DS3231_ADDR,
                data: vec![0x00, 0x00, 0x38, 0x18, 0x05, 0x27, 0x11, 0x25],
            }
        );
    }
}
