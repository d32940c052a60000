//! Character display driver and shared render lock
//!
//! The 16x2 HD44780 sits behind a PCF8574 I2C backpack in 4-bit mode.
//! Rendering is fire-and-forget: both cores issue render calls, serialized
//! through [`SharedDisplay`], a blocking mutex held only for the duration of
//! one render.
//!
//! Layout:
//!
//! ```text
//! ┌────────────────┐
//! │Count: 1234     │   row 0: counter (value from column 7)
//! │18:38:00 Shift 1│   row 1: time + shift label, or link status
//! └────────────────┘
//! ```

use crate::platform::{
    traits::{I2cInterface, TimerInterface},
    Result,
};
use core::cell::RefCell;
use core::fmt::Write as _;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

/// PCF8574 backpack 7-bit address
const LCD_ADDR: u8 = 0x27;

/// Backlight bit on the PCF8574 port
const LCD_BACKLIGHT: u8 = 0x08;

/// Enable strobe bit
const LCD_ENABLE: u8 = 0x04;

/// Register-select bit (1 = data)
const LCD_RS: u8 = 0x01;

/// Column where the counter digits start on row 0
const COUNT_COL: u8 = 7;

/// Display collaborator interface
///
/// Idempotent render calls; implementations own their bus. Serialization
/// across cores is the caller's job via [`SharedDisplay`].
pub trait DisplayInterface {
    /// Render the current counter value
    fn render_count(&mut self, value: u32);

    /// Render time of day plus the shift (or break) label
    fn render_time(&mut self, hour: u8, min: u8, sec: u8, label: &str);

    /// Render a short radio link status label
    fn render_link(&mut self, label: &str);
}

/// Display lock shared by both cores
///
/// Wraps the device in a blocking mutex; each render call holds the lock
/// for exactly one device operation.
pub struct SharedDisplay<D: DisplayInterface> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<D>>,
}

impl<D: DisplayInterface> SharedDisplay<D> {
    /// Wrap a display device
    pub fn new(display: D) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(display)),
        }
    }

    /// Render the counter under the lock
    pub fn render_count(&self, value: u32) {
        self.inner.lock(|d| d.borrow_mut().render_count(value));
    }

    /// Render the time line under the lock
    pub fn render_time(&self, hour: u8, min: u8, sec: u8, label: &str) {
        self.inner
            .lock(|d| d.borrow_mut().render_time(hour, min, sec, label));
    }

    /// Render the link status under the lock
    pub fn render_link(&self, label: &str) {
        self.inner.lock(|d| d.borrow_mut().render_link(label));
    }

    /// Inspect the wrapped device, host tests only
    #[cfg(any(test, feature = "mock"))]
    pub fn with<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        self.inner.lock(|d| f(&d.borrow()))
    }
}

/// HD44780 over a PCF8574 I2C backpack, 4-bit mode
pub struct Hd44780<I2C: I2cInterface, T: TimerInterface> {
    i2c: I2C,
    timer: T,
}

impl<I2C: I2cInterface, T: TimerInterface> Hd44780<I2C, T> {
    /// Create a driver; call [`init`](Self::init) before rendering
    pub fn new(i2c: I2C, timer: T) -> Self {
        Self { i2c, timer }
    }

    fn port_write(&mut self, data: u8) -> Result<()> {
        self.i2c.write(LCD_ADDR, &[data | LCD_BACKLIGHT])
    }

    fn pulse_enable(&mut self, data: u8) -> Result<()> {
        self.port_write(data | LCD_ENABLE)?;
        self.timer.delay_us(500)?;
        self.port_write(data & !LCD_ENABLE)?;
        self.timer.delay_us(100)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<()> {
        self.port_write(nibble)?;
        self.pulse_enable(nibble)
    }

    fn send(&mut self, value: u8, rs: bool) -> Result<()> {
        let rs_bit = if rs { LCD_RS } else { 0 };
        self.write_nibble((value & 0xF0) | rs_bit)?;
        self.write_nibble(((value << 4) & 0xF0) | rs_bit)
    }

    fn command(&mut self, cmd: u8) -> Result<()> {
        self.send(cmd, false)
    }

    fn data(&mut self, byte: u8) -> Result<()> {
        self.send(byte, true)
    }

    /// HD44780 power-on initialization sequence for 4-bit mode
    pub fn init(&mut self) -> Result<()> {
        self.timer.delay_ms(50)?;
        self.write_nibble(0x30)?;
        self.timer.delay_ms(5)?;
        self.write_nibble(0x30)?;
        self.timer.delay_us(200)?;
        self.write_nibble(0x30)?;
        self.timer.delay_ms(5)?;
        self.write_nibble(0x20)?; // 4-bit mode

        self.command(0x28)?; // 2 lines, 5x8 font
        self.command(0x08)?; // display off
        self.clear()?;
        self.command(0x06)?; // entry mode: increment
        self.command(0x0C) // display on, cursor off
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<()> {
        self.command(0x01)?;
        self.timer.delay_ms(2)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<()> {
        let row_offset = if row == 0 { 0x00 } else { 0x40 };
        self.command(0x80 | (col + row_offset))
    }

    fn print(&mut self, s: &str) -> Result<()> {
        for b in s.bytes() {
            self.data(b)?;
        }
        Ok(())
    }

    /// Draw the static frame after init
    pub fn draw_frame(&mut self) -> Result<()> {
        self.set_cursor(0, 0)?;
        self.print("Count: 0")?;
        self.set_cursor(0, 1)?;
        self.print("--:--:--")
    }
}

impl<I2C: I2cInterface, T: TimerInterface> DisplayInterface for Hd44780<I2C, T> {
    fn render_count(&mut self, value: u32) {
        let mut buf: String<16> = String::new();
        let _ = write!(buf, "{}", value);

        // Render is fire-and-forget; a NACK here just skips one frame
        let _ = self.set_cursor(COUNT_COL, 0);
        let _ = self.print("         ");
        let _ = self.set_cursor(COUNT_COL, 0);
        let _ = self.print(&buf);
    }

    fn render_time(&mut self, hour: u8, min: u8, sec: u8, label: &str) {
        let mut buf: String<16> = String::new();
        let _ = write!(buf, "{:02}:{:02}:{:02} {:<7}", hour, min, sec, label);

        let _ = self.set_cursor(0, 1);
        let _ = self.print(&buf);
    }

    fn render_link(&mut self, label: &str) {
        let mut buf: String<16> = String::new();
        let _ = write!(buf, "{:<16}", label);

        let _ = self.set_cursor(0, 1);
        let _ = self.print(&buf);
    }
}

/// Recording display for host tests
#[cfg(any(test, feature = "mock"))]
pub mod recording {
    use super::DisplayInterface;
    use core::cell::RefCell;
    use std::string::String;
    use std::vec::Vec;

    /// Render call log entry
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RenderCall {
        /// render_count(value)
        Count(u32),
        /// render_time(hour, min, sec, label)
        Time(u8, u8, u8, String),
        /// render_link(label)
        Link(String),
    }

    /// Display implementation that records every render call
    #[derive(Debug, Default)]
    pub struct RecordingDisplay {
        calls: RefCell<Vec<RenderCall>>,
    }

    impl RecordingDisplay {
        /// Create an empty recorder
        pub fn new() -> Self {
            Self::default()
        }

        /// All calls so far
        pub fn calls(&self) -> Vec<RenderCall> {
            self.calls.borrow().clone()
        }

        /// Most recent rendered counter value, if any
        pub fn last_count(&self) -> Option<u32> {
            self.calls
                .borrow()
                .iter()
                .rev()
                .find_map(|c| match c {
                    RenderCall::Count(v) => Some(*v),
                    _ => None,
                })
        }
    }

    impl DisplayInterface for RecordingDisplay {
        fn render_count(&mut self, value: u32) {
            self.calls.borrow_mut().push(RenderCall::Count(value));
        }

        fn render_time(&mut self, hour: u8, min: u8, sec: u8, label: &str) {
            self.calls
                .borrow_mut()
                .push(RenderCall::Time(hour, min, sec, label.into()));
        }

        fn render_link(&mut self, label: &str) {
            self.calls.borrow_mut().push(RenderCall::Link(label.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{RecordingDisplay, RenderCall};
    use super::*;
    use crate::platform::mock::{I2cTransaction, MockI2c, MockTimer};

    #[test]
    fn shared_display_serializes_calls() {
        let display = SharedDisplay::new(RecordingDisplay::new());
        display.render_count(5);
        display.render_time(18, 38, 0, "Shift 1");
        display.render_link("link up");

        let calls = display.with(|d| d.calls());
        assert_eq!(
            calls,
            vec![
                RenderCall::Count(5),
                RenderCall::Time(18, 38, 0, "Shift 1".into()),
                RenderCall::Link("link up".into()),
            ]
        );
    }

    #[test]
    fn hd44780_init_talks_to_backpack_only() {
        let mut lcd = Hd44780::new(MockI2c::new(), MockTimer::new());
        lcd.init().unwrap();

        let log = lcd.i2c.transactions();
        assert!(!log.is_empty());
        assert!(log.iter().all(|t| matches!(
            t,
            I2cTransaction::Write { addr: LCD_ADDR, .. }
        )));
    }

    #[test]
    fn hd44780_writes_keep_backlight_on() {
        let mut lcd = Hd44780::new(MockI2c::new(), MockTimer::new());
        lcd.render_count(42);

        for t in lcd.i2c.transactions() {
            if let I2cTransaction::Write { data, .. } = t {
                assert_ne!(data[0] & LCD_BACKLIGHT, 0);
            }
        }
    }
}
