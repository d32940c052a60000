//! RP2350 flash implementation
//!
//! The checkpoint region is the last erase sector of the 4 MB XIP flash,
//! well clear of the firmware image. All addresses on the
//! [`FlashInterface`] are region-relative; this module maps them to
//! absolute flash offsets.
//!
//! Program and erase stall XIP, so the other core must not fetch from
//! flash while they run. The lockout here is a request/acknowledge pair of
//! atomics: the storage core raises the request and waits, the sensor core
//! parks itself in a RAM-resident spin loop with interrupts masked until
//! the request drops.

use crate::platform::{
    error::{FlashError, PlatformError},
    traits::{CoreLockout, FlashInterface, LockoutGuard},
    Result,
};
use core::sync::atomic::{AtomicBool, Ordering};
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;

/// Total XIP flash size on the Pico 2 W
pub const FLASH_SIZE: usize = 4 * 1024 * 1024;

/// One flash page
const PAGE_SIZE: u32 = 256;

/// One erase sector, the whole checkpoint region
const REGION_SIZE: u32 = 4096;

/// Absolute offset of the checkpoint region (last sector)
pub const STORAGE_OFFSET: u32 = FLASH_SIZE as u32 - REGION_SIZE;

static PAUSE_REQ: AtomicBool = AtomicBool::new(false);
static PAUSE_ACK: AtomicBool = AtomicBool::new(false);

/// Checkpoint-region view of the on-chip flash
pub struct Rp2350Flash<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
}

impl<'d> Rp2350Flash<'d> {
    /// Wrap the flash peripheral
    pub fn new(flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }

    fn check_range(&self, addr: u32, len: u32) -> Result<()> {
        if addr.checked_add(len).map_or(true, |end| end > REGION_SIZE) {
            return Err(PlatformError::Flash(FlashError::InvalidAddress));
        }
        Ok(())
    }
}

impl<'d> FlashInterface for Rp2350Flash<'d> {
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.check_range(addr, buf.len() as u32)?;
        self.flash
            .blocking_read(STORAGE_OFFSET + addr, buf)
            .map_err(map_flash_error)
    }

    fn program(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.check_range(addr, data.len() as u32)?;
        if addr % PAGE_SIZE != 0 {
            return Err(PlatformError::Flash(FlashError::Unaligned));
        }
        self.flash
            .blocking_write(STORAGE_OFFSET + addr, data)
            .map_err(map_flash_error)
    }

    fn erase_region(&mut self, addr: u32) -> Result<()> {
        if addr != 0 {
            return Err(PlatformError::Flash(FlashError::InvalidAddress));
        }
        self.flash
            .blocking_erase(STORAGE_OFFSET, STORAGE_OFFSET + REGION_SIZE)
            .map_err(map_flash_error)
    }

    fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    fn region_size(&self) -> u32 {
        REGION_SIZE
    }
}

fn map_flash_error(e: embassy_rp::flash::Error) -> PlatformError {
    use embassy_rp::flash::Error;
    match e {
        Error::OutOfBounds => PlatformError::Flash(FlashError::InvalidAddress),
        Error::Unaligned => PlatformError::Flash(FlashError::Unaligned),
        _ => PlatformError::Flash(FlashError::OperationFailed),
    }
}

/// Quiesce handle for the sensor core
///
/// Held by the storage core; [`pause`](CoreLockout::pause) returns only
/// once the sensor core has parked in [`lockout_point`].
pub struct Rp2350Lockout;

impl CoreLockout for Rp2350Lockout {
    fn pause(&mut self) -> LockoutGuard<'_, Self> {
        PAUSE_REQ.store(true, Ordering::SeqCst);
        while !PAUSE_ACK.load(Ordering::SeqCst) {
            core::hint::spin_loop();
        }
        LockoutGuard::new(self)
    }

    fn resume(&mut self) {
        PAUSE_REQ.store(false, Ordering::SeqCst);
        while PAUSE_ACK.load(Ordering::SeqCst) {
            core::hint::spin_loop();
        }
    }
}

/// Sensor-core side of the lockout, called once per polling iteration
///
/// Runs from RAM with interrupts masked so the core makes no flash fetch
/// while the other core erases or programs.
#[inline(never)]
#[link_section = ".data.ram_func"]
pub fn lockout_point() {
    if !PAUSE_REQ.load(Ordering::SeqCst) {
        return;
    }
    critical_section::with(|_| {
        PAUSE_ACK.store(true, Ordering::SeqCst);
        while PAUSE_REQ.load(Ordering::SeqCst) {
            core::hint::spin_loop();
        }
        PAUSE_ACK.store(false, Ordering::SeqCst);
    });
}
