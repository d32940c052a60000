//! Mock flash and lockout implementations for testing
//!
//! Provides an in-memory flash region plus a quiesce-barrier stand-in that
//! tracks pause/resume pairing.

use crate::platform::{
    error::FlashError,
    traits::{CoreLockout, FlashInterface, LockoutGuard},
    Result,
};
use core::cell::RefCell;
use std::vec::Vec;

/// Program page size (RP2350 QSPI flash page)
const PAGE_SIZE: u32 = 256;

/// Erasable region size (one 4 KB sector)
const REGION_SIZE: u32 = 4096;

/// Mock flash implementation
///
/// Simulates one erasable checkpoint region in memory. Supports:
/// - Read/program/erase with real flash semantics (writes only clear bits)
/// - Corruption injection for testing checksum recovery
/// - Erase count tracking
/// - Power-loss simulation (partial page program)
#[derive(Debug)]
pub struct MockFlash {
    /// Region contents (initialized to 0xFF, the erased state)
    storage: RefCell<Vec<u8>>,
    /// Number of region erases performed
    erase_count: RefCell<u32>,
    /// Simulated power loss flag
    power_loss: RefCell<bool>,
}

impl MockFlash {
    /// Create a new mock flash with a fully erased region
    pub fn new() -> Self {
        Self {
            storage: RefCell::new(vec![0xFF; REGION_SIZE as usize]),
            erase_count: RefCell::new(0),
            power_loss: RefCell::new(false),
        }
    }

    /// Get region contents (for test verification)
    pub fn contents(&self, address: u32, len: usize) -> Vec<u8> {
        let storage = self.storage.borrow();
        storage[address as usize..(address as usize + len)].to_vec()
    }

    /// Flip one bit at `address` (for testing checksum rejection)
    pub fn flip_bit(&mut self, address: u32, bit: u8) {
        let mut storage = self.storage.borrow_mut();
        storage[address as usize] ^= 1 << bit;
    }

    /// Overwrite bytes directly, bypassing flash semantics
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        let mut storage = self.storage.borrow_mut();
        for i in 0..len {
            storage[address as usize + i] = 0xAA;
        }
    }

    /// Number of region erases performed so far
    pub fn erase_count(&self) -> u32 {
        *self.erase_count.borrow()
    }

    /// Make the next program call write only half its data, simulating a
    /// power loss mid-operation
    pub fn simulate_power_loss(&mut self) {
        *self.power_loss.borrow_mut() = true;
    }

    fn in_region(&self, address: u32, len: usize) -> bool {
        (address as usize + len) <= REGION_SIZE as usize
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if !self.in_region(address, buf.len()) {
            return Err(FlashError::InvalidAddress.into());
        }

        let storage = self.storage.borrow();
        buf.copy_from_slice(&storage[address as usize..(address as usize + buf.len())]);
        Ok(())
    }

    fn program(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.in_region(address, data.len()) {
            return Err(FlashError::InvalidAddress.into());
        }
        if !address.is_multiple_of(PAGE_SIZE) {
            return Err(FlashError::Unaligned.into());
        }

        let write_len = if *self.power_loss.borrow() {
            *self.power_loss.borrow_mut() = false;
            data.len() / 2
        } else {
            data.len()
        };

        // Flash can only move bits 1 -> 0
        let mut storage = self.storage.borrow_mut();
        for i in 0..write_len {
            storage[address as usize + i] &= data[i];
        }
        Ok(())
    }

    fn erase_region(&mut self, address: u32) -> Result<()> {
        if address != 0 {
            return Err(FlashError::InvalidAddress.into());
        }

        let mut storage = self.storage.borrow_mut();
        storage.fill(0xFF);
        *self.erase_count.borrow_mut() += 1;
        Ok(())
    }

    fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    fn region_size(&self) -> u32 {
        REGION_SIZE
    }
}

/// Mock quiesce barrier
///
/// Counts pause/resume calls so tests can assert the pairing stays balanced
/// across error paths.
#[derive(Debug, Default)]
pub struct MockLockout {
    pauses: u32,
    resumes: u32,
}

impl MockLockout {
    /// Create a new mock lockout
    pub fn new() -> Self {
        Self::default()
    }

    /// Total pause calls observed
    pub fn pauses(&self) -> u32 {
        self.pauses
    }

    /// True if every pause has been matched by a resume
    pub fn is_balanced(&self) -> bool {
        self.pauses == self.resumes
    }
}

impl CoreLockout for MockLockout {
    fn pause(&mut self) -> LockoutGuard<'_, Self> {
        self.pauses += 1;
        LockoutGuard::new(self)
    }

    fn resume(&mut self) {
        self.resumes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_program_roundtrip() {
        let mut flash = MockFlash::new();

        let data = [0xA5, 0x5A, 0x01, 0x02];
        let mut page = [0xFFu8; PAGE_SIZE as usize];
        page[..4].copy_from_slice(&data);
        flash.program(0, &page).unwrap();

        let mut buf = [0u8; 4];
        flash.read(0, &mut buf).unwrap();
        assert_eq!(buf, data);
    }

    #[test]
    fn erase_resets_to_ff() {
        let mut flash = MockFlash::new();
        flash.program(0, &[0x55; PAGE_SIZE as usize]).unwrap();
        flash.erase_region(0).unwrap();

        assert!(flash.contents(0, 256).iter().all(|&b| b == 0xFF));
        assert_eq!(flash.erase_count(), 1);
    }

    #[test]
    fn program_only_clears_bits() {
        let mut flash = MockFlash::new();

        let mut page = [0xFFu8; PAGE_SIZE as usize];
        page[0] = 0x0F;
        flash.program(0, &page).unwrap();

        // A second program cannot set bits back
        page[0] = 0xF0;
        flash.program(0, &page).unwrap();

        let mut buf = [0u8; 1];
        flash.read(0, &mut buf).unwrap();
        assert_eq!(buf[0], 0x00);
    }

    #[test]
    fn unaligned_program_rejected() {
        let mut flash = MockFlash::new();
        assert!(flash.program(100, &[0u8; 4]).is_err());
    }

    #[test]
    fn power_loss_writes_half() {
        let mut flash = MockFlash::new();
        flash.simulate_power_loss();
        flash.program(0, &[0x55; PAGE_SIZE as usize]).unwrap();

        let contents = flash.contents(0, PAGE_SIZE as usize);
        assert!(contents[..128].iter().all(|&b| b == 0x55));
        assert!(contents[128..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn lockout_guard_balances_on_drop() {
        let mut lockout = MockLockout::new();
        {
            let _guard = lockout.pause();
        }
        assert_eq!(lockout.pauses(), 1);
        assert!(lockout.is_balanced());
    }
}
