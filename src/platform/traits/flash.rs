//! Flash interface traits
//!
//! Defines the flash access interface plus the cross-core quiesce barrier
//! required around erase/program operations.
//!
//! On the RP2350 both cores execute code from the same QSPI flash (XIP).
//! While a sector erase or page program is in progress the flash is not
//! addressable, so the *other* core must be fully paused, not merely locked
//! out of a shared resource. `CoreLockout` models that barrier; the RAII
//! [`LockoutGuard`] guarantees the paired resume runs on every exit path,
//! including early error returns.

use crate::platform::Result;

/// Flash interface trait
///
/// Platform implementations must provide this interface for raw flash access.
/// Addresses are offsets into the managed flash region.
///
/// # Safety Invariants
///
/// - Writes only clear bits (1 -> 0); an erase is required to set bits back
/// - Erase granularity is `region_size()`, program granularity is `page_size()`
/// - Erase/program must only run while the opposite core is held by a
///   [`LockoutGuard`]
pub trait FlashInterface {
    /// Read `buf.len()` bytes starting at `address`
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Program one page at `address` (must be page-aligned)
    fn program(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase the whole region starting at `address` (must be region-aligned)
    fn erase_region(&mut self, address: u32) -> Result<()>;

    /// Program page size in bytes
    fn page_size(&self) -> u32;

    /// Erasable region size in bytes
    fn region_size(&self) -> u32;
}

/// Cross-core quiesce barrier
///
/// `pause()` returns a guard; the other core stays parked (and local
/// interrupts stay disabled on the target implementation) until the guard is
/// dropped.
pub trait CoreLockout {
    /// Park the opposite core and disable local interrupts
    fn pause(&mut self) -> LockoutGuard<'_, Self>
    where
        Self: Sized;

    /// Resume the opposite core. Called by [`LockoutGuard::drop`]; not part
    /// of the public API surface.
    fn resume(&mut self);
}

/// RAII guard holding the opposite core paused
///
/// Dropping the guard resumes the paused core. Holding the guard for the
/// minimum span of one erase or program call keeps the pause bounded.
pub struct LockoutGuard<'a, L: CoreLockout> {
    lockout: &'a mut L,
}

impl<'a, L: CoreLockout> LockoutGuard<'a, L> {
    /// Create a guard for an already-paused lockout
    pub fn new(lockout: &'a mut L) -> Self {
        Self { lockout }
    }
}

impl<L: CoreLockout> Drop for LockoutGuard<'_, L> {
    fn drop(&mut self) {
        self.lockout.resume();
    }
}
