//! Cross-core mailbox
//!
//! Plain shared fields bridging the two execution contexts: the latest
//! pending delivery value and the latest save-request snapshot, each with a
//! presence flag. No queueing; latest value wins.
//!
//! Every field is single-writer/single-reader, so no lock is needed. A
//! missed update is acceptable, a torn read is not: the single-word pending
//! value publishes with a plain release store, and the multi-word save
//! request goes through a single-writer seqlock so the consumer never
//! observes a half-updated record. The overwrite race between a consumer's
//! read and its flag-clear is tolerated by design; the flash always receives
//! the newest value either way.

use core::sync::atomic::{fence, AtomicBool, AtomicU32, Ordering};

/// Snapshot the coordinator asks the store to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRequest {
    /// Counter value to persist
    pub value: u32,
    /// Calendar day (1..=31)
    pub day: u8,
    /// Calendar month (1..=12)
    pub month: u8,
    /// Two-digit year (0..=99)
    pub year: u8,
    /// Hour of day (0..=23)
    pub hour: u8,
}

impl SaveRequest {
    fn pack_stamp(&self) -> u32 {
        u32::from_le_bytes([self.day, self.month, self.year, self.hour])
    }

    fn from_words(value: u32, stamp: u32) -> Self {
        let [day, month, year, hour] = stamp.to_le_bytes();
        Self {
            value,
            day,
            month,
            year,
            hour,
        }
    }
}

/// Cross-core mailbox
///
/// Producer is the pulse coordinator (core 1); consumers are the delivery
/// manager and the counter store (core 0).
pub struct CoreMailbox {
    // Pending delivery: one word plus flag
    delivery_value: AtomicU32,
    delivery_flag: AtomicBool,

    // Save request: seqlock over two words plus flag. Even sequence =
    // stable, odd = write in progress.
    save_seq: AtomicU32,
    save_value: AtomicU32,
    save_stamp: AtomicU32,
    save_flag: AtomicBool,
}

impl CoreMailbox {
    /// Create an empty mailbox
    pub const fn new() -> Self {
        Self {
            delivery_value: AtomicU32::new(0),
            delivery_flag: AtomicBool::new(false),
            save_seq: AtomicU32::new(0),
            save_value: AtomicU32::new(0),
            save_stamp: AtomicU32::new(0),
            save_flag: AtomicBool::new(false),
        }
    }

    /// Publish the newest counter value for delivery (producer side)
    ///
    /// Overwrites any unconfirmed previous value.
    pub fn publish_delivery(&self, value: u32) {
        self.delivery_value.store(value, Ordering::Relaxed);
        self.delivery_flag.store(true, Ordering::Release);
    }

    /// Drop any unconfirmed pending value (producer side, shift reset)
    pub fn clear_delivery(&self) {
        self.delivery_flag.store(false, Ordering::Release);
    }

    /// Peek the pending delivery value without consuming it (consumer side)
    pub fn pending_delivery(&self) -> Option<u32> {
        if self.delivery_flag.load(Ordering::Acquire) {
            Some(self.delivery_value.load(Ordering::Acquire))
        } else {
            None
        }
    }

    /// Mark the pending value delivered (consumer side)
    ///
    /// If the producer overwrote the value since the consumer read it, the
    /// newer value is lost from the delivery path until the next pulse; the
    /// next pulse republishes a strictly larger value, so this is accepted.
    pub fn confirm_delivery(&self) {
        self.delivery_flag.store(false, Ordering::Release);
    }

    /// Publish a save request (producer side)
    ///
    /// Single writer: only the coordinator calls this.
    pub fn publish_save(&self, req: SaveRequest) {
        let seq = self.save_seq.load(Ordering::Relaxed);
        self.save_seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        self.save_value.store(req.value, Ordering::Relaxed);
        self.save_stamp.store(req.pack_stamp(), Ordering::Relaxed);
        self.save_seq.store(seq.wrapping_add(2), Ordering::Release);
        self.save_flag.store(true, Ordering::Release);
    }

    /// Consume the latest save request, if any (consumer side)
    ///
    /// Clears the flag after reading. A concurrent overwrite between the
    /// read and the clear persists the newer snapshot under this request,
    /// which is the intended latest-wins behavior.
    pub fn take_save_request(&self) -> Option<SaveRequest> {
        if !self.save_flag.load(Ordering::Acquire) {
            return None;
        }

        let req = loop {
            let begin = self.save_seq.load(Ordering::Acquire);
            if begin & 1 != 0 {
                // Write in progress on the other core
                core::hint::spin_loop();
                continue;
            }
            let value = self.save_value.load(Ordering::Relaxed);
            let stamp = self.save_stamp.load(Ordering::Relaxed);
            fence(Ordering::Acquire);
            let end = self.save_seq.load(Ordering::Relaxed);
            if begin == end {
                break SaveRequest::from_words(value, stamp);
            }
        };

        self.save_flag.store(false, Ordering::Release);
        Some(req)
    }
}

impl Default for CoreMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// The one mailbox instance shared by both cores
pub static MAILBOX: CoreMailbox = CoreMailbox::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_starts_empty() {
        let mb = CoreMailbox::new();
        assert_eq!(mb.pending_delivery(), None);
    }

    #[test]
    fn delivery_latest_wins() {
        let mb = CoreMailbox::new();
        mb.publish_delivery(1);
        mb.publish_delivery(2);
        mb.publish_delivery(3);

        assert_eq!(mb.pending_delivery(), Some(3));
        mb.confirm_delivery();
        assert_eq!(mb.pending_delivery(), None);
    }

    #[test]
    fn clear_delivery_drops_unconfirmed_value() {
        let mb = CoreMailbox::new();
        mb.publish_delivery(7);
        mb.clear_delivery();
        assert_eq!(mb.pending_delivery(), None);
    }

    #[test]
    fn save_request_roundtrip() {
        let mb = CoreMailbox::new();
        let req = SaveRequest {
            value: 42,
            day: 29,
            month: 2,
            year: 24,
            hour: 23,
        };
        mb.publish_save(req);

        assert_eq!(mb.take_save_request(), Some(req));
        // Consumed: flag cleared
        assert_eq!(mb.take_save_request(), None);
    }

    #[test]
    fn save_request_overwrite_keeps_newest() {
        let mb = CoreMailbox::new();
        mb.publish_save(SaveRequest {
            value: 1,
            day: 1,
            month: 1,
            year: 24,
            hour: 8,
        });
        mb.publish_save(SaveRequest {
            value: 9,
            day: 1,
            month: 1,
            year: 24,
            hour: 9,
        });

        let got = mb.take_save_request().unwrap();
        assert_eq!(got.value, 9);
        assert_eq!(got.hour, 9);
    }

    #[test]
    fn stamp_packing_roundtrip() {
        let req = SaveRequest {
            value: 123,
            day: 31,
            month: 12,
            year: 99,
            hour: 23,
        };
        let unpacked = SaveRequest::from_words(req.value, req.pack_stamp());
        assert_eq!(unpacked, req);
    }
}
