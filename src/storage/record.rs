//! Checkpoint record layout
//!
//! One record occupies one flash page. The header is 16 bytes of
//! little-endian fields followed by a CRC-32 over exactly those bytes; the
//! rest of the page stays at the erased fill value.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ magic:   u32 = 0xA5A5_5A5A    │  Offset: 0
//! ├───────────────────────────────┤
//! │ seq:     u32                  │  Offset: 4
//! ├───────────────────────────────┤
//! │ counter: u32                  │  Offset: 8
//! ├───────────────────────────────┤
//! │ day, month, year, hour: u8×4  │  Offset: 12
//! ├───────────────────────────────┤
//! │ crc:     u32 (over bytes 0-15)│  Offset: 16
//! ├───────────────────────────────┤
//! │ 0xFF fill to end of page      │  Offset: 20
//! └───────────────────────────────┘
//! ```

use crc::{Crc, CRC_32_ISO_HDLC};

/// Magic word marking a programmed record
pub const RECORD_MAGIC: u32 = 0xA5A5_5A5A;

/// Magic word of an erased (free) slot
pub const ERASED_MAGIC: u32 = 0xFFFF_FFFF;

/// Header length covered by the checksum
pub const HEADER_LEN: usize = 16;

/// Header plus checksum
pub const RECORD_LEN: usize = HEADER_LEN + 4;

/// CRC-32/ISO-HDLC: reflected polynomial 0xEDB88320, init 0xFFFFFFFF,
/// xorout 0xFFFFFFFF
const CHECKSUM: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// One persisted counter checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterRecord {
    /// Monotonically increasing record identifier; max over valid records
    /// selects the latest
    pub seq: u32,
    /// Counter value at checkpoint time
    pub counter: u32,
    /// Calendar day (1..=31)
    pub day: u8,
    /// Calendar month (1..=12)
    pub month: u8,
    /// Two-digit year (0..=99)
    pub year: u8,
    /// Hour of day (0..=23)
    pub hour: u8,
}

impl CounterRecord {
    /// Encode into a page buffer
    ///
    /// The buffer must be pre-filled with 0xFF and at least [`RECORD_LEN`]
    /// bytes long.
    pub fn encode(&self, page: &mut [u8]) {
        page[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
        page[4..8].copy_from_slice(&self.seq.to_le_bytes());
        page[8..12].copy_from_slice(&self.counter.to_le_bytes());
        page[12] = self.day;
        page[13] = self.month;
        page[14] = self.year;
        page[15] = self.hour;

        let crc = CHECKSUM.checksum(&page[..HEADER_LEN]);
        page[HEADER_LEN..RECORD_LEN].copy_from_slice(&crc.to_le_bytes());
    }

    /// Decode from a page buffer, validating magic and checksum
    ///
    /// Returns `None` for erased, torn, or corrupted slots; callers skip
    /// them silently.
    pub fn decode(page: &[u8]) -> Option<Self> {
        if page.len() < RECORD_LEN {
            return None;
        }

        let magic = u32::from_le_bytes([page[0], page[1], page[2], page[3]]);
        if magic != RECORD_MAGIC {
            return None;
        }

        let stored_crc = u32::from_le_bytes([
            page[HEADER_LEN],
            page[HEADER_LEN + 1],
            page[HEADER_LEN + 2],
            page[HEADER_LEN + 3],
        ]);
        if CHECKSUM.checksum(&page[..HEADER_LEN]) != stored_crc {
            return None;
        }

        Some(Self {
            seq: u32::from_le_bytes([page[4], page[5], page[6], page[7]]),
            counter: u32::from_le_bytes([page[8], page[9], page[10], page[11]]),
            day: page[12],
            month: page[13],
            year: page[14],
            hour: page[15],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CounterRecord {
        CounterRecord {
            seq: 7,
            counter: 1234,
            day: 29,
            month: 2,
            year: 24,
            hour: 23,
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut page = [0xFFu8; 256];
        sample().encode(&mut page);

        assert_eq!(CounterRecord::decode(&page), Some(sample()));
        // Filler stays erased
        assert!(page[RECORD_LEN..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn erased_page_decodes_to_none() {
        let page = [0xFFu8; 256];
        assert_eq!(CounterRecord::decode(&page), None);
    }

    #[test]
    fn any_header_bit_flip_invalidates() {
        let mut reference = [0xFFu8; 256];
        sample().encode(&mut reference);

        for byte in 0..HEADER_LEN {
            for bit in 0..8 {
                let mut page = reference;
                page[byte] ^= 1 << bit;
                assert_eq!(
                    CounterRecord::decode(&page),
                    None,
                    "flip at byte {} bit {} survived validation",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn crc_matches_reference_vector() {
        // CRC-32/ISO-HDLC of "123456789" is 0xCBF43926
        assert_eq!(CHECKSUM.checksum(b"123456789"), 0xCBF4_3926);
    }
}
