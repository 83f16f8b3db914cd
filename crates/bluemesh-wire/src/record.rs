use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ensure_len, Result, WireError};
use crate::kinds::{config_type_name, RESERVED};

/// Record header: type (1) + reserved (1) + length (2) = 4 bytes.
pub const RECORD_HEADER_SIZE: usize = 4;

/// A device configuration record, read from or written to a configuration
/// characteristic.
///
/// ```text
/// ┌──────────┬──────────────┬──────────────┬──────────────────┐
/// │ Type (1B)│ Reserved (1B)│ Length (2B LE)│ Payload (Length) │
/// └──────────┴──────────────┴──────────────┴──────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    /// Configuration type; selects the payload layout (see [`crate::kinds`]).
    pub kind: u8,
    /// Declared payload length. Must equal `payload.len()` to encode.
    pub length: u16,
    pub payload: Bytes,
}

impl ConfigRecord {
    /// Create a record whose length field matches the payload.
    pub fn new(kind: u8, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        let length = u16::try_from(payload.len()).map_err(|_| WireError::PayloadTooLarge {
            size: payload.len(),
            max: u16::MAX as usize,
        })?;
        Ok(Self {
            kind,
            length,
            payload,
        })
    }

    /// Decode a record. The reserved byte is skipped without validation and
    /// bytes past the declared payload are ignored.
    pub fn decode(src: &[u8]) -> Result<Self> {
        ensure_len(src, RECORD_HEADER_SIZE)?;

        let kind = src[0];
        let length = u16::from_le_bytes([src[2], src[3]]);
        let end = RECORD_HEADER_SIZE + usize::from(length);
        ensure_len(src, end)?;

        tracing::debug!(
            kind,
            name = config_type_name(kind),
            length,
            trailing = src.len() - end,
            "decoded config record"
        );
        Ok(Self {
            kind,
            length,
            payload: Bytes::copy_from_slice(&src[RECORD_HEADER_SIZE..end]),
        })
    }

    pub fn encode(&self) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        self.encode_to(&mut dst)?;
        Ok(dst.freeze())
    }

    pub fn encode_to(&self, dst: &mut BytesMut) -> Result<()> {
        if usize::from(self.length) != self.payload.len() {
            return Err(WireError::InvalidLength {
                expected: self.payload.len(),
                actual: usize::from(self.length),
            });
        }
        dst.reserve(self.wire_size());
        dst.put_u8(self.kind);
        dst.put_u8(RESERVED);
        dst.put_u16_le(self.length);
        dst.put_slice(&self.payload);
        Ok(())
    }

    pub fn wire_size(&self) -> usize {
        RECORD_HEADER_SIZE + self.payload.len()
    }

    /// Payload read as an unsigned little-endian integer, for 1, 2 and 4 byte
    /// values.
    pub fn value(&self) -> Option<u32> {
        match self.payload[..] {
            [a] => Some(u32::from(a)),
            [a, b] => Some(u32::from(u16::from_le_bytes([a, b]))),
            [a, b, c, d] => Some(u32::from_le_bytes([a, b, c, d])),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{CONFIG_TYPE_NAME, CONFIG_TYPE_TX_POWER};

    #[test]
    fn encode_layout() {
        let record = ConfigRecord::new(CONFIG_TYPE_NAME, Bytes::from_static(b"crown")).unwrap();
        let wire = record.encode().unwrap();
        assert_eq!(wire.as_ref(), b"\x00\x00\x05\x00crown");
        assert_eq!(wire.len(), RECORD_HEADER_SIZE + 5);
    }

    #[test]
    fn roundtrip() {
        let record = ConfigRecord::new(0x0B, vec![0xF8]).unwrap();
        assert_eq!(ConfigRecord::decode(&record.encode().unwrap()).unwrap(), record);
    }

    #[test]
    fn reserved_byte_not_validated() {
        let record = ConfigRecord::decode(&[0x02, 0x7F, 0x01, 0x00, 0x09]).unwrap();
        assert_eq!(record.kind, 0x02);
        assert_eq!(record.payload.as_ref(), &[0x09]);
        // Re-encoding normalises the reserved byte.
        assert_eq!(record.encode().unwrap().as_ref(), &[0x02, 0x00, 0x01, 0x00, 0x09]);
    }

    #[test]
    fn decode_too_short_header() {
        for len in 0..RECORD_HEADER_SIZE {
            let err = ConfigRecord::decode(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, WireError::TooShort { needed: 4, .. }));
        }
    }

    #[test]
    fn decode_too_short_payload() {
        let err = ConfigRecord::decode(&[0x01, 0x00, 0x04, 0x00, 1, 2]).unwrap_err();
        assert!(matches!(err, WireError::TooShort { needed: 8, actual: 6 }));
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let record = ConfigRecord::decode(&[0x01, 0x00, 0x01, 0x00, 7, 8, 9]).unwrap();
        assert_eq!(record.payload.as_ref(), &[7]);
    }

    #[test]
    fn encode_rejects_inconsistent_length() {
        let record = ConfigRecord {
            kind: 1,
            length: 3,
            payload: Bytes::from_static(&[1]),
        };
        assert!(matches!(
            record.encode(),
            Err(WireError::InvalidLength {
                expected: 1,
                actual: 3
            })
        ));
    }

    #[test]
    fn integer_values() {
        let tx = ConfigRecord::new(CONFIG_TYPE_TX_POWER, vec![0x04]).unwrap();
        assert_eq!(tx.value(), Some(4));
        let short = ConfigRecord::new(1, vec![0x34, 0x12]).unwrap();
        assert_eq!(short.value(), Some(0x1234));
        let int = ConfigRecord::new(1, vec![1, 0, 0, 0x80]).unwrap();
        assert_eq!(int.value(), Some(0x8000_0001));
        let odd = ConfigRecord::new(1, vec![1, 2, 3]).unwrap();
        assert_eq!(odd.value(), None);
    }
}
