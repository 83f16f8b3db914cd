use bytes::{BufMut, Bytes, BytesMut};

use crate::config::{LengthPolicy, WireConfig, MAX_DATA_LENGTH};
use crate::error::{ensure_len, Result, WireError};

/// Envelope header: opcode (1) + handle (2) + data length (1) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// The outer envelope wrapping all mesh traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u8,
    pub handle: u16,
    /// Declared data length. Written verbatim by the encoder; may disagree with
    /// `data.len()` for frames decoded under [`LengthPolicy::Permissive`].
    pub data_length: u8,
    pub data: Bytes,
}

impl Frame {
    /// Create a frame whose declared length matches its data.
    pub fn new(opcode: u8, handle: u16, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let data_length = data_length_of(data.len())?;
        Ok(Self {
            opcode,
            handle,
            data_length,
            data,
        })
    }

    /// Decode an envelope, treating every byte after the header as data.
    pub fn decode(src: &[u8]) -> Result<Self> {
        decode_frame(src, &WireConfig::default())
    }

    /// Encode this frame into a fresh buffer.
    pub fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        encode_frame(self, &mut dst);
        dst.freeze()
    }

    /// The total wire size of this frame (header + data).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }

    /// True when the declared length equals the carried data.
    pub fn is_length_consistent(&self) -> bool {
        usize::from(self.data_length) == self.data.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬────────────┬──────────────┬──────────────────┐
/// │ Opcode (1B)│ Handle     │ DataLength   │ Data             │
/// │            │ (2B LE)    │ (1B)         │ (variable)       │
/// └────────────┴────────────┴──────────────┴──────────────────┘
/// ```
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    dst.reserve(frame.wire_size());
    dst.put_u8(frame.opcode);
    dst.put_u16_le(frame.handle);
    dst.put_u8(frame.data_length);
    dst.put_slice(&frame.data);
}

/// Decode one envelope occupying the whole of `src`.
///
/// Under [`LengthPolicy::Permissive`] the declared length is read but does not
/// bound the data; under [`LengthPolicy::Strict`] a mismatch is `Malformed`.
pub fn decode_frame(src: &[u8], config: &WireConfig) -> Result<Frame> {
    ensure_len(src, HEADER_SIZE)?;

    let opcode = src[0];
    let handle = u16::from_le_bytes([src[1], src[2]]);
    let data_length = src[3];
    let data = &src[HEADER_SIZE..];

    check_declared_length(usize::from(data_length), data.len(), config.length_policy)?;

    tracing::debug!(opcode, handle, data_length, data_len = data.len(), "decoded frame");
    Ok(Frame {
        opcode,
        handle,
        data_length,
        data: Bytes::copy_from_slice(data),
    })
}

/// Converts a data section size into the one-byte length field.
pub(crate) fn data_length_of(len: usize) -> Result<u8> {
    u8::try_from(len).map_err(|_| WireError::PayloadTooLarge {
        size: len,
        max: MAX_DATA_LENGTH,
    })
}

pub(crate) fn check_declared_length(
    declared: usize,
    actual: usize,
    policy: LengthPolicy,
) -> Result<()> {
    if declared == actual {
        return Ok(());
    }
    match policy {
        LengthPolicy::Strict => Err(WireError::Malformed(format!(
            "declared length {declared} but {actual} bytes follow the header"
        ))),
        LengthPolicy::Permissive => {
            tracing::warn!(declared, actual, "declared length mismatch tolerated");
            Ok(())
        }
    }
}
