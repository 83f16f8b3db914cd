use bytes::{BufMut, Bytes, BytesMut};

use crate::address::{Address, ADDRESS_SIZE};
use crate::config::WireConfig;
use crate::error::{ensure_len, Result, WireError};
use crate::frame::check_declared_length;
use crate::kinds::RESERVED;

/// Command header: channel (1) + reserved (1) + length (2) + target (6) + type (2).
pub const COMMAND_HEADER_SIZE: usize = 12;

/// Bytes counted by the length field besides the payload: target + type.
const COUNTED_HEADER: usize = ADDRESS_SIZE + 2;

/// A message written to the mesh characteristic for delivery into the mesh.
///
/// ```text
/// ┌─────────┬──────────┬─────────────┬───────────────────┬───────────┬─────────┐
/// │ Channel │ Reserved │ Length (2B) │ Target (6B, rev.) │ Type (2B) │ Payload │
/// └─────────┴──────────┴─────────────┴───────────────────┴───────────┴─────────┘
/// ```
///
/// Length covers target, type and payload. Every node forwards the message;
/// only the target processes it, or every node when the target is
/// [`Address::BROADCAST`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshCommand {
    pub channel: u8,
    pub target: Address,
    pub message_type: u16,
    pub payload: Bytes,
}

impl MeshCommand {
    pub fn new(
        channel: u8,
        target: Address,
        message_type: u16,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            channel,
            target,
            message_type,
            payload: payload.into(),
        }
    }

    pub fn decode(src: &[u8]) -> Result<Self> {
        decode_command(src, &WireConfig::default())
    }

    pub fn encode(&self) -> Result<Bytes> {
        let length = u16::try_from(COUNTED_HEADER + self.payload.len()).map_err(|_| {
            WireError::PayloadTooLarge {
                size: self.payload.len(),
                max: u16::MAX as usize - COUNTED_HEADER,
            }
        })?;

        let mut dst = BytesMut::with_capacity(COMMAND_HEADER_SIZE + self.payload.len());
        dst.put_u8(self.channel);
        dst.put_u8(RESERVED);
        dst.put_u16_le(length);
        self.target.put(&mut dst);
        dst.put_u16_le(self.message_type);
        dst.put_slice(&self.payload);
        Ok(dst.freeze())
    }

    pub fn is_broadcast(&self) -> bool {
        self.target.is_broadcast()
    }
}

/// Decode a mesh command; the length field is checked per `config.length_policy`.
pub fn decode_command(src: &[u8], config: &WireConfig) -> Result<MeshCommand> {
    ensure_len(src, COMMAND_HEADER_SIZE)?;

    let channel = src[0];
    let length = usize::from(u16::from_le_bytes([src[2], src[3]]));
    let target = Address::decode(&src[4..4 + ADDRESS_SIZE])?;
    let message_type = u16::from_le_bytes([src[10], src[11]]);
    let payload = &src[COMMAND_HEADER_SIZE..];

    check_declared_length(length, COUNTED_HEADER + payload.len(), config.length_policy)?;

    tracing::debug!(channel, target = %target, message_type, "decoded mesh command");
    Ok(MeshCommand {
        channel,
        target,
        message_type,
        payload: Bytes::copy_from_slice(payload),
    })
}
