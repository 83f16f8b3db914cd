use bytes::{BufMut, Bytes, BytesMut};

use crate::address::{Address, ADDRESS_SIZE};
use crate::config::WireConfig;
use crate::error::{Result, WireError};
use crate::frame::{self, Frame};
use crate::kinds::SCAN_MESSAGE;
use crate::scan::ScanResult;

/// Hub header inside the envelope data: source address (6) + message type (2).
pub const HUB_HEADER_SIZE: usize = ADDRESS_SIZE + 2;

/// Smallest complete hub message on the wire: envelope header + hub header.
pub const MIN_HUB_WIRE_SIZE: usize = frame::HEADER_SIZE + HUB_HEADER_SIZE;

/// A mesh message relayed through the hub, nested inside a [`Frame`].
///
/// ```text
/// envelope.data = ┌───────────────────┬──────────────┬─────────────┐
///                 │ Source (6B, rev.) │ Type (2B LE) │ Payload     │
///                 └───────────────────┴──────────────┴─────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubMessage {
    pub opcode: u8,
    pub handle: u16,
    /// Originating node. [`Address::BROADCAST`] addresses every node.
    pub source: Address,
    pub message_type: u16,
    pub payload: Bytes,
}

/// Payload of a hub message interpreted by its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubBody {
    ScanResult(ScanResult),
    Raw { message_type: u16, payload: Bytes },
}

impl HubMessage {
    pub fn new(
        opcode: u8,
        handle: u16,
        source: Address,
        message_type: u16,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            opcode,
            handle,
            source,
            message_type,
            payload: payload.into(),
        }
    }

    /// Build a scan-result message.
    pub fn scan_result(
        opcode: u8,
        handle: u16,
        source: Address,
        result: &ScanResult,
    ) -> Result<Self> {
        Ok(Self::new(opcode, handle, source, SCAN_MESSAGE, result.encode()?))
    }

    /// Decode a hub message from a complete envelope.
    pub fn decode(src: &[u8]) -> Result<Self> {
        decode_hub_message(src, &WireConfig::default())
    }

    /// Parse the nested hub record out of an already-decoded envelope.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let data = frame.data.as_ref();
        if data.len() < HUB_HEADER_SIZE {
            return Err(WireError::TooShort {
                needed: MIN_HUB_WIRE_SIZE,
                actual: frame::HEADER_SIZE + data.len(),
            });
        }

        let source = Address::decode(&data[..ADDRESS_SIZE])?;
        let message_type = u16::from_le_bytes([data[ADDRESS_SIZE], data[ADDRESS_SIZE + 1]]);
        let payload = frame.data.slice(HUB_HEADER_SIZE..);

        Ok(Self {
            opcode: frame.opcode,
            handle: frame.handle,
            source,
            message_type,
            payload,
        })
    }

    /// Wrap this message in an envelope whose declared length matches its data.
    pub fn to_frame(&self) -> Result<Frame> {
        let mut data = BytesMut::with_capacity(HUB_HEADER_SIZE + self.payload.len());
        self.source.put(&mut data);
        data.put_u16_le(self.message_type);
        data.put_slice(&self.payload);
        Frame::new(self.opcode, self.handle, data.freeze())
    }

    /// Encode into a complete envelope.
    pub fn encode(&self) -> Result<Bytes> {
        Ok(self.to_frame()?.encode())
    }

    pub fn is_broadcast(&self) -> bool {
        self.source.is_broadcast()
    }

    /// Interpret the payload according to the message type.
    pub fn body(&self) -> Result<HubBody> {
        match self.message_type {
            SCAN_MESSAGE => Ok(HubBody::ScanResult(ScanResult::decode(&self.payload)?)),
            message_type => Ok(HubBody::Raw {
                message_type,
                payload: self.payload.clone(),
            }),
        }
    }
}

/// Decode a hub message: envelope first, then the nested record.
pub fn decode_hub_message(src: &[u8], config: &WireConfig) -> Result<HubMessage> {
    if src.len() < MIN_HUB_WIRE_SIZE {
        return Err(WireError::TooShort {
            needed: MIN_HUB_WIRE_SIZE,
            actual: src.len(),
        });
    }
    let frame = frame::decode_frame(src, config)?;
    let message = HubMessage::from_frame(&frame)?;
    tracing::debug!(
        source = %message.source,
        message_type = message.message_type,
        payload_len = message.payload.len(),
        "decoded hub message"
    );
    Ok(message)
}
