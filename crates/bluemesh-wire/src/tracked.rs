use bytes::{BufMut, Bytes, BytesMut};

use crate::address::{Address, ADDRESS_SIZE};
use crate::error::{ensure_len, Result, WireError};

/// Tracked device record: address (6) + rssi (1), no length prefix.
pub const TRACKED_DEVICE_SIZE: usize = ADDRESS_SIZE + 1;

/// A device the node watches for, with the RSSI level that triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedDevice {
    pub address: Address,
    pub rssi: i8,
}

impl TrackedDevice {
    pub fn new(address: Address, rssi: i8) -> Self {
        Self { address, rssi }
    }

    /// Decode exactly one 7-byte record.
    pub fn decode(src: &[u8]) -> Result<Self> {
        ensure_len(src, TRACKED_DEVICE_SIZE)?;
        if src.len() != TRACKED_DEVICE_SIZE {
            return Err(WireError::InvalidLength {
                expected: TRACKED_DEVICE_SIZE,
                actual: src.len(),
            });
        }
        Ok(Self::from_record(src))
    }

    pub fn encode(&self) -> [u8; TRACKED_DEVICE_SIZE] {
        let mut wire = [0u8; TRACKED_DEVICE_SIZE];
        wire[..ADDRESS_SIZE].copy_from_slice(&self.address.encode());
        wire[ADDRESS_SIZE] = self.rssi as u8;
        wire
    }

    fn from_record(record: &[u8]) -> Self {
        let mut address = [0u8; ADDRESS_SIZE];
        address.copy_from_slice(&record[..ADDRESS_SIZE]);
        Self {
            address: Address::from_wire(address),
            rssi: record[ADDRESS_SIZE] as i8,
        }
    }
}

/// Decode a back-to-back list of tracked device records.
pub fn decode_tracked_list(src: &[u8]) -> Result<Vec<TrackedDevice>> {
    if src.len() % TRACKED_DEVICE_SIZE != 0 {
        return Err(WireError::InvalidLength {
            expected: src.len() / TRACKED_DEVICE_SIZE * TRACKED_DEVICE_SIZE,
            actual: src.len(),
        });
    }
    Ok(src
        .chunks_exact(TRACKED_DEVICE_SIZE)
        .map(TrackedDevice::from_record)
        .collect())
}

pub fn encode_tracked_list(devices: &[TrackedDevice]) -> Bytes {
    let mut dst = BytesMut::with_capacity(devices.len() * TRACKED_DEVICE_SIZE);
    for device in devices {
        dst.put_slice(&device.encode());
    }
    dst.freeze()
}
