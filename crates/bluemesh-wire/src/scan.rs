use bytes::{BufMut, Bytes, BytesMut};

use crate::address::{Address, ADDRESS_SIZE};
use crate::error::{ensure_len, Result, WireError};

/// Wire size of one scanned device: address (6) + rssi (1) + occurrences (2).
pub const SCANNED_DEVICE_SIZE: usize = ADDRESS_SIZE + 3;

/// A device seen by a mesh node during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedDevice {
    pub address: Address,
    pub rssi: i8,
    pub occurrences: u16,
}

/// Payload of a [`SCAN_MESSAGE`](crate::kinds::SCAN_MESSAGE) hub message:
/// a one-byte count followed by that many device records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResult {
    pub devices: Vec<ScannedDevice>,
}

impl ScanResult {
    pub fn decode(src: &[u8]) -> Result<Self> {
        ensure_len(src, 1)?;
        let count = usize::from(src[0]);
        ensure_len(src, 1 + count * SCANNED_DEVICE_SIZE)?;

        let devices = src[1..]
            .chunks_exact(SCANNED_DEVICE_SIZE)
            .take(count)
            .map(|record| {
                let address = Address::decode(&record[..ADDRESS_SIZE])?;
                Ok(ScannedDevice {
                    address,
                    rssi: record[ADDRESS_SIZE] as i8,
                    occurrences: u16::from_le_bytes([
                        record[ADDRESS_SIZE + 1],
                        record[ADDRESS_SIZE + 2],
                    ]),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { devices })
    }

    pub fn encode(&self) -> Result<Bytes> {
        let count = u8::try_from(self.devices.len()).map_err(|_| WireError::PayloadTooLarge {
            size: self.devices.len(),
            max: u8::MAX as usize,
        })?;

        let mut dst = BytesMut::with_capacity(1 + self.devices.len() * SCANNED_DEVICE_SIZE);
        dst.put_u8(count);
        for device in &self.devices {
            device.address.put(&mut dst);
            dst.put_i8(device.rssi);
            dst.put_u16_le(device.occurrences);
        }
        Ok(dst.freeze())
    }
}
