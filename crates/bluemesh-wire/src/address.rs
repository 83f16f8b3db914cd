use std::fmt;
use std::str::FromStr;

use bytes::BufMut;

use crate::error::{Result, WireError};

/// Device address size on the wire.
pub const ADDRESS_SIZE: usize = 6;

/// Length of the textual form `aa:bb:cc:dd:ee:ff`.
const TEXT_SIZE: usize = 3 * ADDRESS_SIZE - 1;

/// A 6-byte device address, held in display order.
///
/// Addresses travel byte-reversed on the wire: wire bytes `[a5, a4, a3, a2, a1, a0]`
/// decode to the address `a0:a1:a2:a3:a4:a5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    /// The all-zero address. In mesh messages it means "every node".
    pub const BROADCAST: Address = Address([0; ADDRESS_SIZE]);

    /// Decode an address from its 6 wire bytes.
    pub fn decode(wire: &[u8]) -> Result<Self> {
        let bytes: [u8; ADDRESS_SIZE] =
            wire.try_into().map_err(|_| WireError::InvalidLength {
                expected: ADDRESS_SIZE,
                actual: wire.len(),
            })?;
        Ok(Self::from_wire(bytes))
    }

    /// Decode from an exactly-sized wire array.
    pub fn from_wire(mut wire: [u8; ADDRESS_SIZE]) -> Self {
        wire.reverse();
        Self(wire)
    }

    /// The 6 wire bytes of this address.
    pub fn encode(&self) -> [u8; ADDRESS_SIZE] {
        let mut wire = self.0;
        wire.reverse();
        wire
    }

    /// Append the wire form to `dst`.
    pub fn put(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.encode());
    }

    /// Parse `aa:bb:cc:dd:ee:ff` (either case).
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || WireError::InvalidAddress(text.to_string());
        if text.len() != TEXT_SIZE {
            return Err(invalid());
        }

        let mut bytes = [0u8; ADDRESS_SIZE];
        for (slot, part) in bytes.iter_mut().zip(text.split(':')) {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if text.split(':').count() != ADDRESS_SIZE {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for Address {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}
