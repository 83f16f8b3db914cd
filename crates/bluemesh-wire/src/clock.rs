//! Reconstruction of full timestamps from their low 16 bits.
//!
//! Nodes broadcast only the low 16 bits of their clock (seconds since epoch in
//! their local time base). Given a full reference time that is known to be within
//! about 9 hours of the node's clock, the missing high bits can be recovered by
//! choosing the 65536-second window closest to the reference.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ClockConfig;
use crate::error::{ensure_len, Result};

/// Largest distance from the reference still accepted without shifting window.
pub const HALF_WINDOW: i64 = 0x7FFF;

/// Span of one window: all values sharing the same high bits.
pub const WINDOW: i64 = 0x1_0000;

/// Size of an embedded partial timestamp field.
pub const PARTIAL_SIZE: usize = 2;

/// Reconstructs node timestamps against a reference clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialClock {
    config: ClockConfig,
}

impl PartialClock {
    pub fn new(config: ClockConfig) -> Self {
        Self { config }
    }

    /// Offset of the node time base from UTC, in seconds.
    pub fn utc_offset_secs(&self) -> i32 {
        self.config.utc_offset_secs
    }

    /// Recover the node's full timestamp from a UTC reference and the low 16
    /// bits of the node clock. The result is in the node's (offset) time base.
    ///
    /// All 64 bits of the reference are kept, so references past 2106 (beyond
    /// `u32`) and before 1970 resolve in their own window. Offset and window
    /// shifts saturate at the `i64` bounds instead of overflowing.
    pub fn reconstruct(&self, reference: i64, partial: u16) -> i64 {
        let local = reference.saturating_add(i64::from(self.config.utc_offset_secs));
        let candidate = combine(local, partial);
        let delta = local - candidate;

        let reconstructed = if delta < -HALF_WINDOW {
            combine(local.saturating_sub(WINDOW), partial)
        } else if delta > HALF_WINDOW {
            combine(local.saturating_add(WINDOW), partial)
        } else {
            candidate
        };

        tracing::trace!(
            reference,
            partial,
            delta,
            reconstructed,
            "reconstructed partial timestamp"
        );
        reconstructed
    }

    /// Reconstruct against the current system time.
    pub fn reconstruct_now(&self, partial: u16) -> i64 {
        self.reconstruct(unix_now(), partial)
    }
}

/// Reconstruct with no time-zone offset.
pub fn reconstruct_timestamp(reference: i64, partial: u16) -> i64 {
    PartialClock::default().reconstruct(reference, partial)
}

/// The low 16 bits a node would transmit for `timestamp`.
pub fn partial_of(timestamp: i64) -> u16 {
    (timestamp & 0xFFFF) as u16
}

/// Read a little-endian partial timestamp from the start of `src`.
pub fn read_partial(src: &[u8]) -> Result<u16> {
    ensure_len(src, PARTIAL_SIZE)?;
    Ok(u16::from_le_bytes([src[0], src[1]]))
}

/// Replace the low 16 bits of `base` with `partial`.
///
/// Masking the two's complement form keeps the window of negative values too;
/// for timestamps in `0..=u32::MAX` this equals masking the unsigned 32-bit form.
fn combine(base: i64, partial: u16) -> i64 {
    (base & !0xFFFF) | i64::from(partial)
}

/// Current UTC time in whole seconds since the Unix epoch.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
