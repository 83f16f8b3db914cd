//! BLE mesh wire formats and timestamp recovery.
//!
//! Hubs and nodes exchange compact little-endian records: a 4-byte envelope
//! around every message, hub messages carrying a reversed source address,
//! configuration records, tracked-device entries and mesh commands. Nodes
//! only transmit the low 16 bits of their clock; [`wire::PartialClock`]
//! recovers the full timestamp against a reference time.
//!
//! # Crate Structure
//!
//! - [`wire`]: codecs, stream reader/writer and partial clock
//!
//! The `bluemesh` binary (behind the `cli` feature) decodes, encodes and
//! dumps these records from the command line.

/// Re-export wire types.
pub mod wire {
    pub use bluemesh_wire::*;
}
