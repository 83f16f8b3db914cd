//! Binary wire codecs for a Bluetooth Low Energy mesh network.
//!
//! Every record is fixed-layout and little-endian:
//! - [`Frame`]: the envelope around all mesh traffic (opcode, handle, data length, data)
//! - [`HubMessage`]: a source address, message type and payload nested in a frame
//! - [`ConfigRecord`]: a configuration characteristic record (type, length, payload)
//! - [`TrackedDevice`]: a 7-byte address + RSSI threshold record
//! - [`MeshCommand`]: a message written into the mesh for a target node
//!
//! Device addresses travel byte-reversed relative to their text form; [`Address`]
//! always holds display order. [`PartialClock`] recovers full timestamps from the
//! 16-bit partial timestamps nodes broadcast.
//!
//! All codecs are pure functions over owned or borrowed buffers and can be
//! called from any thread.

pub mod address;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod frame;
pub mod hub;
pub mod kinds;
pub mod reader;
pub mod record;
pub mod scan;
pub mod tracked;
pub mod writer;

pub use address::{Address, ADDRESS_SIZE};
pub use clock::{partial_of, read_partial, reconstruct_timestamp, PartialClock};
pub use command::{decode_command, MeshCommand};
pub use config::{ClockConfig, LengthPolicy, WireConfig, MAX_DATA_LENGTH};
pub use error::{Result, WireError};
pub use frame::{decode_frame, encode_frame, Frame, HEADER_SIZE};
pub use hub::{decode_hub_message, HubBody, HubMessage, MIN_HUB_WIRE_SIZE};
pub use reader::FrameReader;
pub use record::ConfigRecord;
pub use scan::{ScanResult, ScannedDevice};
pub use tracked::{decode_tracked_list, encode_tracked_list, TrackedDevice};
pub use writer::FrameWriter;
