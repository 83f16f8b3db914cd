/// Largest data section the one-byte `dataLength` field can describe.
pub const MAX_DATA_LENGTH: usize = u8::MAX as usize;

/// How a decoder treats an envelope whose declared data length disagrees with
/// the bytes that follow the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Every byte after the header is data; the declared length is kept verbatim.
    #[default]
    Permissive,
    /// The byte count after the header must equal the declared length.
    Strict,
}

/// Controls envelope decoding behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireConfig {
    /// Declared-vs-actual length handling for envelopes and mesh commands.
    pub length_policy: LengthPolicy,
    /// Maximum data section accepted by the stream writer.
    pub max_data_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            length_policy: LengthPolicy::Permissive,
            max_data_size: MAX_DATA_LENGTH,
        }
    }
}

impl WireConfig {
    /// Configuration that rejects declared/actual length mismatches.
    pub fn strict() -> Self {
        Self {
            length_policy: LengthPolicy::Strict,
            ..Self::default()
        }
    }
}

/// Time base of the node sending partial timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockConfig {
    /// Seconds added to a UTC reference before reconstruction.
    pub utc_offset_secs: i32,
}
