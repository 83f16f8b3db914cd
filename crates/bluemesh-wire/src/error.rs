/// Errors that can occur while encoding or decoding mesh wire records.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The buffer is shorter than the fixed header (or declared body) requires.
    #[error("buffer too short ({actual} bytes, need {needed})")]
    TooShort { needed: usize, actual: usize },

    /// A length disagrees with a fixed or declared size.
    #[error("invalid length ({actual} bytes, expected {expected})")]
    InvalidLength { expected: usize, actual: usize },

    /// The record is structurally inconsistent.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// A body does not fit the width of its length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A textual device address could not be parsed.
    #[error("invalid device address: {0:?}")]
    InvalidAddress(String),

    /// An I/O error occurred while reading or writing a frame stream.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;

/// Fail with `TooShort` unless `buf` holds at least `needed` bytes.
pub(crate) fn ensure_len(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(WireError::TooShort {
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}
