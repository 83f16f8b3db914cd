use std::io::{ErrorKind, Write};

use bytes::{Bytes, BytesMut};

use crate::config::WireConfig;
use crate::error::{Result, WireError};
use crate::frame::{encode_frame, Frame};
use crate::hub::HubMessage;

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Writes complete envelopes to any `Write` stream.
///
/// Frames are written back to back, so each one must declare its true data
/// length for [`FrameReader`](crate::FrameReader) to split them again.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.data.len() > self.config.max_data_size {
            return Err(WireError::PayloadTooLarge {
                size: frame.data.len(),
                max: self.config.max_data_size,
            });
        }
        if !frame.is_length_consistent() {
            return Err(WireError::Malformed(format!(
                "declared length {} but frame carries {} bytes",
                frame.data_length,
                frame.data.len()
            )));
        }

        self.buf.clear();
        encode_frame(frame, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(WireError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }

        self.flush()
    }

    /// Build and write a frame from its fields.
    pub fn send(&mut self, opcode: u8, handle: u16, data: impl Into<Bytes>) -> Result<()> {
        let frame = Frame::new(opcode, handle, data)?;
        self.write_frame(&frame)
    }

    /// Write a hub message in its envelope.
    pub fn write_hub(&mut self, message: &HubMessage) -> Result<()> {
        let frame = message.to_frame()?;
        self.write_frame(&frame)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
