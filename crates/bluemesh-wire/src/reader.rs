use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::config::WireConfig;
use crate::error::{Result, WireError};
use crate::frame::{decode_frame, Frame, HEADER_SIZE};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 512;

/// Reads back-to-back envelopes from any `Read` stream, such as a capture file.
///
/// A stream has no outer delimiter, so each envelope is cut at its declared
/// data length before being decoded.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` at a clean end of stream and
    /// `Err(WireError::ConnectionClosed)` when the stream ends mid-frame. The
    /// partial frame is discarded, so the following call returns `Ok(None)`.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.split_frame()? {
                return Ok(Some(frame));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                tracing::debug!(buffered = self.buf.len(), "stream ended mid-frame");
                self.buf.clear();
                return Err(WireError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    fn split_frame(&mut self) -> Result<Option<Frame>> {
        if self.buf.len() < HEADER_SIZE {
            return Ok(None);
        }
        let total = HEADER_SIZE + usize::from(self.buf[3]);
        if self.buf.len() < total {
            return Ok(None);
        }
        let bytes = self.buf.split_to(total);
        decode_frame(&bytes, &self.config).map(Some)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::Bytes;

    use super::*;

    fn wire(frames: &[Frame]) -> Vec<u8> {
        frames.iter().flat_map(|f| f.encode().to_vec()).collect()
    }

    #[test]
    fn read_single_frame() {
        let frame = Frame::new(1, 0x0010, Bytes::from_static(b"hello")).unwrap();
        let mut reader = FrameReader::new(Cursor::new(wire(&[frame.clone()])));

        assert_eq!(reader.read_frame().unwrap(), Some(frame));
        assert_eq!(reader.read_frame().unwrap(), None);
    }

    #[test]
    fn read_multiple_frames() {
        let frames = vec![
            Frame::new(1, 1, Bytes::from_static(b"one")).unwrap(),
            Frame::new(2, 2, Bytes::new()).unwrap(),
            Frame::new(3, 3, vec![0xAB; 255]).unwrap(),
        ];
        let reader = FrameReader::new(Cursor::new(wire(&frames)));
        let read: Vec<Frame> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(read, frames);
    }

    #[test]
    fn partial_read_handling() {
        let frame = Frame::new(4, 4, Bytes::from_static(b"slow")).unwrap();
        let byte_reader = ByteByByteReader {
            bytes: wire(&[frame.clone()]),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);
        assert_eq!(reader.read_frame().unwrap(), Some(frame));
    }

    #[test]
    fn empty_stream_is_clean_end() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn stream_closed_mid_frame() {
        let mut reader = FrameReader::new(Cursor::new(vec![1, 0, 0, 5, b'a', b'b']));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }

    #[test]
    fn stream_closed_mid_frame_then_ends() {
        let frame = Frame::new(1, 1, Bytes::from_static(b"ok")).unwrap();
        let mut bytes = wire(&[frame.clone()]);
        bytes.extend_from_slice(&[1, 0, 0, 5, 0xAA]);
        let mut reader = FrameReader::new(Cursor::new(bytes));

        assert_eq!(reader.next().unwrap().unwrap(), frame);
        assert!(matches!(reader.next(), Some(Err(WireError::ConnectionClosed))));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn truncated_stream_yields_bounded_items() {
        let reader = FrameReader::new(Cursor::new(vec![1, 0, 0, 5, 0xAA]));
        let items: Vec<Result<Frame>> = reader.take(100).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(WireError::ConnectionClosed)));
    }

    #[test]
    fn stream_closed_mid_header() {
        let mut reader = FrameReader::new(Cursor::new(vec![1, 0]));
        assert!(matches!(
            reader.read_frame(),
            Err(WireError::ConnectionClosed)
        ));
    }

    #[test]
    fn interrupted_read_retries() {
        let frame = Frame::new(8, 8, Bytes::from_static(b"ok")).unwrap();
        let reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(wire(&[frame.clone()])),
        };
        let mut framed = FrameReader::new(reader);
        assert_eq!(framed.read_frame().unwrap(), Some(frame));
    }

    #[test]
    fn io_error_propagates() {
        let mut framed = FrameReader::new(FailingReader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, WireError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }
}
