//! An editable stream over an owned in-memory buffer.

use crate::error::{Result, SdkError};
use crate::stream::{EditableStream, Stream};

/// Editable stream backed by a resizable byte buffer.
///
/// Owns the bytes it was constructed with; every operation is a synchronous
/// mutation of the `(buffer, size, position)` triple. The position is always
/// within `[0, size]`.
pub struct BufferStream {
    buffer: Vec<u8>,
    size: i64,
    position: i64,
}

impl BufferStream {
    /// Take ownership of `buffer` and place the position at the start.
    pub fn new(buffer: Vec<u8>) -> Self {
        let size = buffer.len() as i64;
        Self {
            buffer,
            size,
            position: 0,
        }
    }

    /// Current content, e.g. for writing the edited bytes back out.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the stream and return the underlying buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

impl Stream for BufferStream {
    fn read(&mut self, buf: &mut [u8]) -> i64 {
        if buf.is_empty() {
            return 0;
        }
        let wanted = buf.len() as i64;
        let remaining = self.size - self.position;
        let bytes_read = wanted.min(remaining);
        if bytes_read > 0 {
            let at = self.position as usize;
            let n = bytes_read as usize;
            buf[..n].copy_from_slice(&self.buffer[at..at + n]);
            self.position += bytes_read;
        }
        bytes_read
    }

    fn write(&mut self, buf: &[u8]) -> i64 {
        let len = buf.len() as i64;
        self.update(buf, len)
    }

    fn flush(&mut self) -> bool {
        true
    }

    fn seek(&mut self, position: i64) -> Result<()> {
        if position < 0 {
            return Err(SdkError::BadInput(
                "position must not be less than zero".into(),
            ));
        }
        if position > self.size {
            return Err(SdkError::BadInput(
                "position must not be larger than size".into(),
            ));
        }
        self.position = position;
        Ok(())
    }

    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn size(&self) -> i64 {
        self.size
    }

    fn set_size(&mut self, _value: i64) -> Result<()> {
        Err(SdkError::NotSupported(
            "buffer stream size is defined by its content".into(),
        ))
    }
}

impl EditableStream for BufferStream {
    fn insert(&mut self, buf: &[u8]) -> i64 {
        if buf.is_empty() {
            return 0;
        }
        let len = buf.len() as i64;
        if i64::MAX - self.size < len {
            panic!("inserting buffer would exceed maximum stream length");
        }
        let at = self.position as usize;
        self.buffer.splice(at..at, buf.iter().copied());
        self.size += len;
        self.position += len;
        len
    }

    fn delete(&mut self, num_bytes: i64) -> i64 {
        if num_bytes <= 0 {
            return 0;
        }
        let remaining = self.size - self.position;
        let bytes_deleted = num_bytes.min(remaining);
        if bytes_deleted > 0 {
            let at = self.position as usize;
            self.buffer.drain(at..at + bytes_deleted as usize);
            self.size -= bytes_deleted;
        }
        bytes_deleted
    }

    fn update(&mut self, buf: &[u8], replace_length: i64) -> i64 {
        self.delete(replace_length);
        self.insert(buf)
    }
}
