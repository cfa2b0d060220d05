//! Stream abstractions over content bytes.
//!
//! [`Stream`] is the base random-access surface handed to file handlers;
//! [`EditableStream`] adds structural edits (insert, delete, replace) for
//! formats that are rewritten in place. Counts and positions are `i64` so
//! they can cross the C ABI unchanged.

use crate::error::Result;

pub trait Stream {
    /// Read into `buf` from the current position.
    ///
    /// Returns the number of bytes actually read, which may be less than
    /// `buf.len()` near the end of the stream (0 at end). Advances the
    /// position by that count.
    fn read(&mut self, buf: &mut [u8]) -> i64;

    /// Write `buf` at the current position, returning the bytes written.
    fn write(&mut self, buf: &[u8]) -> i64;

    /// Flush pending writes. Returns true on success.
    fn flush(&mut self) -> bool;

    /// Move the position to `position`.
    ///
    /// # Errors
    /// `BadInput` if `position` is negative or beyond the stream size.
    fn seek(&mut self, position: i64) -> Result<()>;

    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    fn position(&self) -> i64;

    fn size(&self) -> i64;

    /// Resize the stream independent of content edits.
    ///
    /// # Errors
    /// `NotSupported` for stream types whose size is defined by their
    /// content alone.
    fn set_size(&mut self, value: i64) -> Result<()>;
}

pub trait EditableStream: Stream {
    /// Splice `buf` into the stream at the current position.
    ///
    /// Seeks to the end of the inserted section. Returns the number of
    /// bytes inserted.
    fn insert(&mut self, buf: &[u8]) -> i64;

    /// Delete up to `num_bytes` bytes at the current position.
    ///
    /// Does not move the stream position. Returns the number of bytes
    /// actually deleted (clamped at end of stream; 0 for a non-positive
    /// request).
    fn delete(&mut self, num_bytes: i64) -> i64;

    /// Replace `replace_length` bytes at the current position with `buf`.
    ///
    /// Equivalent to `delete(replace_length)` followed by `insert(buf)`,
    /// so the lengths may differ and the stream grows or shrinks in one
    /// edit. Seeks to the end of the inserted section. Returns the number
    /// of bytes inserted.
    fn update(&mut self, buf: &[u8], replace_length: i64) -> i64;
}
