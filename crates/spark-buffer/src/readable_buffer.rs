use core::fmt;
use core::hash::{Hash, Hasher};

use crate::buffer::{Buffer, ReadBuffer};
use crate::cursor::ReaderCursor;
use crate::immutable::ImmutableBuffer;
use crate::writable_buffer::WritableBuffer;

/// 不可变窗口加一个读游标。
///
/// 读出的片段与源窗口共享存储；相等性、`Display` 与整段解析只看游标之后尚未消费的字节。
#[derive(Clone)]
pub struct ReadableBuffer {
    inner: ImmutableBuffer,
    cursor: ReaderCursor,
}

impl ReadableBuffer {
    /// 在 `inner` 上创建游标位于 0 的读缓冲。
    pub fn new(inner: ImmutableBuffer) -> Self {
        Self {
            inner,
            cursor: ReaderCursor::new(),
        }
    }

    /// 完整窗口（含已读部分）。
    pub fn as_immutable(&self) -> &ImmutableBuffer {
        &self.inner
    }

    /// 尚未消费的部分，零拷贝。
    pub fn to_immutable(&self) -> ImmutableBuffer {
        let len = self.inner.capacity();
        self.inner.view_range(self.cursor.index(), len)
    }

    /// 复制尚未消费的部分得到可写缓冲，写游标位于末尾。
    pub fn to_writable_buffer(&self) -> WritableBuffer {
        self.to_immutable().to_writable_buffer()
    }

    /// 丢弃游标，取回完整窗口。
    pub fn into_inner(self) -> ImmutableBuffer {
        self.inner
    }
}

impl crate::sealed::Sealed for ReadableBuffer {}

impl Buffer for ReadableBuffer {
    fn window(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    fn visible(&self) -> &[u8] {
        &self.inner.as_bytes()[self.cursor.index()..]
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn view_range(&self, start: usize, stop: usize) -> ImmutableBuffer {
        self.inner.view_range(start, stop)
    }
}

impl ReadBuffer for ReadableBuffer {
    fn cursor(&self) -> &ReaderCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ReaderCursor {
        &mut self.cursor
    }
}

impl PartialEq for ReadableBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.visible() == other.visible()
    }
}

impl Eq for ReadableBuffer {}

impl Hash for ReadableBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.visible().hash(state);
    }
}

impl fmt::Display for ReadableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&alloc::string::String::from_utf8_lossy(self.visible()))
    }
}

impl fmt::Debug for ReadableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadableBuffer")
            .field("reader_index", &self.cursor.index())
            .field("marked", &self.cursor.marked())
            .field("inner", &self.inner)
            .finish()
    }
}

impl From<ImmutableBuffer> for ReadableBuffer {
    fn from(inner: ImmutableBuffer) -> Self {
        Self::new(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers;
    use crate::error::BufferError;
    use alloc::string::ToString;

    #[test]
    fn reads_share_storage_with_source() {
        let source = buffers::wrap_str("GET /index HTTP/1.1");
        let mut reader = source.to_readable_buffer();
        let method = reader.read_until_whitespace().unwrap();
        assert_eq!(method, "GET");
        assert!(method.shares_storage_with(&source));
        assert_eq!(reader.reader_index(), 4);
        assert_eq!(reader.to_string(), "/index HTTP/1.1");
    }

    #[test]
    fn equality_covers_unread_bytes_only() {
        let mut a = buffers::wrap_str("xxhello").into_readable_buffer();
        a.skip_bytes(2).unwrap();
        let b = buffers::wrap_str("hello").into_readable_buffer();
        assert_eq!(a, b);
        assert_eq!(a.to_immutable(), "hello");
        assert_eq!(a.as_immutable().capacity(), 7);

        let mut writable = a.to_writable_buffer();
        assert_eq!(writable.capacity(), 5);
        assert_eq!(writable.build().unwrap(), "hello");
    }

    #[test]
    fn strict_read_until_moves_to_scan_end() {
        let mut reader = buffers::wrap_str("abcdef;gh").into_readable_buffer();
        let err = reader.read_until(3, b";").unwrap_err();
        assert_eq!(
            err,
            BufferError::ByteNotFound {
                scanned: 3,
                targets: b";".to_vec()
            }
        );
        assert_eq!(reader.reader_index(), 3);
        assert_eq!(reader.read_until(8, b";").unwrap(), "def");
        assert_eq!(reader.reader_index(), 7);
    }

    #[test]
    fn safe_read_until_keeps_cursor() {
        let mut reader = buffers::wrap_str("abc").into_readable_buffer();
        assert_eq!(reader.read_until_safe(16, b";"), Ok(None));
        assert_eq!(reader.reader_index(), 0);
    }

    #[test]
    fn mark_and_reset() {
        let mut reader = buffers::wrap_str("0123456789").into_readable_buffer();
        reader.skip_bytes(3).unwrap();
        reader.mark_reader_index().unwrap();
        reader.skip_bytes(4).unwrap();
        reader.reset_reader_index().unwrap();
        assert_eq!(reader.reader_index(), 3);
        assert_eq!(
            reader.set_reader_index(11),
            Err(BufferError::out_of_bounds(11, 0, 10))
        );
        reader.set_reader_index(10).unwrap();
        assert!(!reader.has_readable_bytes());
    }

    #[test]
    fn fixed_width_reads_advance() {
        let bytes: alloc::vec::Vec<u8> = alloc::vec![0x00, 0x01, 0xFF, 0xFF, 0xFF, 0x12, 0x34, 0x56];
        let mut reader = buffers::wrap(bytes).into_readable_buffer();
        assert_eq!(reader.read_unsigned_short(), Ok(1));
        assert_eq!(reader.read_three_octet_int(), Ok(0x00FF_FFFF));
        assert_eq!(reader.reader_index(), 5);
        assert_eq!(
            reader.read_int(),
            Err(BufferError::out_of_bounds(5, 4, 8))
        );
        assert_eq!(reader.reader_index(), 5);
        assert_eq!(reader.read_three_octet_int(), Ok(0x0012_3456));
    }

    #[test]
    fn read_decimal_int_stops_at_non_digit() {
        let mut reader = buffers::wrap_str("-42;rest").into_readable_buffer();
        assert_eq!(reader.read_decimal_int(), Ok(-42));
        assert_eq!(reader.peek_byte(), Ok(b';'));

        let mut bad = buffers::wrap_str("-x").into_readable_buffer();
        assert!(matches!(
            bad.read_decimal_int(),
            Err(BufferError::NumberFormat { .. })
        ));
        assert_eq!(bad.reader_index(), 0);
    }
}
