//! 进程级空缓冲单例。
//!
//! 所有零长度构造（空切片、空包装、读完后的 `read_remaining`）都返回 [`EMPTY_BUFFER`] 的克隆：
//! 存储是静态空切片，克隆不分配也不触碰引用计数。

use crate::immutable::ImmutableBuffer;

/// 唯一的空缓冲：容量为 0，任何按下标读取都越界，任何查找都找不到。
pub static EMPTY_BUFFER: ImmutableBuffer = ImmutableBuffer::empty_static();

/// 返回空缓冲单例的克隆。
pub fn empty() -> ImmutableBuffer {
    EMPTY_BUFFER.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::error::BufferError;

    #[test]
    fn every_accessor_degenerates() {
        let buffer = empty();
        assert!(buffer.is_empty_singleton());
        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.get_u8(0), Err(BufferError::out_of_bounds(0, 1, 0)));
        assert_eq!(buffer.index_of(0, 16, b"a"), Ok(None));
        assert_eq!(buffer.index_of_safe(0, 16, b"a"), Ok(None));
        assert_eq!(buffer.count_whitespace(0), Ok(0));
        assert_eq!(buffer.to_hex_string().as_deref(), Ok(""));
        assert!(buffer.slice(0, 0).unwrap().is_empty_singleton());
        assert!(matches!(
            buffer.parse_to_int(10),
            Err(BufferError::NumberFormat { .. })
        ));
    }

    #[test]
    fn readable_view_has_nothing_to_read() {
        use crate::buffer::ReadBuffer;

        let mut reader = empty().into_readable_buffer();
        assert_eq!(reader.readable_bytes(), 0);
        assert_eq!(reader.read_line(), Ok(None));
        assert!(reader.read_remaining().unwrap().is_empty_singleton());
        assert!(reader.read_u8().is_err());
    }
}
