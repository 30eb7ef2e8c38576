use core::fmt;

use bytes::BytesMut;

use crate::buffer::{Buffer, ReadBuffer, WriteBuffer, frozen};
use crate::cursor::ReaderCursor;
use crate::error::Result;
use crate::immutable::ImmutableBuffer;
use crate::precondition::ensure_within;

/// 同时带读、写游标的缓冲，典型用途是流式组帧：网络读入的数据从写游标追加，
/// 解析器从读游标消费。
///
/// # 契约说明（What）
/// - 始终满足 `0 <= reader_index <= writer_index <= capacity`；
/// - 可读上界即写游标：[`readable_bytes`](ReadBuffer::readable_bytes) 为 `writer - reader`；
/// - 写游标回退到读游标之前时，读游标（以及标记）被一并拉回；
/// - 读出的片段是复制品，因为存储在之后仍可能被覆盖。
pub struct ReadWriteBuffer {
    store: BytesMut,
    lower: usize,
    upper: usize,
    /// 相对窗口下界。
    writer: usize,
    cursor: ReaderCursor,
    done: bool,
}

impl ReadWriteBuffer {
    /// 分配容量为 `capacity`、全部填零的新缓冲。
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(BytesMut::zeroed(capacity), 0, capacity, 0)
    }

    /// `lower`/`upper` 为存储内绝对偏移，`writer` 相对窗口。
    pub(crate) fn from_parts(store: BytesMut, lower: usize, upper: usize, writer: usize) -> Self {
        debug_assert!(lower <= upper && upper <= store.len() && writer <= upper - lower);
        Self {
            store,
            lower,
            upper,
            writer,
            cursor: ReaderCursor::new(),
            done: false,
        }
    }

    /// 是否已冻结。
    pub fn is_built(&self) -> bool {
        self.done
    }

    /// 丢弃已读部分：把 `[reader, writer)` 移到窗口起点，腾出尾部空间。
    ///
    /// 读游标归零，标记同时归零。
    pub fn discard_read_bytes(&mut self) -> Result<()> {
        self.ensure_live("discard_read_bytes")?;
        let reader = self.cursor.index();
        if reader == 0 {
            return Ok(());
        }
        let (lower, writer) = (self.lower, self.writer);
        self.store
            .copy_within(lower + reader..lower + writer, lower);
        self.writer = writer - reader;
        self.cursor = ReaderCursor::new();
        Ok(())
    }

    /// 冻结：复制 `[0, writer)` 为新的只读缓冲（包括已读部分），并使自身失效。
    pub fn build(&mut self) -> Result<ImmutableBuffer> {
        self.ensure_live("build")?;
        let frozen = ImmutableBuffer::copy_from_slice(self.window());
        self.done = true;
        self.store = BytesMut::new();
        self.lower = 0;
        self.upper = 0;
        self.writer = 0;
        self.cursor = ReaderCursor::new();
        tracing::trace!(len = frozen.capacity(), "read-write buffer frozen");
        Ok(frozen)
    }
}

impl crate::sealed::Sealed for ReadWriteBuffer {}

impl Buffer for ReadWriteBuffer {
    fn window(&self) -> &[u8] {
        &self.store[self.lower..self.lower + self.writer]
    }

    fn visible(&self) -> &[u8] {
        &self.window()[self.cursor.index()..]
    }

    fn capacity(&self) -> usize {
        self.upper - self.lower
    }

    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        if self.done {
            return Err(frozen(operation));
        }
        Ok(())
    }

    fn view_range(&self, start: usize, stop: usize) -> ImmutableBuffer {
        tracing::trace!(len = stop - start, "copying slice out of read-write buffer");
        ImmutableBuffer::copy_from_slice(&self.window()[start..stop])
    }
}

impl ReadBuffer for ReadWriteBuffer {
    fn cursor(&self) -> &ReaderCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut ReaderCursor {
        &mut self.cursor
    }
}

impl WriteBuffer for ReadWriteBuffer {
    fn writer_index(&self) -> usize {
        self.writer
    }

    fn set_writer_index(&mut self, index: usize) -> Result<()> {
        self.ensure_live("set_writer_index")?;
        ensure_within(index, 0, self.capacity())?;
        self.writer = index;
        self.cursor.clamp(index);
        Ok(())
    }

    fn storage_mut(&mut self, operation: &'static str) -> Result<&mut [u8]> {
        self.ensure_live(operation)?;
        Ok(&mut self.store[self.lower..self.upper])
    }
}

impl PartialEq for ReadWriteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.visible() == other.visible()
    }
}

impl Eq for ReadWriteBuffer {}

impl fmt::Display for ReadWriteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&alloc::string::String::from_utf8_lossy(self.visible()))
    }
}

impl fmt::Debug for ReadWriteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadWriteBuffer")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("reader", &self.cursor.index())
            .field("writer", &self.writer)
            .field("done", &self.done)
            .finish()
    }
}
