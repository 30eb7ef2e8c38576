use alloc::vec::Vec;
use core::fmt;

use bytes::{Bytes, BytesMut};

use crate::buffer::{Buffer, WriteBuffer, frozen};
use crate::error::Result;
use crate::immutable::ImmutableBuffer;
use crate::precondition::ensure_within;

/// 带写游标的可写缓冲。
///
/// # 设计背景（Why）
/// - 编码器先在固定容量的窗口里顺序追加、按偏移回填，写完后一次性冻结为
///   [`ImmutableBuffer`] 交给发送路径；
/// - 存储由 `BytesMut` 独占，写入期间没有任何共享视图，因此无需加锁。
///
/// # 契约说明（What）
/// - 窗口 `[lower, upper)` 固定；写游标以存储内绝对偏移保存，对外以窗口相对下标暴露；
/// - `get_*`/查找/切片只能看到 `[lower, writer)`，即已写入部分；
/// - [`build`](Self::build) 复制已写入部分并冻结自身：窗口收缩为空，之后任何操作都返回
///   `IllegalState`，容量报告为 0。
///
/// # 风险提示（Trade-offs）
/// - 在仍可写的存储上切片必须复制，否则后续写入会改变已交出的“不可变”片段。
pub struct WritableBuffer {
    store: BytesMut,
    lower: usize,
    upper: usize,
    writer: usize,
    done: bool,
}

impl WritableBuffer {
    /// 分配容量为 `capacity`、全部填零的新缓冲。
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(BytesMut::zeroed(capacity), 0, capacity, 0)
    }

    /// 以 `bytes[offset..offset + len]` 为窗口接管调用方的数组，写游标位于窗口起点。
    pub fn from_vec(bytes: Vec<u8>, offset: usize, len: usize) -> Result<Self> {
        ensure_within(offset, len, bytes.len())?;
        let store = Bytes::from(bytes)
            .try_into_mut()
            .unwrap_or_else(|shared| BytesMut::from(shared.as_ref()));
        Ok(Self::from_parts(store, offset, offset + len, offset))
    }

    /// `writer` 为存储内绝对偏移。
    pub(crate) fn from_parts(store: BytesMut, lower: usize, upper: usize, writer: usize) -> Self {
        debug_assert!(lower <= writer && writer <= upper && upper <= store.len());
        Self {
            store,
            lower,
            upper,
            writer,
            done: false,
        }
    }

    /// 窗口下界在存储中的绝对偏移。
    pub fn lower_boundary(&self) -> usize {
        self.lower
    }

    /// 窗口上界在存储中的绝对偏移。
    pub fn upper_boundary(&self) -> usize {
        self.upper
    }

    /// 是否已冻结。
    pub fn is_built(&self) -> bool {
        self.done
    }

    /// 冻结：复制已写入部分 `[lower, writer)` 为新的只读缓冲，并使自身失效。
    ///
    /// 第二次调用返回 `IllegalState`。
    pub fn build(&mut self) -> Result<ImmutableBuffer> {
        self.ensure_live("build")?;
        let frozen = ImmutableBuffer::copy_from_slice(&self.store[self.lower..self.writer]);
        self.done = true;
        self.store = BytesMut::new();
        self.lower = 0;
        self.upper = 0;
        self.writer = 0;
        tracing::trace!(len = frozen.capacity(), "writable buffer frozen");
        Ok(frozen)
    }
}

impl crate::sealed::Sealed for WritableBuffer {}

impl Buffer for WritableBuffer {
    fn window(&self) -> &[u8] {
        &self.store[self.lower..self.writer]
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
        tracing::trace!(len = stop - start, "copying slice out of writable buffer");
        ImmutableBuffer::copy_from_slice(&self.window()[start..stop])
    }
}

impl WriteBuffer for WritableBuffer {
    fn writer_index(&self) -> usize {
        self.writer - self.lower
    }

    fn set_writer_index(&mut self, index: usize) -> Result<()> {
        self.ensure_live("set_writer_index")?;
        ensure_within(index, 0, self.capacity())?;
        self.writer = self.lower + index;
        Ok(())
    }

    fn storage_mut(&mut self, operation: &'static str) -> Result<&mut [u8]> {
        self.ensure_live(operation)?;
        Ok(&mut self.store[self.lower..self.upper])
    }
}

impl fmt::Debug for WritableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritableBuffer")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("writer", &self.writer)
            .field("done", &self.done)
            .finish()
    }
}
