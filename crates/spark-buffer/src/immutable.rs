use alloc::string::String;
use core::fmt;
use core::hash::{Hash, Hasher};

use bytes::{Bytes, BytesMut};

use crate::buffer::Buffer;
use crate::error::{BufferError, Result};
use crate::read_write_buffer::ReadWriteBuffer;
use crate::readable_buffer::ReadableBuffer;
use crate::writable_buffer::WritableBuffer;

/// `ImmutableBuffer` 是共享存储上的固定只读窗口。
///
/// # 设计动机（Why）
/// - 解析器需要把一段报文切成许多小片（起始行、头部名、头部值、正文），
///   每个片段都应共享原始存储而非复制；
/// - 存储由 `bytes::Bytes` 提供引用计数，窗口边界则显式保存在 `(lower, upper)` 中，
///   切片只是换一对边界。
///
/// # 契约说明（What）
/// - **不变式**：`lower <= upper <= store.len()`，任何访问都不会越出 `[lower, upper)`；
/// - **相等性**：`Eq`/`Hash` 只看窗口内字节，不看边界或存储中窗口外的内容；
/// - **空窗口**：所有零长度构造都返回 [`EMPTY_BUFFER`](crate::EMPTY_BUFFER) 的克隆，不分配；
/// - **并发**：构造后从不修改，可在多线程间无锁共享（`Send + Sync`）。
///
/// # 风险提示（Trade-offs）
/// - 只要还有一个小切片存活，整块存储就不会释放；长期缓存小片段时应先 [`to_bytes`](Self::to_bytes)
///   再 `Bytes::copy_from_slice`。
#[derive(Clone)]
pub struct ImmutableBuffer {
    store: Bytes,
    lower: usize,
    upper: usize,
}

impl ImmutableBuffer {
    /// 静态空窗口，仅用于初始化空缓冲单例。
    pub(crate) const fn empty_static() -> Self {
        Self {
            store: Bytes::from_static(&[]),
            lower: 0,
            upper: 0,
        }
    }

    /// 以给定边界包装共享存储；空窗口折叠为单例。
    pub(crate) fn from_parts(store: Bytes, lower: usize, upper: usize) -> Self {
        debug_assert!(lower <= upper && upper <= store.len());
        if lower == upper {
            return crate::empty::empty();
        }
        Self {
            store,
            lower,
            upper,
        }
    }

    /// 以整个 `Bytes` 为窗口。
    pub(crate) fn from_bytes(store: Bytes) -> Self {
        let upper = store.len();
        Self::from_parts(store, 0, upper)
    }

    /// 复制 `bytes` 到新存储。
    pub(crate) fn copy_from_slice(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return crate::empty::empty();
        }
        Self::from_bytes(Bytes::copy_from_slice(bytes))
    }

    /// 窗口下界在存储中的绝对偏移。
    pub fn lower_boundary(&self) -> usize {
        self.lower
    }

    /// 窗口上界在存储中的绝对偏移。
    pub fn upper_boundary(&self) -> usize {
        self.upper
    }

    /// 窗口内的字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.store[self.lower..self.upper]
    }

    /// 以 `Bytes` 形式共享窗口，零拷贝。
    pub fn to_bytes(&self) -> Bytes {
        self.store.slice(self.lower..self.upper)
    }

    /// 是否就是进程级空缓冲单例。
    pub fn is_empty_singleton(&self) -> bool {
        self.upper == 0
            && self.store.is_empty()
            && core::ptr::eq(self.store.as_ptr(), crate::EMPTY_BUFFER.store.as_ptr())
    }

    /// 两个缓冲是否共享同一块底层存储。
    pub fn shares_storage_with(&self, other: &ImmutableBuffer) -> bool {
        core::ptr::eq(self.store.as_ptr(), other.store.as_ptr())
    }

    /// 在当前窗口上创建读游标位于 0 的游标读缓冲，不复制。
    pub fn to_readable_buffer(&self) -> ReadableBuffer {
        ReadableBuffer::new(self.clone())
    }

    /// 同 [`to_readable_buffer`](Self::to_readable_buffer)，但消费自身。
    pub fn into_readable_buffer(self) -> ReadableBuffer {
        ReadableBuffer::new(self)
    }

    /// 复制窗口内容得到可写缓冲，写游标位于末尾。
    ///
    /// 必须复制：其它引用仍视这块存储为不可变。
    pub fn to_writable_buffer(&self) -> WritableBuffer {
        tracing::trace!(len = self.capacity(), "copying immutable window into writable buffer");
        let store = BytesMut::from(self.as_bytes());
        let len = store.len();
        WritableBuffer::from_parts(store, 0, len, len)
    }

    /// 复制窗口内容得到读写缓冲，写游标位于末尾、读游标位于 0。
    pub fn to_read_write_buffer(&self) -> ReadWriteBuffer {
        tracing::trace!(len = self.capacity(), "copying immutable window into read-write buffer");
        let store = BytesMut::from(self.as_bytes());
        let len = store.len();
        ReadWriteBuffer::from_parts(store, 0, len, len)
    }

    /// 在独占存储时零拷贝地转为可写缓冲。
    ///
    /// # 教案式说明
    /// - **Why**：刚从 `Vec` 包装、尚未切片共享的缓冲无需复制即可继续写入；
    /// - **What**：存储仍被其它缓冲或 `Bytes` 引用（包括静态空缓冲）时返回
    ///   [`BufferError::WriteNotSupported`]，此时应改用 [`to_writable_buffer`](Self::to_writable_buffer)；
    ///   成功时窗口边界保持不变，写游标位于窗口末尾。
    pub fn try_into_writable(self) -> Result<WritableBuffer> {
        let (lower, upper) = (self.lower, self.upper);
        match self.store.try_into_mut() {
            Ok(store) => Ok(WritableBuffer::from_parts(store, lower, upper, upper)),
            Err(_) => Err(BufferError::WriteNotSupported {
                operation: "try_into_writable",
            }),
        }
    }
}

impl crate::sealed::Sealed for ImmutableBuffer {}

impl Buffer for ImmutableBuffer {
    fn window(&self) -> &[u8] {
        self.as_bytes()
    }

    fn capacity(&self) -> usize {
        self.upper - self.lower
    }

    fn view_range(&self, start: usize, stop: usize) -> ImmutableBuffer {
        Self::from_parts(self.store.clone(), self.lower + start, self.lower + stop)
    }
}

impl PartialEq for ImmutableBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ImmutableBuffer {}

impl PartialEq<[u8]> for ImmutableBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<str> for ImmutableBuffer {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for ImmutableBuffer {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Hash for ImmutableBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for ImmutableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for ImmutableBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableBuffer")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("bytes", &self.to_bytes())
            .finish()
    }
}

impl From<Bytes> for ImmutableBuffer {
    fn from(store: Bytes) -> Self {
        Self::from_bytes(store)
    }
}

impl From<alloc::vec::Vec<u8>> for ImmutableBuffer {
    fn from(bytes: alloc::vec::Vec<u8>) -> Self {
        Self::from_bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for ImmutableBuffer {
    fn from(bytes: &'static [u8]) -> Self {
        Self::from_bytes(Bytes::from_static(bytes))
    }
}

impl From<&'static str> for ImmutableBuffer {
    fn from(text: &'static str) -> Self {
        Self::from_bytes(Bytes::from_static(text.as_bytes()))
    }
}
