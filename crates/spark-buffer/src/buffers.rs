//! 缓冲构造入口。
//!
//! 所有零长度输入都返回空缓冲单例；包装函数接管或共享调用方的存储，仅文本编码类函数会分配新存储。

use alloc::vec::Vec;
use core::net::Ipv4Addr;
use core::str::FromStr;

use bytes::Bytes;

use crate::error::{BufferError, Result};
use crate::immutable::ImmutableBuffer;
use crate::numeric;
use crate::precondition::ensure_within;
use crate::read_write_buffer::ReadWriteBuffer;
use crate::writable_buffer::WritableBuffer;

/// 接管 `bytes` 作为只读窗口，不复制。
pub fn wrap(bytes: impl Into<Bytes>) -> ImmutableBuffer {
    ImmutableBuffer::from_bytes(bytes.into())
}

/// 包装静态字节，不分配。
pub fn wrap_static(bytes: &'static [u8]) -> ImmutableBuffer {
    ImmutableBuffer::from_bytes(Bytes::from_static(bytes))
}

/// 以 `bytes[offset..offset + len]` 为窗口；越界返回错误。
pub fn wrap_range(bytes: impl Into<Bytes>, offset: usize, len: usize) -> Result<ImmutableBuffer> {
    let store = bytes.into();
    ensure_within(offset, len, store.len())?;
    Ok(ImmutableBuffer::from_parts(store, offset, offset + len))
}

/// 复制字符串的 UTF-8 字节。
pub fn wrap_str(text: &str) -> ImmutableBuffer {
    ImmutableBuffer::copy_from_slice(text.as_bytes())
}

/// `value` 的 ASCII 十进制文本。
pub fn wrap_i32(value: i32) -> ImmutableBuffer {
    wrap_i64(i64::from(value))
}

/// `value` 的 ASCII 十进制文本。
pub fn wrap_i64(value: i64) -> ImmutableBuffer {
    wrap(numeric::decimal_bytes(value))
}

/// 将点分十进制 IPv4 文本编码为 4 字节网络序地址。
pub fn wrap_ipv4(text: &str) -> Result<ImmutableBuffer> {
    let address = Ipv4Addr::from_str(text).map_err(|_| {
        BufferError::invalid_argument(alloc::format!("`{text}` is not a dotted-quad IPv4 address"))
    })?;
    Ok(wrap(Vec::from(address.octets())))
}

/// 将数字串编码为 TBCD；含非法字符时返回参数错误。
pub fn wrap_tbcd(digits: &str) -> Result<ImmutableBuffer> {
    numeric::encode_tbcd(digits).map(|encoded| ImmutableBuffer::from_bytes(Bytes::from(encoded)))
}

/// 容量为 `capacity` 的可写缓冲。
pub fn writable(capacity: usize) -> WritableBuffer {
    WritableBuffer::with_capacity(capacity)
}

/// 在调用方数组的 `[offset, offset + len)` 上写入。
pub fn writable_from(bytes: Vec<u8>, offset: usize, len: usize) -> Result<WritableBuffer> {
    WritableBuffer::from_vec(bytes, offset, len)
}

/// 容量为 `capacity` 的读写缓冲。
pub fn read_write(capacity: usize) -> ReadWriteBuffer {
    ReadWriteBuffer::with_capacity(capacity)
}

/// 空缓冲单例。
pub fn empty() -> ImmutableBuffer {
    crate::empty::empty()
}
