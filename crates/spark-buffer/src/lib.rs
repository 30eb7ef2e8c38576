#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![allow(private_bounds)]

//! `spark-buffer` 提供协议解析与编码使用的字节缓冲族。
//!
//! # 模块定位（Why）
//! - SIP/HTTP 一类文本协议与 MAP/Diameter 一类二进制协议都需要“在一块字节上反复切片、查找分隔符、
//!   按偏移取整数”，且希望切片不复制；
//! - 编码方向则需要在固定容量里顺序追加、按偏移回填，完成后冻结成可安全共享的只读缓冲。
//!
//! # 设计概要（How）
//! - 四种变体：[`ImmutableBuffer`]（共享存储上的只读窗口）、[`ReadableBuffer`]（加读游标）、
//!   [`WritableBuffer`]（加写游标）、[`ReadWriteBuffer`]（同时带两个游标），外加 [`EMPTY_BUFFER`] 单例；
//! - 能力以 trait 表达：[`Buffer`]、[`ReadBuffer`]、[`WriteBuffer`]，算法集中在无状态的
//!   [`search`] 与 [`numeric`] 模块，四种变体只负责交出窗口切片；
//! - 共享存储使用 `bytes::Bytes`，独占可写存储使用 `bytes::BytesMut`。
//!
//! # 契约说明（What）
//! - 所有下标相对于窗口下界；可写类缓冲的读取上界是写游标；
//! - 所有可失败操作返回 [`Result`]，错误域为 [`BufferError`]；
//! - 冻结（`build`）之后的可写类缓冲对任何操作返回 `IllegalState`；
//! - 库本身不加锁：只读缓冲可跨线程共享，带游标的缓冲由单一所有者使用。
//!
//! # Feature
//! - `std`（默认）：启用各依赖的 `std` 支持；关闭后 crate 以 `no_std + alloc` 编译。

extern crate alloc;

mod buffer;
pub mod buffers;
mod cursor;
mod empty;
pub mod error;
mod immutable;
pub mod numeric;
pub mod precondition;
mod read_write_buffer;
mod readable_buffer;
pub mod search;
mod sealed;
mod writable_buffer;

pub use buffer::{Buffer, ReadBuffer, WriteBuffer};
pub use cursor::ReaderCursor;
pub use empty::EMPTY_BUFFER;
pub use error::{BufferError, Result, codes};
pub use immutable::ImmutableBuffer;
pub use read_write_buffer::ReadWriteBuffer;
pub use readable_buffer::ReadableBuffer;
pub use writable_buffer::WritableBuffer;
