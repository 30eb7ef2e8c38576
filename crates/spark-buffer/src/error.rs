//! 错误类型模块。
//!
//! ## 模块目的（Why）
//! - 将缓冲族所有失败路径归入单一错误域 [`BufferError`]，便于协议解析层通过模式匹配区分
//!   “调用方用错了”（参数、越界、已冻结）与“数据里就是没有”（`ByteNotFound`）。
//! - 每个变体都对应一个稳定错误码（[`codes`]），沿用 `<域>.<语义>` 的命名约定，
//!   方便在日志与告警中做机读聚合。
//!
//! ## 使用契约（What）
//! - 所有可失败的缓冲 API 均返回 [`Result<T>`](Result)；
//! - 错误不携带对底层存储的引用，可安全跨线程移动、复制进日志；
//! - 库内部从不重试，重试策略完全属于调用方。
//!
//! ## 风险提示（Trade-offs）
//! - `ByteNotFound` 会复制目标字节集合，通常只有 1~4 字节；若调用方在热路径上依赖严格查找的失败分支，
//!   建议改用 `*_safe` 变体以避免分配。

use alloc::{borrow::Cow, vec::Vec};

use thiserror::Error;

/// 缓冲族统一的结果别名，默认错误类型为 [`BufferError`]。
pub type Result<T, E = BufferError> = core::result::Result<T, E>;

/// 稳定错误码常量。
///
/// 与 [`BufferError::code`] 一一对应，供日志、指标等机读场景引用。
pub mod codes {
    /// 调用方传入非法参数（空目标集合、`max_scan == 0`、非法 IPv4/TBCD 文本等）。
    pub const INVALID_ARGUMENT: &str = "buffer.invalid_argument";
    /// 访问越过窗口或游标边界。
    pub const INDEX_OUT_OF_BOUNDS: &str = "buffer.index_out_of_bounds";
    /// 严格查找在扫描预算或缓冲内未命中。
    pub const BYTE_NOT_FOUND: &str = "buffer.byte_not_found";
    /// 十进制/任意进制整数解析失败。
    pub const NUMBER_FORMAT: &str = "buffer.number_format";
    /// 视图不支持写入（例如共享存储无法就地转为可写）。
    pub const WRITE_NOT_SUPPORTED: &str = "buffer.write_not_supported";
    /// 缓冲已通过 `build` 冻结，任何后续操作都被拒绝。
    pub const ILLEGAL_STATE: &str = "buffer.illegal_state";
}

/// 缓冲族的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：参数错误、越界、已冻结均属于调用方缺陷，应立即暴露；
///   `ByteNotFound` 则是严格查找 API 的“预期结果”，调用方可以据此等待更多数据。
/// - **契约 (What)**：
///   - 所有变体实现 `Clone + Eq`，便于测试中直接比较；
///   - [`code`](Self::code) 返回稳定错误码，不随文案变化；
///   - 借助 [`thiserror::Error`] 派生 `Display` 与 `Error`，可无缝接入 `anyhow` 等错误栈。
/// - **风险 (Trade-offs)**：`InvalidArgument`/`NumberFormat` 使用 `Cow<'static, str>` 保存描述，
///   静态文案零分配，动态文案才会触发一次堆分配。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// 调用方传入的参数不合法，在触碰存储之前即被拒绝。
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// 面向排障人员的描述。
        message: Cow<'static, str>,
    },

    /// 访问 `[index, index + len)` 超出了 `limit`。
    ///
    /// `limit` 为本次访问可用的上界：绝对访问时为窗口长度，游标访问时为可读/可写上界。
    #[error("index out of bounds: [{index}, {index}+{len}) exceeds limit {limit}")]
    IndexOutOfBounds {
        /// 起始下标（相对窗口）。
        index: usize,
        /// 请求的字节数。
        len: usize,
        /// 可用上界。
        limit: usize,
    },

    /// 严格查找耗尽扫描预算或缓冲仍未命中。
    #[error("none of the bytes {targets:02x?} found after scanning {scanned} bytes")]
    ByteNotFound {
        /// 实际扫描过的字节数。
        scanned: usize,
        /// 查找的目标字节集合。
        targets: Vec<u8>,
    },

    /// 整数解析失败：空输入、非法进制、非数字字节、孤立符号或溢出。
    #[error("number format error: {message}")]
    NumberFormat {
        /// 失败原因。
        message: Cow<'static, str>,
    },

    /// 当前视图无法提供写能力。
    #[error("write not supported: {operation}")]
    WriteNotSupported {
        /// 被拒绝的操作名称。
        operation: &'static str,
    },

    /// 缓冲已被冻结，`operation` 不再可用。
    #[error("illegal state: buffer already built, `{operation}` rejected")]
    IllegalState {
        /// 被拒绝的操作名称。
        operation: &'static str,
    },
}

impl BufferError {
    /// 构造 [`BufferError::InvalidArgument`]。
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// 构造 [`BufferError::NumberFormat`]。
    pub fn number_format(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NumberFormat {
            message: message.into(),
        }
    }

    /// 构造 [`BufferError::IndexOutOfBounds`]。
    pub const fn out_of_bounds(index: usize, len: usize, limit: usize) -> Self {
        Self::IndexOutOfBounds { index, len, limit }
    }

    /// 返回稳定错误码，参见 [`codes`]。
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => codes::INVALID_ARGUMENT,
            Self::IndexOutOfBounds { .. } => codes::INDEX_OUT_OF_BOUNDS,
            Self::ByteNotFound { .. } => codes::BYTE_NOT_FOUND,
            Self::NumberFormat { .. } => codes::NUMBER_FORMAT,
            Self::WriteNotSupported { .. } => codes::WRITE_NOT_SUPPORTED,
            Self::IllegalState { .. } => codes::ILLEGAL_STATE,
        }
    }

    /// 是否为严格查找的“未命中”结果。
    ///
    /// 帧解析器常以此区分“等待更多数据”与真正的缺陷。
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ByteNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};

    #[test]
    fn codes_are_stable_per_variant() {
        assert_eq!(
            BufferError::invalid_argument("x").code(),
            codes::INVALID_ARGUMENT
        );
        assert_eq!(
            BufferError::out_of_bounds(1, 2, 2).code(),
            codes::INDEX_OUT_OF_BOUNDS
        );
        assert_eq!(
            BufferError::IllegalState { operation: "read" }.code(),
            "buffer.illegal_state"
        );
    }

    #[test]
    fn byte_not_found_renders_targets_in_hex() {
        let err = BufferError::ByteNotFound {
            scanned: 7,
            targets: vec![b'\r', b'\n'],
        };
        assert!(err.is_not_found());
        let text = err.to_string();
        assert!(text.contains("[0d, 0a]"), "实际文案: {text}");
        assert!(text.contains('7'));
    }
}
