//! 前置条件校验。
//!
//! 每个公开入口在触碰存储之前都先经过这里的检查：参数类缺陷返回
//! [`BufferError::InvalidArgument`]，范围类缺陷返回 [`BufferError::IndexOutOfBounds`]。

use alloc::borrow::Cow;

use crate::error::{BufferError, Result};

/// 条件不成立时返回带描述的参数错误。
#[inline]
pub fn ensure_argument(condition: bool, message: impl Into<Cow<'static, str>>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(BufferError::invalid_argument(message))
    }
}

/// 要求字节集合非空，`what` 用于拼装错误文案。
#[inline]
pub fn ensure_not_empty(bytes: &[u8], what: &'static str) -> Result<()> {
    if bytes.is_empty() {
        Err(BufferError::invalid_argument(what))
    } else {
        Ok(())
    }
}

/// 要求计数类参数大于零。
#[inline]
pub fn ensure_positive(value: usize, what: &'static str) -> Result<()> {
    if value == 0 {
        Err(BufferError::invalid_argument(what))
    } else {
        Ok(())
    }
}

/// 校验切片区间 `[start, stop)`：`start > stop` 属于参数错误，`stop > limit` 属于越界。
#[inline]
pub fn ensure_range(start: usize, stop: usize, limit: usize) -> Result<()> {
    if start > stop {
        return Err(BufferError::invalid_argument(alloc::format!(
            "start index {start} is greater than stop index {stop}"
        )));
    }
    if stop > limit {
        return Err(BufferError::out_of_bounds(start, stop - start, limit));
    }
    Ok(())
}

/// 校验 `[index, index + len)` 落在 `limit` 之内，溢出同样视为越界。
#[inline]
pub fn ensure_within(index: usize, len: usize, limit: usize) -> Result<()> {
    match index.checked_add(len) {
        Some(end) if end <= limit => Ok(()),
        _ => Err(BufferError::out_of_bounds(index, len, limit)),
    }
}

/// 进制须位于 `2..=36`；越界按数字格式错误处理，与整数解析的其它失败保持同一类别。
#[inline]
pub fn ensure_radix(radix: u32) -> Result<()> {
    if (2..=36).contains(&radix) {
        Ok(())
    } else {
        Err(BufferError::number_format(alloc::format!(
            "radix {radix} out of range 2..=36"
        )))
    }
}
