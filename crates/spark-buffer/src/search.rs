//! 字节扫描原语。
//!
//! ## 模块定位（Why）
//! - 所有缓冲变体（只读、游标读、游标写、读写）共用同一组无状态扫描算法，
//!   输入统一为“窗口内的字节切片 + 相对下标”，避免在各变体间复制查找逻辑或互相包装。
//! - 协议帧（SIP/HTTP 头部、行分隔文本）依赖的 CRLF、双 CRLF、宽松换行三种分帧规则集中在此，
//!   便于单独测试其状态机。
//!
//! ## 契约（What）
//! - 函数只读取传入切片，从不推进任何游标；游标推进由调用方根据返回的 [`Terminated`] 完成。
//! - 返回的下标均相对于传入切片的起点。
//! - `max_scan == 0` 或目标集合为空属于调用方缺陷，无论严格/安全变体都返回参数错误。

use alloc::vec::Vec;

use crate::error::{BufferError, Result};
use crate::precondition::{ensure_not_empty, ensure_positive};

/// 回车。
pub const CR: u8 = b'\r';
/// 换行。
pub const LF: u8 = b'\n';
/// 空格。
pub const SP: u8 = b' ';
/// 水平制表符。
pub const HTAB: u8 = b'\t';

/// 是否为 SP 或 HTAB。
#[inline]
pub const fn is_whitespace(byte: u8) -> bool {
    byte == SP || byte == HTAB
}

/// 一次带预算查找的三种结局。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// 起始下标不在切片内，未扫描任何字节。
    OutOfRange,
    /// 在给定下标命中。
    Found(usize),
    /// 扫描 `scanned` 字节后仍未命中。
    Exhausted {
        /// 实际扫描过的字节数。
        scanned: usize,
    },
}

/// 从 `start` 起最多扫描 `max_scan` 个字节，寻找任一 `targets` 中的字节。
///
/// 扫描预算与 `start` 无关：预算表示“看多少个字节”，而非“看到哪个绝对位置”。
pub fn scan(bytes: &[u8], start: usize, max_scan: usize, targets: &[u8]) -> Result<Scan> {
    ensure_positive(max_scan, "max_scan must be greater than zero")?;
    ensure_not_empty(targets, "target byte set must not be empty")?;
    if start >= bytes.len() {
        return Ok(Scan::OutOfRange);
    }
    let end = start.saturating_add(max_scan).min(bytes.len());
    let window = &bytes[start..end];
    let hit = match targets {
        [single] => window.iter().position(|b| b == single),
        _ => window.iter().position(|b| targets.contains(b)),
    };
    Ok(match hit {
        Some(offset) => Scan::Found(start + offset),
        None => Scan::Exhausted {
            scanned: window.len(),
        },
    })
}

/// 严格查找：越界起点返回 `Ok(None)`，耗尽预算返回 [`BufferError::ByteNotFound`]。
pub fn index_of(
    bytes: &[u8],
    start: usize,
    max_scan: usize,
    targets: &[u8],
) -> Result<Option<usize>> {
    match scan(bytes, start, max_scan, targets)? {
        Scan::OutOfRange => Ok(None),
        Scan::Found(index) => Ok(Some(index)),
        Scan::Exhausted { scanned } => Err(not_found(scanned, targets)),
    }
}

/// 安全查找：越界起点与耗尽预算均返回 `Ok(None)`。
pub fn index_of_safe(
    bytes: &[u8],
    start: usize,
    max_scan: usize,
    targets: &[u8],
) -> Result<Option<usize>> {
    match scan(bytes, start, max_scan, targets)? {
        Scan::Found(index) => Ok(Some(index)),
        Scan::OutOfRange | Scan::Exhausted { .. } => Ok(None),
    }
}

/// 构造未命中错误并记录一次调试事件。
pub(crate) fn not_found(scanned: usize, targets: &[u8]) -> BufferError {
    tracing::debug!(scanned, targets = ?targets, "strict byte search exhausted");
    BufferError::ByteNotFound {
        scanned,
        targets: Vec::from(targets),
    }
}

/// 统计从 `start` 开始连续的 SP/HTAB 个数；起点越界或不是空白时为 0。
pub fn count_whitespace(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|b| is_whitespace(**b)).count())
}

/// 统计 `[start, start + max_scan)` 内 `target` 出现的次数。
pub fn count_occurrences(bytes: &[u8], start: usize, max_scan: usize, target: u8) -> Result<usize> {
    ensure_positive(max_scan, "max_scan must be greater than zero")?;
    let Some(rest) = bytes.get(start..) else {
        return Ok(0);
    };
    Ok(rest.iter().take(max_scan).filter(|b| **b == target).count())
}

/// 窗口尾部是否与 `suffix` 相同；缓冲比后缀短时返回 `false`。
pub fn ends_with(bytes: &[u8], suffix: &[u8]) -> Result<bool> {
    ensure_not_empty(suffix, "suffix must not be empty")?;
    Ok(bytes.len() >= suffix.len() && bytes.ends_with(suffix))
}

/// 窗口头部是否与 `prefix` 相同；缓冲比前缀短时返回 `false`。
pub fn starts_with(bytes: &[u8], prefix: &[u8]) -> Result<bool> {
    ensure_not_empty(prefix, "prefix must not be empty")?;
    Ok(bytes.len() >= prefix.len() && bytes.starts_with(prefix))
}

/// 分帧命中：前 `content` 字节为帧内容，调用方应推进 `consumed` 字节。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminated {
    /// 帧内容长度（不含终止符）。
    pub content: usize,
    /// 需要消费的总字节数（含终止符）。
    pub consumed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingleCrlf {
    Searching,
    SawCr,
    Matched,
}

/// 单 CRLF 扫描。
///
/// # 教案式说明
/// - **How**：三态机 `Searching -> SawCr -> Matched`。`SawCr` 状态下读到任何非 LF 字节都会回到
///   `Searching`，且该字节不会被重新判定，因此 `"\r\r\n"` 不会命中：第二个 CR 被当作普通内容吞掉。
///   下游协议解析器可能依赖这一行为，保持原样。
/// - **What**：命中时返回的 `content` 不含 CR，`consumed` 越过 LF；未命中返回 `None`，
///   调用方据此保持游标不变。
pub fn single_crlf(bytes: &[u8]) -> Option<Terminated> {
    let mut state = SingleCrlf::Searching;
    for (pos, &byte) in bytes.iter().enumerate() {
        state = match (state, byte) {
            (SingleCrlf::Searching, CR) => SingleCrlf::SawCr,
            (SingleCrlf::SawCr, LF) => SingleCrlf::Matched,
            _ => SingleCrlf::Searching,
        };
        if state == SingleCrlf::Matched {
            return Some(Terminated {
                content: pos - 1,
                consumed: pos + 1,
            });
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoubleCrlf {
    Searching,
    Cr1,
    Lf1,
    Cr2,
    Matched,
}

/// 双 CRLF 扫描，用于切分头部块与正文。
///
/// 与 [`single_crlf`] 同一机制：任何不符合期望的字节都让状态机回到起点且不重判。
pub fn double_crlf(bytes: &[u8]) -> Option<Terminated> {
    let mut state = DoubleCrlf::Searching;
    for (pos, &byte) in bytes.iter().enumerate() {
        state = match (state, byte) {
            (DoubleCrlf::Searching, CR) => DoubleCrlf::Cr1,
            (DoubleCrlf::Cr1, LF) => DoubleCrlf::Lf1,
            (DoubleCrlf::Lf1, CR) => DoubleCrlf::Cr2,
            (DoubleCrlf::Cr2, LF) => DoubleCrlf::Matched,
            _ => DoubleCrlf::Searching,
        };
        if state == DoubleCrlf::Matched {
            return Some(Terminated {
                content: pos + 1 - 4,
                consumed: pos + 1,
            });
        }
    }
    None
}

/// 宽松行分帧。
///
/// - 遇到 LF：内容为 LF 之前的字节，若紧邻 CR 则一并去除；
/// - 遇到 CR 后紧跟非 LF 字节：该字节退回（不消费），行在 CR 之前结束；
///   第二个 CR 同样算作非 LF 字节，因此 `a\r\rb` 读作 `a`、空行、`b`；
/// - 到达末尾：一字节都没有时返回 `None`，否则整段作为最后一行（末尾孤立 CR 保留在内容中）。
pub fn line(bytes: &[u8]) -> Option<Terminated> {
    let mut saw_cr = false;
    for (pos, &byte) in bytes.iter().enumerate() {
        match byte {
            LF => {
                return Some(Terminated {
                    content: pos - usize::from(saw_cr),
                    consumed: pos + 1,
                });
            }
            _ if saw_cr => {
                return Some(Terminated {
                    content: pos - 1,
                    consumed: pos,
                });
            }
            CR => saw_cr = true,
            _ => {}
        }
    }
    if bytes.is_empty() {
        None
    } else {
        Some(Terminated {
            content: bytes.len(),
            consumed: bytes.len(),
        })
    }
}
