//! 缓冲能力契约。
//!
//! # 设计背景（Why）
//! - 四种缓冲变体（只读、游标读、游标写、读写）共享大量只读算法：按下标取数、查找、十进制解析、
//!   TBCD 解码、大小写无关比较。让一种缓冲在内部包装另一种来复用这些算法，
//!   每一层都要做一次下标换算，极易出错。
//! - 因此采用“能力 trait + 无状态算法模块”：实现者只需交出窗口字节切片，
//!   其余操作全部由默认方法调用 [`search`](crate::search) 与 [`numeric`](crate::numeric) 完成。
//!
//! # 能力划分（How）
//! - [`Buffer`]：取数、查找、数值解码，所有变体都具备；
//! - [`ReadBuffer`]：在 `Buffer` 之上增加读游标；
//! - [`WriteBuffer`]：在 `Buffer` 之上增加写游标与就地写入。
//!
//! “这个缓冲能做什么”因此在编译期即可回答：只读缓冲根本没有写方法可调。
//!
//! # 契约说明（What）
//! - 所有下标都相对于窗口下界；
//! - `window()` 返回按绝对下标可寻址的字节：对可写/读写缓冲而言只包含已写入部分，
//!   未写入的字节永远读不到；
//! - `visible()` 返回参与相等性、渲染与整段解析的字节：游标读缓冲为尚未消费的部分；
//! - 每个默认方法都会先调用 [`Buffer::ensure_live`]，已冻结的缓冲因此统一返回
//!   [`BufferError::IllegalState`]。

mod readable;
mod writable;

pub use readable::ReadBuffer;
pub use writable::WriteBuffer;

use alloc::{string::String, string::ToString, vec::Vec};
use core::net::Ipv4Addr;

use crate::error::{BufferError, Result};
use crate::immutable::ImmutableBuffer;
use crate::precondition::{ensure_argument, ensure_range, ensure_within};
use crate::sealed::Sealed;
use crate::{numeric, search};

/// 所有缓冲变体共享的只读能力。
///
/// # 设计背景（Why）
/// - 协议解析器通常只关心“按偏移取值、找分隔符、切片”，并不关心底层是共享存储还是仍在写入的数组；
/// - trait 保持对象安全，解析器可以直接接收 `&dyn Buffer`。
///
/// # 契约说明（What）
/// - **必需方法**：`window`、`capacity`、`view_range`；冻结语义由 `ensure_live` 覆盖。
/// - **前置条件**：`view_range(start, stop)` 只会在 `slice` 校验区间后被调用，实现者无需重复检查。
/// - **后置条件**：任何默认方法都不会推进游标，也不会修改存储。
///
/// # 风险提示（Trade-offs）
/// - 默认方法全部返回 `Result`，即使对只读缓冲而言部分方法不可能失败；
///   这是为了让已冻结的可写缓冲能在同一签名下报告 `IllegalState`。
pub trait Buffer: Sealed {
    /// 可按绝对下标寻址的窗口字节。
    fn window(&self) -> &[u8];

    /// 参与相等性、渲染与整段解析的字节，默认等于 [`window`](Self::window)。
    fn visible(&self) -> &[u8] {
        self.window()
    }

    /// 窗口容量（上界减下界）；已冻结的缓冲返回 0。
    fn capacity(&self) -> usize;

    /// 冻结检查钩子，仅可写类缓冲会返回错误。
    fn ensure_live(&self, operation: &'static str) -> Result<()> {
        let _ = operation;
        Ok(())
    }

    /// 生成 `[start, stop)` 的只读视图：共享存储零拷贝，仍可变的存储复制。
    ///
    /// 调用方（[`slice`](Self::slice) 与各读取方法）已保证区间合法。
    fn view_range(&self, start: usize, stop: usize) -> ImmutableBuffer;

    /// 可见字节是否为空。冻结后的句柄没有可见字节，返回 `true`。
    fn is_empty(&self) -> bool {
        self.visible().is_empty()
    }

    /// 零拷贝切片 `[start, stop)`；空区间返回共享的空缓冲单例。
    fn slice(&self, start: usize, stop: usize) -> Result<ImmutableBuffer> {
        self.ensure_live("slice")?;
        ensure_range(start, stop, self.window().len())?;
        Ok(self.view_range(start, stop))
    }

    /// 从 `start` 切到窗口末尾。
    fn slice_from(&self, start: usize) -> Result<ImmutableBuffer> {
        self.ensure_live("slice")?;
        let len = self.window().len();
        ensure_within(start, 0, len)?;
        Ok(self.view_range(start, len))
    }

    /// 读取无符号单字节。
    fn get_u8(&self, index: usize) -> Result<u8> {
        self.ensure_live("get_u8")?;
        numeric::get_u8(self.window(), index)
    }

    /// 读取有符号单字节。
    fn get_byte(&self, index: usize) -> Result<i8> {
        self.get_u8(index).map(|b| b as i8)
    }

    /// 读取无符号单字节并扩宽为 `i16`。
    fn get_unsigned_byte(&self, index: usize) -> Result<i16> {
        self.get_u8(index).map(i16::from)
    }

    /// 大端 16 位有符号整数。
    fn get_short(&self, index: usize) -> Result<i16> {
        self.ensure_live("get_short")?;
        numeric::get_i16(self.window(), index)
    }

    /// 大端 16 位无符号整数，扩宽为 `i32`。
    fn get_unsigned_short(&self, index: usize) -> Result<i32> {
        self.ensure_live("get_unsigned_short")?;
        numeric::get_unsigned_i16(self.window(), index)
    }

    /// 大端三字节无符号整数。
    fn get_three_octet_int(&self, index: usize) -> Result<i32> {
        self.ensure_live("get_three_octet_int")?;
        numeric::get_three_octet(self.window(), index)
    }

    /// 大端 32 位有符号整数。
    fn get_int(&self, index: usize) -> Result<i32> {
        self.ensure_live("get_int")?;
        numeric::get_i32(self.window(), index)
    }

    /// 大端 32 位无符号整数，扩宽为 `i64`。
    fn get_unsigned_int(&self, index: usize) -> Result<i64> {
        self.ensure_live("get_unsigned_int")?;
        numeric::get_unsigned_i32(self.window(), index)
    }

    /// 大端五字节无符号整数。
    fn get_five_octet_long(&self, index: usize) -> Result<i64> {
        self.ensure_live("get_five_octet_long")?;
        numeric::get_five_octet(self.window(), index)
    }

    /// 大端 64 位有符号整数。
    fn get_long(&self, index: usize) -> Result<i64> {
        self.ensure_live("get_long")?;
        numeric::get_i64(self.window(), index)
    }

    /// 读取 `index` 处字节的第 `bit` 位（0 为最低位）。
    fn get_bit(&self, index: usize, bit: u8) -> Result<bool> {
        ensure_argument(bit < 8, "bit number must be within 0..8")?;
        self.get_u8(index).map(|b| (b & (1 << bit)) != 0)
    }

    /// 复制 `[start, start + len)` 为独立的字节向量。
    fn get_bytes(&self, start: usize, len: usize) -> Result<Vec<u8>> {
        self.ensure_live("get_bytes")?;
        let window = self.window();
        ensure_within(start, len, window.len())?;
        Ok(window[start..start + len].to_vec())
    }

    /// 严格查找：从 `start` 起最多扫描 `max_scan` 字节寻找任一 `targets`。
    ///
    /// 起点越界返回 `Ok(None)`；耗尽预算返回 [`BufferError::ByteNotFound`]。
    fn index_of(&self, start: usize, max_scan: usize, targets: &[u8]) -> Result<Option<usize>> {
        self.ensure_live("index_of")?;
        search::index_of(self.window(), start, max_scan, targets)
    }

    /// 安全查找：未命中与越界一律返回 `Ok(None)`。
    fn index_of_safe(
        &self,
        start: usize,
        max_scan: usize,
        targets: &[u8],
    ) -> Result<Option<usize>> {
        self.ensure_live("index_of_safe")?;
        search::index_of_safe(self.window(), start, max_scan, targets)
    }

    /// 从 `start` 起连续空白（SP/HTAB）的个数。
    fn count_whitespace(&self, start: usize) -> Result<usize> {
        self.ensure_live("count_whitespace")?;
        Ok(search::count_whitespace(self.window(), start))
    }

    /// `[start, start + max_scan)` 内 `target` 出现的次数。
    fn count_occurrences(&self, start: usize, max_scan: usize, target: u8) -> Result<usize> {
        self.ensure_live("count_occurrences")?;
        search::count_occurrences(self.window(), start, max_scan, target)
    }

    /// 可见字节是否以 `suffix` 结尾。
    fn ends_with(&self, suffix: &[u8]) -> Result<bool> {
        self.ensure_live("ends_with")?;
        search::ends_with(self.visible(), suffix)
    }

    /// 可见字节是否以 `prefix` 开头。
    fn starts_with(&self, prefix: &[u8]) -> Result<bool> {
        self.ensure_live("starts_with")?;
        search::starts_with(self.visible(), prefix)
    }

    /// 将全部可见字节按 `radix` 解析为 `i32`。
    fn parse_to_int(&self, radix: u32) -> Result<i32> {
        self.ensure_live("parse_to_int")?;
        numeric::parse_i32(self.visible(), radix)
    }

    /// 将全部可见字节按 `radix` 解析为 `i64`。
    fn parse_to_long(&self, radix: u32) -> Result<i64> {
        self.ensure_live("parse_to_long")?;
        numeric::parse_i64(self.visible(), radix)
    }

    /// 7 位 ASCII 大小写无关地比较两段可见字节。
    fn equals_ignore_case(&self, other: &dyn Buffer) -> Result<bool> {
        self.ensure_live("equals_ignore_case")?;
        other.ensure_live("equals_ignore_case")?;
        Ok(numeric::slices_eq_ignore_case(
            self.visible(),
            other.visible(),
        ))
    }

    /// 可见字节的 UTF-8 文本，非法序列以 U+FFFD 替换。
    fn to_utf8_string(&self) -> Result<String> {
        self.ensure_live("to_utf8_string")?;
        Ok(String::from_utf8_lossy(self.visible()).into_owned())
    }

    /// 可见字节的小写十六进制文本。
    fn to_hex_string(&self) -> Result<String> {
        self.ensure_live("to_hex_string")?;
        Ok(hex::encode(self.visible()))
    }

    /// 将 `index` 起的 4 字节渲染为点分十进制 IPv4 地址。
    fn to_ipv4_string(&self, index: usize) -> Result<String> {
        self.ensure_live("to_ipv4_string")?;
        let window = self.window();
        ensure_within(index, 4, window.len())?;
        let octets: [u8; 4] = [
            window[index],
            window[index + 1],
            window[index + 2],
            window[index + 3],
        ];
        Ok(Ipv4Addr::from(octets).to_string())
    }

    /// 将可见字节按 TBCD 解码为数字串；出现非数字半字节或位置不对的填充时返回 `NumberFormat`。
    fn to_tbcd_string(&self) -> Result<String> {
        self.ensure_live("to_tbcd_string")?;
        numeric::decode_tbcd(self.visible())
    }
}

/// 已冻结缓冲的统一错误。
pub(crate) fn frozen(operation: &'static str) -> BufferError {
    BufferError::IllegalState { operation }
}
