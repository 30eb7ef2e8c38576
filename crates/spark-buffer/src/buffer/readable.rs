use crate::cursor::ReaderCursor;
use crate::error::{BufferError, Result};
use crate::immutable::ImmutableBuffer;
use crate::numeric;
use crate::precondition::ensure_within;
use crate::search::{self, CR, LF, Scan, Terminated};

use super::Buffer;

/// `ReadBuffer` 在 [`Buffer`] 之上增加读游标。
///
/// # 设计背景（Why）
/// - 协议解析是“读一段、判断、再读一段”的过程，需要一个可标记、可回退的游标；
/// - 游标只是位置状态，读出的片段仍与源缓冲共享存储（读写缓冲除外，见下）。
///
/// # 契约说明（What）
/// - 读取上界为 `window().len()`：游标读缓冲即容量，读写缓冲即写游标，永远读不到未写入的字节；
/// - 所有 `read_*` 成功时推进游标，失败时游标保持调用前位置；唯一例外是严格的
///   [`read_until`](Self::read_until)，耗尽预算后游标停在扫描终点；
/// - CRLF 扫描失败一律回退到起点；
/// - `index_of`/`count_occurrences` 等 [`Buffer`] 方法从不移动游标。
///
/// # 风险提示（Trade-offs）
/// - 读写缓冲的存储仍在变化，`read_bytes` 等方法在其上返回的是复制出的只读缓冲。
pub trait ReadBuffer: Buffer {
    /// 只读访问游标。
    fn cursor(&self) -> &ReaderCursor;

    /// 可变访问游标；调用方负责上界校验，通常应使用本 trait 的默认方法。
    fn cursor_mut(&mut self) -> &mut ReaderCursor;

    /// 当前读位置；冻结后窗口已收缩，恒为 0。
    fn reader_index(&self) -> usize {
        self.cursor().index()
    }

    /// 移动读位置；超过读取上界时返回越界错误。
    fn set_reader_index(&mut self, index: usize) -> Result<()> {
        self.ensure_live("set_reader_index")?;
        ensure_within(index, 0, self.window().len())?;
        self.cursor_mut().set(index);
        Ok(())
    }

    /// 记录当前读位置。
    fn mark_reader_index(&mut self) -> Result<()> {
        self.ensure_live("mark_reader_index")?;
        self.cursor_mut().mark();
        Ok(())
    }

    /// 回到最近一次标记位置；从未标记时回到 0。
    fn reset_reader_index(&mut self) -> Result<()> {
        self.ensure_live("reset_reader_index")?;
        self.cursor_mut().reset();
        Ok(())
    }

    /// 剩余可读字节数。
    ///
    /// 与 [`capacity`](Buffer::capacity) 一样不做冻结检查，冻结后返回 0。
    fn readable_bytes(&self) -> usize {
        self.window().len().saturating_sub(self.reader_index())
    }

    /// 是否仍有可读字节。
    fn has_readable_bytes(&self) -> bool {
        self.readable_bytes() > 0
    }

    /// 查看下一个字节但不消费。
    fn peek_byte(&self) -> Result<u8> {
        self.ensure_live("peek_byte")?;
        numeric::get_u8(self.window(), self.reader_index())
    }

    /// 跳过 `len` 字节。
    fn skip_bytes(&mut self, len: usize) -> Result<()> {
        self.ensure_live("skip_bytes")?;
        ensure_within(self.reader_index(), len, self.window().len())?;
        self.cursor_mut().advance(len);
        Ok(())
    }

    /// 读取无符号单字节。
    fn read_u8(&mut self) -> Result<u8> {
        read_fixed(self, 1, "read_u8", numeric::get_u8)
    }

    /// 读取有符号单字节。
    fn read_byte(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// 读取无符号单字节并扩宽为 `i16`。
    fn read_unsigned_byte(&mut self) -> Result<i16> {
        self.read_u8().map(i16::from)
    }

    /// 读取大端 16 位有符号整数。
    fn read_short(&mut self) -> Result<i16> {
        read_fixed(self, 2, "read_short", numeric::get_i16)
    }

    /// 读取大端 16 位无符号整数。
    fn read_unsigned_short(&mut self) -> Result<i32> {
        read_fixed(self, 2, "read_unsigned_short", numeric::get_unsigned_i16)
    }

    /// 读取大端三字节无符号整数。
    fn read_three_octet_int(&mut self) -> Result<i32> {
        read_fixed(self, 3, "read_three_octet_int", numeric::get_three_octet)
    }

    /// 读取大端 32 位有符号整数。
    fn read_int(&mut self) -> Result<i32> {
        read_fixed(self, 4, "read_int", numeric::get_i32)
    }

    /// 读取大端 32 位无符号整数。
    fn read_unsigned_int(&mut self) -> Result<i64> {
        read_fixed(self, 4, "read_unsigned_int", numeric::get_unsigned_i32)
    }

    /// 读取大端五字节无符号整数。
    fn read_five_octet_long(&mut self) -> Result<i64> {
        read_fixed(self, 5, "read_five_octet_long", numeric::get_five_octet)
    }

    /// 读取大端 64 位有符号整数。
    fn read_long(&mut self) -> Result<i64> {
        read_fixed(self, 8, "read_long", numeric::get_i64)
    }

    /// 读出接下来的 `len` 字节并推进游标；剩余不足时返回越界错误且游标不动。
    fn read_bytes(&mut self, len: usize) -> Result<ImmutableBuffer> {
        self.ensure_live("read_bytes")?;
        let start = self.reader_index();
        ensure_within(start, len, self.window().len())?;
        let out = self.view_range(start, start + len);
        self.cursor_mut().advance(len);
        Ok(out)
    }

    /// 读出全部剩余字节。
    fn read_remaining(&mut self) -> Result<ImmutableBuffer> {
        let len = self.readable_bytes();
        self.read_bytes(len)
    }

    /// 读到任一 `targets` 为止（严格）。
    ///
    /// 命中时返回终止字节之前的内容，游标越过终止字节；
    /// 扫描 `max_scan` 字节仍未命中时返回 [`BufferError::ByteNotFound`]，游标停在扫描终点。
    fn read_until(&mut self, max_scan: usize, targets: &[u8]) -> Result<ImmutableBuffer> {
        self.ensure_live("read_until")?;
        let start = self.reader_index();
        let outcome = search::scan(self.window(), start, max_scan, targets)?;
        match outcome {
            Scan::Found(index) => Ok(take(self, index - start, index - start + 1)),
            Scan::OutOfRange => Err(search::not_found(0, targets)),
            Scan::Exhausted { scanned } => {
                self.cursor_mut().advance(scanned);
                Err(search::not_found(scanned, targets))
            }
        }
    }

    /// 读到任一 `targets` 为止（安全）：未命中返回 `Ok(None)` 且游标不动。
    fn read_until_safe(
        &mut self,
        max_scan: usize,
        targets: &[u8],
    ) -> Result<Option<ImmutableBuffer>> {
        self.ensure_live("read_until_safe")?;
        let start = self.reader_index();
        let outcome = search::scan(self.window(), start, max_scan, targets)?;
        match outcome {
            Scan::Found(index) => Ok(Some(take(self, index - start, index - start + 1))),
            Scan::OutOfRange | Scan::Exhausted { .. } => Ok(None),
        }
    }

    /// 读到下一个 SP/HTAB（消费该空白字节）；没有空白时读出全部剩余字节。
    fn read_until_whitespace(&mut self) -> Result<ImmutableBuffer> {
        self.ensure_live("read_until_whitespace")?;
        let start = self.reader_index();
        let found = self.window()[start..]
            .iter()
            .position(|b| search::is_whitespace(*b));
        match found {
            Some(offset) => Ok(take(self, offset, offset + 1)),
            None => self.read_remaining(),
        }
    }

    /// 消费连续空白，返回消费的字节数。
    fn consume_whitespace(&mut self) -> Result<usize> {
        self.ensure_live("consume_whitespace")?;
        let count = search::count_whitespace(self.window(), self.reader_index());
        self.cursor_mut().advance(count);
        Ok(count)
    }

    /// 读到单个 CRLF 为止（严格）：未命中返回 [`BufferError::ByteNotFound`]，游标回到起点。
    fn read_until_single_crlf(&mut self) -> Result<ImmutableBuffer> {
        let readable = self.readable_bytes();
        self.read_until_single_crlf_safe()?
            .ok_or_else(|| search::not_found(readable, &[CR, LF]))
    }

    /// 读到单个 CRLF 为止（安全）：未命中返回 `Ok(None)`，游标回到起点。
    fn read_until_single_crlf_safe(&mut self) -> Result<Option<ImmutableBuffer>> {
        self.ensure_live("read_until_single_crlf")?;
        let hit = search::single_crlf(&self.window()[self.reader_index()..]);
        Ok(hit.map(|hit| take_terminated(self, hit)))
    }

    /// 读到双 CRLF 为止（严格）：返回头部块（不含分隔符），游标停在正文起点。
    fn read_until_double_crlf(&mut self) -> Result<ImmutableBuffer> {
        let readable = self.readable_bytes();
        self.read_until_double_crlf_safe()?
            .ok_or_else(|| search::not_found(readable, &[CR, LF, CR, LF]))
    }

    /// 读到双 CRLF 为止（安全）。
    fn read_until_double_crlf_safe(&mut self) -> Result<Option<ImmutableBuffer>> {
        self.ensure_live("read_until_double_crlf")?;
        let hit = search::double_crlf(&self.window()[self.reader_index()..]);
        Ok(hit.map(|hit| take_terminated(self, hit)))
    }

    /// 宽松读行，规则见 [`search::line`]；没有任何可读字节时返回 `Ok(None)`。
    fn read_line(&mut self) -> Result<Option<ImmutableBuffer>> {
        self.ensure_live("read_line")?;
        let hit = search::line(&self.window()[self.reader_index()..]);
        Ok(hit.map(|hit| take_terminated(self, hit)))
    }

    /// 读取游标处的十进制整数：可选负号后跟至少一位数字，遇到非数字即停止。
    ///
    /// 解析失败（没有数字或溢出）时游标不动。
    fn read_decimal_int(&mut self) -> Result<i32> {
        self.ensure_live("read_decimal_int")?;
        let start = self.reader_index();
        let rest = &self.window()[start..];
        let sign = usize::from(rest.first() == Some(&b'-'));
        let digits = rest[sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return Err(BufferError::number_format("no decimal digits at reader index"));
        }
        let value = numeric::parse_i32(&rest[..sign + digits], 10)?;
        self.cursor_mut().advance(sign + digits);
        Ok(value)
    }

    /// 从游标起严格查找，不移动游标；返回值为窗口内下标。
    fn find(&self, max_scan: usize, targets: &[u8]) -> Result<Option<usize>> {
        self.index_of(self.reader_index(), max_scan, targets)
    }
}

/// 按固定宽度读取并推进游标。
fn read_fixed<B, T>(
    buffer: &mut B,
    width: usize,
    operation: &'static str,
    decode: fn(&[u8], usize) -> Result<T>,
) -> Result<T>
where
    B: ReadBuffer + ?Sized,
{
    buffer.ensure_live(operation)?;
    let value = decode(buffer.window(), buffer.reader_index())?;
    buffer.cursor_mut().advance(width);
    Ok(value)
}

/// 取出游标处 `content` 字节作为结果，并推进 `consumed` 字节。
fn take<B: ReadBuffer + ?Sized>(buffer: &mut B, content: usize, consumed: usize) -> ImmutableBuffer {
    let start = buffer.reader_index();
    let out = buffer.view_range(start, start + content);
    buffer.cursor_mut().advance(consumed);
    out
}

fn take_terminated<B: ReadBuffer + ?Sized>(buffer: &mut B, hit: Terminated) -> ImmutableBuffer {
    take(buffer, hit.content, hit.consumed)
}
