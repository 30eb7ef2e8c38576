use crate::error::Result;
use crate::numeric;
use crate::precondition::{ensure_argument, ensure_within};

use super::Buffer;

/// `WriteBuffer` 描述带写游标的就地写入能力。
///
/// # 设计背景（Why）
/// - 编码器需要两种写法：按偏移回填（例如先占位、后补长度字段）与顺序追加；
/// - 两者共享同一个窗口，但互不干扰：`set_*` 不移动写游标，`write_*` 只在写游标处追加。
///
/// # 契约说明（What）
/// - `set_*` 以容量为界校验，与写游标无关；
/// - `write_*` 在 `writer_index` 处写入并推进，剩余空间不足时返回越界错误且不写入任何字节；
/// - 写入的整数一律大端序，并按目标宽度截断；
/// - 冻结（`build`）后的缓冲对任何写操作返回 `IllegalState`。
///
/// # 风险提示（Trade-offs）
/// - 窗口容量固定，不会自动扩容；需要增长的场景应在更高层重新分配并复制。
pub trait WriteBuffer: Buffer {
    /// 写游标，相对于窗口下界。冻结后为 0。
    fn writer_index(&self) -> usize;

    /// 移动写游标；超过容量时返回越界错误。
    fn set_writer_index(&mut self, index: usize) -> Result<()>;

    /// 整个窗口（含未写入部分）的可变视图，已冻结时返回错误。
    fn storage_mut(&mut self, operation: &'static str) -> Result<&mut [u8]>;

    /// 剩余可写字节数；冻结后返回 0，不报错。
    fn writable_bytes(&self) -> usize {
        self.capacity().saturating_sub(self.writer_index())
    }

    /// 是否仍有可写空间。
    fn has_writable_bytes(&self) -> bool {
        self.writable_bytes() > 0
    }

    /// 在 `index` 写单字节。
    fn set_u8(&mut self, index: usize, value: u8) -> Result<()> {
        numeric::set_u8(self.storage_mut("set_u8")?, index, value)
    }

    /// 在 `index` 写有符号单字节。
    fn set_byte(&mut self, index: usize, value: i8) -> Result<()> {
        self.set_u8(index, value as u8)
    }

    /// 在 `index` 写大端 16 位。
    fn set_short(&mut self, index: usize, value: i16) -> Result<()> {
        numeric::set_i16(self.storage_mut("set_short")?, index, value)
    }

    /// 在 `index` 写无符号 16 位，截断 `value` 的高位。
    fn set_unsigned_short(&mut self, index: usize, value: i32) -> Result<()> {
        self.set_short(index, value as i16)
    }

    /// 在 `index` 写三字节整数。
    fn set_three_octet_int(&mut self, index: usize, value: i32) -> Result<()> {
        numeric::set_three_octet(self.storage_mut("set_three_octet_int")?, index, value)
    }

    /// 在 `index` 写大端 32 位。
    fn set_int(&mut self, index: usize, value: i32) -> Result<()> {
        numeric::set_i32(self.storage_mut("set_int")?, index, value)
    }

    /// 在 `index` 写无符号 32 位，截断 `value` 的高位。
    fn set_unsigned_int(&mut self, index: usize, value: i64) -> Result<()> {
        self.set_int(index, value as i32)
    }

    /// 在 `index` 写五字节整数。
    fn set_five_octet_long(&mut self, index: usize, value: i64) -> Result<()> {
        numeric::set_five_octet(self.storage_mut("set_five_octet_long")?, index, value)
    }

    /// 在 `index` 写大端 64 位。
    fn set_long(&mut self, index: usize, value: i64) -> Result<()> {
        numeric::set_i64(self.storage_mut("set_long")?, index, value)
    }

    /// 置位或清除 `index` 处字节的第 `bit` 位（0 为最低位）。
    fn set_bit(&mut self, index: usize, bit: u8, on: bool) -> Result<()> {
        ensure_argument(bit < 8, "bit number must be within 0..8")?;
        let storage = self.storage_mut("set_bit")?;
        let current = numeric::get_u8(storage, index)?;
        let updated = if on {
            current | (1 << bit)
        } else {
            current & !(1 << bit)
        };
        storage[index] = updated;
        Ok(())
    }

    /// 从 `index` 起覆盖写入 `src`。
    fn set_bytes(&mut self, index: usize, src: &[u8]) -> Result<()> {
        let storage = self.storage_mut("set_bytes")?;
        ensure_within(index, src.len(), storage.len())?;
        storage[index..index + src.len()].copy_from_slice(src);
        Ok(())
    }

    /// 追加单字节。
    fn write_u8(&mut self, value: u8) -> Result<()> {
        append(self, 1, "write_u8", |dst| numeric::set_u8(dst, 0, value))
    }

    /// 追加有符号单字节。
    fn write_byte(&mut self, value: i8) -> Result<()> {
        self.write_u8(value as u8)
    }

    /// 追加大端 16 位。
    fn write_short(&mut self, value: i16) -> Result<()> {
        append(self, 2, "write_short", |dst| numeric::set_i16(dst, 0, value))
    }

    /// 追加无符号 16 位，截断高位。
    fn write_unsigned_short(&mut self, value: i32) -> Result<()> {
        self.write_short(value as i16)
    }

    /// 追加三字节整数。
    fn write_three_octet_int(&mut self, value: i32) -> Result<()> {
        append(self, 3, "write_three_octet_int", |dst| {
            numeric::set_three_octet(dst, 0, value)
        })
    }

    /// 追加大端 32 位。
    fn write_int(&mut self, value: i32) -> Result<()> {
        append(self, 4, "write_int", |dst| numeric::set_i32(dst, 0, value))
    }

    /// 追加无符号 32 位，截断高位。
    fn write_unsigned_int(&mut self, value: i64) -> Result<()> {
        self.write_int(value as i32)
    }

    /// 追加五字节整数。
    fn write_five_octet_long(&mut self, value: i64) -> Result<()> {
        append(self, 5, "write_five_octet_long", |dst| {
            numeric::set_five_octet(dst, 0, value)
        })
    }

    /// 追加大端 64 位。
    fn write_long(&mut self, value: i64) -> Result<()> {
        append(self, 8, "write_long", |dst| numeric::set_i64(dst, 0, value))
    }

    /// 追加一段字节。
    fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        append(self, src.len(), "write_bytes", |dst| {
            dst.copy_from_slice(src);
            Ok(())
        })
    }

    /// 追加字符串的 UTF-8 字节。
    fn write_str(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())
    }

    /// 追加另一个缓冲的可见字节。
    fn write_buffer(&mut self, src: &dyn Buffer) -> Result<()> {
        src.ensure_live("write_buffer")?;
        self.write_bytes(src.visible())
    }

    /// 以 ASCII 十进制追加 `i32`，不经过中间字符串。
    fn write_as_string_i32(&mut self, value: i32) -> Result<()> {
        self.write_as_string_i64(i64::from(value))
    }

    /// 以 ASCII 十进制追加 `i64`，不经过中间字符串。
    fn write_as_string_i64(&mut self, value: i64) -> Result<()> {
        let len = numeric::decimal_len(value);
        append(self, len, "write_as_string", |dst| {
            numeric::encode_decimal(value, dst).map(drop)
        })
    }

    /// 以 TBCD 编码追加数字串；含非法字符时不写入任何字节。
    fn write_tbcd(&mut self, digits: &str) -> Result<()> {
        let encoded = numeric::encode_tbcd(digits)?;
        self.write_bytes(&encoded)
    }

    /// 用 `fill` 覆盖整个窗口（不仅是未写入部分），游标不变。
    fn zero_out(&mut self, fill: u8) -> Result<()> {
        self.storage_mut("zero_out")?.fill(fill);
        Ok(())
    }
}

/// 在写游标处写入 `width` 字节并推进。
///
/// 先做冻结与容量检查，再交给 `encode` 写入；任一步失败都不会移动写游标。
fn append<W, F>(buffer: &mut W, width: usize, operation: &'static str, encode: F) -> Result<()>
where
    W: WriteBuffer + ?Sized,
    F: FnOnce(&mut [u8]) -> Result<()>,
{
    buffer.ensure_live(operation)?;
    let at = buffer.writer_index();
    ensure_within(at, width, buffer.capacity())?;
    encode(&mut buffer.storage_mut(operation)?[at..at + width])?;
    buffer.set_writer_index(at + width)
}
