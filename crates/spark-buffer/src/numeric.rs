//! 数值编解码。
//!
//! ## 模块定位（Why）
//! - 协议报文中的定长整数一律按大端序（网络字节序）排列，另有 3 字节、5 字节两种奇数宽度字段；
//! - 文本协议需要把整数直接写成 ASCII 十进制、或把整段窗口解析回整数，且不经过中间 `String`；
//! - 电信协议（MAP/Diameter 等）使用 TBCD 半字节编码携带号码。
//!
//! ## 契约（What）
//! - `get_*`/`set_*` 的下标相对于传入切片，越界返回 [`BufferError::IndexOutOfBounds`]；
//! - 无符号读取扩宽到下一级有符号类型（`u8 -> i16`、`u16 -> i32`、`u32 -> i64`），
//!   写入则截断到目标宽度；
//! - 大小写无关比较只折叠 7 位 ASCII 字母，其它字节（包括 UTF-8 多字节序列）必须逐字节相等。

use alloc::{string::String, vec::Vec};

use crate::error::{BufferError, Result};
use crate::precondition::{ensure_radix, ensure_within};

#[inline]
fn array<const N: usize>(bytes: &[u8], index: usize) -> Result<[u8; N]> {
    ensure_within(index, N, bytes.len())?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[index..index + N]);
    Ok(out)
}

#[inline]
fn put<const N: usize>(bytes: &mut [u8], index: usize, value: [u8; N]) -> Result<()> {
    ensure_within(index, N, bytes.len())?;
    bytes[index..index + N].copy_from_slice(&value);
    Ok(())
}

/// 读取单字节。
#[inline]
pub fn get_u8(bytes: &[u8], index: usize) -> Result<u8> {
    bytes
        .get(index)
        .copied()
        .ok_or(BufferError::out_of_bounds(index, 1, bytes.len()))
}

/// 大端 16 位有符号整数。
pub fn get_i16(bytes: &[u8], index: usize) -> Result<i16> {
    array(bytes, index).map(i16::from_be_bytes)
}

/// 大端 16 位无符号整数，扩宽为 `i32`。
pub fn get_unsigned_i16(bytes: &[u8], index: usize) -> Result<i32> {
    array(bytes, index).map(|raw| i32::from(u16::from_be_bytes(raw)))
}

/// 大端 24 位（三字节）无符号整数，结果位于 `0..=0x00FF_FFFF`。
pub fn get_three_octet(bytes: &[u8], index: usize) -> Result<i32> {
    let [a, b, c] = array::<3>(bytes, index)?;
    Ok(i32::from_be_bytes([0, a, b, c]))
}

/// 大端 32 位有符号整数。
pub fn get_i32(bytes: &[u8], index: usize) -> Result<i32> {
    array(bytes, index).map(i32::from_be_bytes)
}

/// 大端 32 位无符号整数，扩宽为 `i64`。
pub fn get_unsigned_i32(bytes: &[u8], index: usize) -> Result<i64> {
    array(bytes, index).map(|raw| i64::from(u32::from_be_bytes(raw)))
}

/// 大端 40 位（五字节）无符号整数。
pub fn get_five_octet(bytes: &[u8], index: usize) -> Result<i64> {
    let [a, b, c, d, e] = array::<5>(bytes, index)?;
    Ok(i64::from_be_bytes([0, 0, 0, a, b, c, d, e]))
}

/// 大端 64 位有符号整数。
pub fn get_i64(bytes: &[u8], index: usize) -> Result<i64> {
    array(bytes, index).map(i64::from_be_bytes)
}

/// 写单字节。
#[inline]
pub fn set_u8(bytes: &mut [u8], index: usize, value: u8) -> Result<()> {
    put(bytes, index, [value])
}

/// 写大端 16 位。
pub fn set_i16(bytes: &mut [u8], index: usize, value: i16) -> Result<()> {
    put(bytes, index, value.to_be_bytes())
}

/// 写大端 24 位，仅保留 `value` 的低 24 位。
pub fn set_three_octet(bytes: &mut [u8], index: usize, value: i32) -> Result<()> {
    let [_, a, b, c] = value.to_be_bytes();
    put(bytes, index, [a, b, c])
}

/// 写大端 32 位。
pub fn set_i32(bytes: &mut [u8], index: usize, value: i32) -> Result<()> {
    put(bytes, index, value.to_be_bytes())
}

/// 写大端 40 位，仅保留 `value` 的低 40 位。
pub fn set_five_octet(bytes: &mut [u8], index: usize, value: i64) -> Result<()> {
    let [_, _, _, a, b, c, d, e] = value.to_be_bytes();
    put(bytes, index, [a, b, c, d, e])
}

/// 写大端 64 位。
pub fn set_i64(bytes: &mut [u8], index: usize, value: i64) -> Result<()> {
    put(bytes, index, value.to_be_bytes())
}

/// `00`..`99` 两位数字查找表，十进制编码每轮写出两位。
const DIGIT_PAIRS: &[u8; 200] = b"\
0001020304050607080910111213141516171819\
2021222324252627282930313233343536373839\
4041424344454647484950515253545556575859\
6061626364656667686970717273747576777879\
8081828384858687888990919293949596979899";

/// `value` 的十进制表示所需字节数（含负号）。
pub fn decimal_len(value: i64) -> usize {
    let mut magnitude = value.unsigned_abs();
    let mut len = usize::from(value < 0) + 1;
    while magnitude >= 10 {
        magnitude /= 10;
        len += 1;
    }
    len
}

/// 将 `value` 的十进制表示写入 `dst` 开头，返回写入的字节数。
///
/// # 教案式说明
/// - **How**：先用 [`decimal_len`] 确定总长度，再从尾部向前每轮写两位（查 [`DIGIT_PAIRS`]），
///   最后补一位和负号。取绝对值使用 `unsigned_abs`，因此 `i64::MIN` 无需特殊分支。
/// - **What**：调用方需保证 `dst.len() >= decimal_len(value)`，否则返回越界错误且 `dst` 不变。
pub fn encode_decimal(value: i64, dst: &mut [u8]) -> Result<usize> {
    let len = decimal_len(value);
    ensure_within(0, len, dst.len())?;
    let mut magnitude = value.unsigned_abs();
    let mut pos = len;
    while magnitude >= 100 {
        let pair = (magnitude % 100) as usize * 2;
        magnitude /= 100;
        pos -= 2;
        dst[pos..pos + 2].copy_from_slice(&DIGIT_PAIRS[pair..pair + 2]);
    }
    if magnitude >= 10 {
        let pair = magnitude as usize * 2;
        pos -= 2;
        dst[pos..pos + 2].copy_from_slice(&DIGIT_PAIRS[pair..pair + 2]);
    } else {
        pos -= 1;
        dst[pos] = b'0' + magnitude as u8;
    }
    if value < 0 {
        pos -= 1;
        dst[pos] = b'-';
    }
    debug_assert_eq!(pos, 0);
    Ok(len)
}

/// 十进制编码为独立的字节向量。
pub fn decimal_bytes(value: i64) -> Vec<u8> {
    let mut out = alloc::vec![0u8; decimal_len(value)];
    // 长度由 decimal_len 精确给出，不会越界。
    let _ = encode_decimal(value, &mut out);
    out
}

/// 以 `min..=max` 为值域、按 `radix` 解析整个字节序列。
///
/// 沿用“在负数空间累加”的经典算法，使 `min` 的绝对值比 `max` 多出的那一个量级也能被接受。
fn parse_signed(bytes: &[u8], radix: u32, min: i64, max: i64) -> Result<i64> {
    ensure_radix(radix)?;
    let Some(&first) = bytes.first() else {
        return Err(BufferError::number_format("empty input"));
    };

    let (negative, digits) = match first {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return Err(BufferError::number_format("lone sign character"));
    }

    let limit = if negative { min } else { -max };
    let radix = i64::from(radix);
    let multmin = limit / radix;
    let mut acc: i64 = 0;
    for &byte in digits {
        let digit = char::from(byte)
            .to_digit(radix as u32)
            .ok_or_else(|| {
                BufferError::number_format(alloc::format!(
                    "byte 0x{byte:02x} is not a digit in radix {radix}"
                ))
            })?;
        let digit = i64::from(digit);
        if acc < multmin {
            return Err(overflow());
        }
        acc *= radix;
        if acc < limit + digit {
            return Err(overflow());
        }
        acc -= digit;
    }
    Ok(if negative { acc } else { -acc })
}

fn overflow() -> BufferError {
    BufferError::number_format("value out of range")
}

/// 将整段字节解析为 `i32`。
pub fn parse_i32(bytes: &[u8], radix: u32) -> Result<i32> {
    parse_signed(bytes, radix, i64::from(i32::MIN), i64::from(i32::MAX)).map(|v| v as i32)
}

/// 将整段字节解析为 `i64`。
pub fn parse_i64(bytes: &[u8], radix: u32) -> Result<i64> {
    parse_signed(bytes, radix, i64::MIN, i64::MAX)
}

/// TBCD 中表示“无数字”的填充半字节。
pub const TBCD_FILLER: u8 = 0x0F;

/// 将数字串编码为 TBCD：每字节先低半字节后高半字节，奇数个数字时末字节高半字节填 `0xF`。
///
/// 只接受 `0-9`；其余字符返回 [`BufferError::InvalidArgument`]。
pub fn encode_tbcd(digits: &str) -> Result<Vec<u8>> {
    let raw = digits.as_bytes();
    let mut out = Vec::with_capacity(raw.len().div_ceil(2));
    for pair in raw.chunks(2) {
        let low = nibble_of(pair[0])?;
        let high = match pair.get(1) {
            Some(&ch) => nibble_of(ch)?,
            None => TBCD_FILLER,
        };
        out.push(low | (high << 4));
    }
    Ok(out)
}

fn nibble_of(ch: u8) -> Result<u8> {
    if ch.is_ascii_digit() {
        Ok(ch - b'0')
    } else {
        Err(BufferError::invalid_argument(alloc::format!(
            "byte 0x{ch:02x} is not a decimal digit"
        )))
    }
}

/// 解码 TBCD：逐字节输出低、高半字节。
///
/// 填充半字节 `0xF` 只允许出现在最后一个字节的高半字节；其余位置的 `0xF`
/// 以及 `0xA..=0xE` 都不是十进制数字，返回 [`BufferError::NumberFormat`]。
pub fn decode_tbcd(bytes: &[u8]) -> Result<String> {
    let mut out = String::with_capacity(bytes.len() * 2);
    let last = bytes.len().saturating_sub(1);
    for (position, &byte) in bytes.iter().enumerate() {
        let (low, high) = (byte & 0x0F, byte >> 4);
        out.push(digit_of(low, byte)?);
        if high == TBCD_FILLER && position == last {
            break;
        }
        out.push(digit_of(high, byte)?);
    }
    Ok(out)
}

fn digit_of(nibble: u8, byte: u8) -> Result<char> {
    if nibble <= 9 {
        Ok(char::from(b'0' + nibble))
    } else {
        Err(BufferError::number_format(alloc::format!(
            "TBCD byte 0x{byte:02x} carries non-digit nibble 0x{nibble:x}"
        )))
    }
}

/// 7 位 ASCII 大小写无关的字节比较。
///
/// 两个字节都是 ASCII 字母时只比较低 5 位；否则必须完全相等。
/// 高位为 1 的字节（UTF-8 多字节序列的所有组成字节）因此永远按原值比较。
#[inline]
pub const fn eq_ignore_case(a: u8, b: u8) -> bool {
    if a == b {
        return true;
    }
    a.is_ascii_alphabetic() && b.is_ascii_alphabetic() && (a & 0x1F) == (b & 0x1F)
}

/// 对两段字节逐一应用 [`eq_ignore_case`]。
pub fn slices_eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq_ignore_case(*x, *y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_round_trips_at_offsets() {
        let mut bytes = [0u8; 16];
        set_i32(&mut bytes, 1, -2).unwrap();
        assert_eq!(get_i32(&bytes, 1).unwrap(), -2);
        assert_eq!(get_unsigned_i32(&bytes, 1).unwrap(), 0xFFFF_FFFE);
        set_i16(&mut bytes, 6, -1).unwrap();
        assert_eq!(get_unsigned_i16(&bytes, 6).unwrap(), 0xFFFF);
        set_i64(&mut bytes, 8, i64::MIN).unwrap();
        assert_eq!(get_i64(&bytes, 8).unwrap(), i64::MIN);
        assert!(get_i64(&bytes, 9).is_err());
    }

    #[test]
    fn odd_widths_truncate_on_write() {
        let mut bytes = [0u8; 8];
        set_three_octet(&mut bytes, 0, 0x7A12_3456).unwrap();
        assert_eq!(&bytes[..3], &[0x12, 0x34, 0x56]);
        assert_eq!(get_three_octet(&bytes, 0).unwrap(), 0x12_3456);

        set_five_octet(&mut bytes, 3, -1).unwrap();
        assert_eq!(get_five_octet(&bytes, 3).unwrap(), 0xFF_FFFF_FFFF);
        assert_eq!(
            get_three_octet(&bytes, 6),
            Err(BufferError::out_of_bounds(6, 3, 8))
        );
    }

    #[test]
    fn decimal_encoding_boundaries() {
        for (value, text) in [
            (0i64, "0"),
            (9, "9"),
            (10, "10"),
            (99, "99"),
            (100, "100"),
            (-1, "-1"),
            (-10, "-10"),
            (i64::from(i32::MIN), "-2147483648"),
            (i64::from(i32::MAX), "2147483647"),
            (i64::MIN, "-9223372036854775808"),
            (i64::MAX, "9223372036854775807"),
        ] {
            assert_eq!(decimal_len(value), text.len(), "{value}");
            assert_eq!(decimal_bytes(value), text.as_bytes(), "{value}");
        }
    }

    #[test]
    fn encode_decimal_rejects_short_destination() {
        let mut dst = [0u8; 2];
        assert!(encode_decimal(-10, &mut dst).is_err());
        assert_eq!(dst, [0, 0]);
    }

    #[test]
    fn parse_follows_standard_integer_rules() {
        assert_eq!(parse_i32(b"0", 10).unwrap(), 0);
        assert_eq!(parse_i32(b"-2147483648", 10).unwrap(), i32::MIN);
        assert_eq!(parse_i32(b"+2147483647", 10).unwrap(), i32::MAX);
        assert_eq!(parse_i32(b"ff", 16).unwrap(), 255);
        assert_eq!(parse_i32(b"-Zz", 36).unwrap(), -(35 * 36 + 35));
        assert!(parse_i32(b"2147483648", 10).is_err());
        assert!(parse_i32(b"-2147483649", 10).is_err());
        assert!(parse_i32(b"", 10).is_err());
        assert!(parse_i32(b"-", 10).is_err());
        assert!(parse_i32(b"+", 10).is_err());
        assert!(parse_i32(b"12a", 10).is_err());
        assert!(parse_i32(b"12", 1).is_err());
        assert!(parse_i32(b"12", 37).is_err());
        assert_eq!(parse_i64(b"-9223372036854775808", 10).unwrap(), i64::MIN);
        assert!(parse_i64(b"9223372036854775808", 10).is_err());
    }

    #[test]
    fn tbcd_even_and_odd() {
        assert_eq!(encode_tbcd("1234").unwrap(), [0x21, 0x43]);
        assert_eq!(encode_tbcd("123").unwrap(), [0x21, 0xF3]);
        assert_eq!(decode_tbcd(&[0x21, 0xF3]).unwrap(), "123");
        assert_eq!(decode_tbcd(&[0x21, 0x43]).unwrap(), "1234");
        assert_eq!(decode_tbcd(&[0xF1]).unwrap(), "1");
        assert!(encode_tbcd("12x").is_err());
        assert!(encode_tbcd("").unwrap().is_empty());
    }

    #[test]
    fn tbcd_encode_accepts_decimal_digits_only() {
        for text in ["12*", "#", "1a", "12 "] {
            assert!(
                matches!(encode_tbcd(text), Err(BufferError::InvalidArgument { .. })),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn tbcd_filler_only_closes_the_last_byte() {
        assert!(matches!(
            decode_tbcd(&[0x1F, 0x32]),
            Err(BufferError::NumberFormat { .. })
        ));
        assert!(matches!(
            decode_tbcd(&[0xF1, 0x32]),
            Err(BufferError::NumberFormat { .. })
        ));
        assert!(matches!(
            decode_tbcd(&[0x2F]),
            Err(BufferError::NumberFormat { .. })
        ));
        assert!(matches!(
            decode_tbcd(&[0xBA]),
            Err(BufferError::NumberFormat { .. })
        ));
        assert_eq!(decode_tbcd(&[]).unwrap(), "");
    }

    #[test]
    fn case_folding_is_ascii_only() {
        assert!(eq_ignore_case(b'A', b'a'));
        assert!(eq_ignore_case(b'z', b'Z'));
        assert!(!eq_ignore_case(b'A', b'b'));
        // '@'(0x40) 与 '`'(0x60) 低 5 位相同，但不是字母。
        assert!(!eq_ignore_case(b'@', b'`'));
        assert!(!slices_eq_ignore_case(&[0xC0, 0x8F], &[0xC0, 0xAF]));
        assert!(slices_eq_ignore_case(b"Content-Length", b"content-length"));
    }
}
