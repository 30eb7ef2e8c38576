//! 缓冲族性质验证
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：切片、解析、TBCD、冻结四类操作都有“对任意输入成立”的代数性质，
//!   用 Proptest 随机生成输入比手写样例更能暴露下标换算错误。
//! - **性质清单 (What)**：
//!   1. 切片长度等于区间长度，内容等于原窗口对应区间；
//!   2. 切片的切片等于一次性按合并偏移切片；
//!   3. 十进制编码后整段解析得到原值；
//!   4. TBCD 编码后解码得到原数字串（奇偶位数均覆盖）；
//!   5. 冻结后句柄上的任何调用都返回 `IllegalState`，冻结结果不受影响。
//!
//! # 设计考量 (Trade-offs)
//!
//! - 区间由 `(len, a, b)` 三元组归一化得到，保证总是合法区间，避免大量样本被 `prop_assume!` 丢弃。

use proptest::prelude::*;
use spark_buffer::{Buffer, BufferError, ReadBuffer, WriteBuffer, buffers};

/// 在 `0..=len` 上把任意两个数归一为有序区间。
fn ordered(len: usize, a: usize, b: usize) -> (usize, usize) {
    let (a, b) = (a % (len + 1), b % (len + 1));
    (a.min(b), a.max(b))
}

proptest! {
    #[test]
    fn prop_slice_matches_window(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        let (start, stop) = ordered(bytes.len(), a, b);
        let buffer = buffers::wrap(bytes.clone());
        let slice = buffer.slice(start, stop).unwrap();
        prop_assert_eq!(slice.capacity(), stop - start);
        prop_assert_eq!(slice.as_bytes(), &bytes[start..stop]);
        prop_assert_eq!(slice.is_empty_singleton(), start == stop);
    }

    #[test]
    fn prop_slices_compose(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
        outer in (any::<usize>(), any::<usize>()),
        inner in (any::<usize>(), any::<usize>()),
    ) {
        let (a, c) = ordered(bytes.len(), outer.0, outer.1);
        let (x, y) = ordered(c - a, inner.0, inner.1);
        let buffer = buffers::wrap(bytes);
        let twice = buffer.slice(a, c).unwrap().slice(x, y).unwrap();
        let once = buffer.slice(a + x, a + y).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_readable_slices_share_with_immutable(
        bytes in proptest::collection::vec(any::<u8>(), 1..128),
        skip in any::<usize>(),
    ) {
        let skip = skip % bytes.len();
        let mut reader = buffers::wrap(bytes.clone()).into_readable_buffer();
        reader.skip_bytes(skip).unwrap();
        prop_assert_eq!(reader.readable_bytes(), bytes.len() - skip);
        let remaining = reader.read_remaining().unwrap();
        prop_assert_eq!(remaining.as_bytes(), &bytes[skip..]);
        prop_assert!(!reader.has_readable_bytes());
    }

    #[test]
    fn prop_decimal_round_trip_i32(value in any::<i32>()) {
        let buffer = buffers::wrap_i32(value);
        prop_assert_eq!(buffer.to_string(), value.to_string());
        prop_assert_eq!(buffer.parse_to_int(10), Ok(value));
    }

    #[test]
    fn prop_decimal_round_trip_i64(value in any::<i64>()) {
        let mut writer = buffers::writable(20);
        writer.write_as_string_i64(value).unwrap();
        let frozen = writer.build().unwrap();
        prop_assert_eq!(frozen.to_string(), value.to_string());
        prop_assert_eq!(frozen.parse_to_long(10), Ok(value));
    }

    #[test]
    fn prop_tbcd_round_trip(digits in "[0-9]{0,40}") {
        let buffer = buffers::wrap_tbcd(&digits).unwrap();
        prop_assert_eq!(buffer.capacity(), digits.len().div_ceil(2));
        prop_assert_eq!(buffer.to_tbcd_string().unwrap(), digits);
    }

    #[test]
    fn prop_frozen_handle_rejects_everything(
        payload in proptest::collection::vec(any::<u8>(), 0..32),
        probe in any::<u8>(),
    ) {
        let mut writer = buffers::writable(32);
        writer.write_bytes(&payload).unwrap();
        let frozen = writer.build().unwrap();

        let illegal = |err: BufferError| matches!(err, BufferError::IllegalState { .. });
        prop_assert!(illegal(writer.write_u8(probe).unwrap_err()));
        prop_assert!(illegal(writer.set_u8(0, probe).unwrap_err()));
        prop_assert!(illegal(writer.zero_out(probe).unwrap_err()));
        prop_assert!(illegal(writer.get_u8(0).unwrap_err()));
        prop_assert!(illegal(writer.set_writer_index(0).unwrap_err()));
        prop_assert!(illegal(writer.build().unwrap_err()));
        prop_assert_eq!(writer.capacity(), 0);
        prop_assert_eq!(frozen.as_bytes(), payload.as_slice());
    }

    #[test]
    fn prop_read_write_reader_never_passes_writer(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..8), 0..8),
        rewind in any::<usize>(),
    ) {
        let mut buffer = buffers::read_write(64);
        for chunk in &chunks {
            buffer.write_bytes(chunk).unwrap();
            let readable = buffer.readable_bytes();
            buffer.skip_bytes(readable / 2).unwrap();
            prop_assert!(buffer.reader_index() <= buffer.writer_index());
        }
        let target = rewind % (buffer.writer_index() + 1);
        buffer.set_writer_index(target).unwrap();
        prop_assert!(buffer.reader_index() <= buffer.writer_index());
        prop_assert!(buffer.writer_index() <= buffer.capacity());
    }
}
