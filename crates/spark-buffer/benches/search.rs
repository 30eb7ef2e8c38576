use criterion::{Criterion, black_box};
use spark_buffer::{Buffer, ReadBuffer, WriteBuffer, buffers};
use std::{env, time::Duration};

/// 协议分帧热路径基准：单字节查找与 CRLF 扫描。
///
/// # 设计背景（Why）
/// - SIP/HTTP 解析器的大部分时间花在“找分隔符”上，查找算法的回归会直接拉低吞吐；
/// - 报文取自典型 SIP 请求头，约 30 行，正文为空。
///
/// # 逻辑解析（How）
/// - `index_of_semicolon`：在整段报文中找第一个 `;`；
/// - `read_header_lines`：逐行 `read_until_single_crlf` 直到头部结束；
/// - `write_then_frame`：写入读写缓冲后用双 CRLF 截出头部块。
fn bench_search(c: &mut Criterion) {
    let message = sample_message();
    let buffer = buffers::wrap(message.clone());

    c.bench_function("index_of_semicolon", |b| {
        b.iter(|| black_box(buffer.index_of_safe(0, usize::MAX, b";").unwrap()));
    });

    c.bench_function("read_header_lines", |b| {
        b.iter(|| {
            let mut reader = buffer.to_readable_buffer();
            let mut lines = 0usize;
            while let Some(line) = reader.read_until_single_crlf_safe().unwrap() {
                if line.is_empty() {
                    break;
                }
                lines += 1;
            }
            black_box(lines)
        });
    });

    c.bench_function("write_then_frame", |b| {
        b.iter(|| {
            let mut framer = buffers::read_write(message.len());
            framer.write_bytes(&message).unwrap();
            black_box(framer.read_until_double_crlf().unwrap())
        });
    });
}

fn sample_message() -> Vec<u8> {
    let mut text = String::from("INVITE sip:bob@biloxi.example.com SIP/2.0\r\n");
    for i in 0..28 {
        text.push_str(&format!(
            "X-Header-{i}: value-{i}; tag=abcdef{i}; branch=z9hG4bK{i}\r\n"
        ));
    }
    text.push_str("\r\n");
    text.into_bytes()
}

fn main() {
    let mut quick_mode = false;
    for arg in env::args().skip(1) {
        if arg == "--quick" {
            quick_mode = true;
        }
    }

    let mut criterion = Criterion::default();
    if quick_mode {
        criterion = criterion
            .sample_size(10)
            .warm_up_time(Duration::from_millis(100))
            .measurement_time(Duration::from_millis(250));
    }

    bench_search(&mut criterion);
    criterion.final_summary();
}
