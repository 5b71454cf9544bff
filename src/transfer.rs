//! 按 HTTP 客户端的方式消费包装器：按 Content-Length 发送一次完整请求体。

use std::io::{self, Write};
use tracing::debug;

use crate::options::ReadSize;
use crate::wrapper::FileWrapper;

/// Sends one complete body pass to `sink` using `read(size)` calls.
///
/// Stops once `file_size` bytes were written or a read comes back empty, and
/// never writes more than `file_size` bytes. A leading empty read means the
/// previous pass ended on EOF; that read already rewound the wrapper, so it is
/// retried once. Calling this again re-sends the body, which is what an
/// authentication retry does.
pub fn send_body<W: Write>(
    wrapper: &mut FileWrapper,
    size: ReadSize,
    sink: &mut W,
) -> io::Result<u64> {
    let total = wrapper.file_size();
    let mut sent = 0u64;
    let mut retried = false;

    while sent < total {
        let data = wrapper.read(size)?;
        if data.is_empty() {
            if sent == 0 && !retried {
                retried = true;
                continue;
            }
            break;
        }
        let wanted = usize::try_from(total - sent).unwrap_or(usize::MAX);
        let chunk = &data[..data.len().min(wanted)];
        sink.write_all(chunk)?;
        sent += chunk.len() as u64;
    }
    sink.flush()?;

    debug!(path = wrapper.name(), sent, total, "body pass sent");
    Ok(sent)
}

/// 将 `read_chunked` 产出的全部块写入 `sink`，不回绕。
pub fn send_chunked<W: Write>(
    wrapper: &mut FileWrapper,
    block_size: usize,
    chunk_limit: Option<usize>,
    sink: &mut W,
) -> io::Result<u64> {
    let mut sent = 0u64;
    let mut blocks = 0usize;
    for block in wrapper.read_chunked(block_size, chunk_limit) {
        let block = block?;
        sink.write_all(&block)?;
        sent += block.len() as u64;
        blocks += 1;
    }
    sink.flush()?;

    debug!(path = wrapper.name(), sent, blocks, "chunked pass sent");
    Ok(sent)
}
