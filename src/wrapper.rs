//! 可重复读取、带进度回调的上传文件包装器。
//!
//! HTTP 客户端在认证重试时会重新读取请求体；普通文件句柄在第一次发送后
//! 停留在 EOF，无法再次使用。[`FileWrapper`] 在读到末尾或一次读取可能覆盖
//! 整个文件时自动回到偏移 0，使同一个实例可被多次发送。
//!
//! 同一实例只能被一个消费者顺序读取：`read` 需要 `&mut self`，偏移量与
//! 回绕行为不做任何同步。

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

use crate::error::WrapperError;
use crate::options::{ReadSize, WrapperOptions};
use crate::progress::{ProgressSampler, percent_of};

pub struct FileWrapper {
    name: String,
    inner: BufReader<File>,
    /// 打开时记录的大小，之后不再刷新。
    file_size: u64,
    force_size: Option<usize>,
    progress: ProgressSampler,
    in_memory_limit: u64,
}

impl FileWrapper {
    /// 以默认配置（只读、无回调、回调步长 100）打开文件。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WrapperError> {
        Self::open_with(path.as_ref(), WrapperOptions::default())
    }

    pub(crate) fn open_with(path: &Path, options: WrapperOptions) -> Result<Self, WrapperError> {
        let resolved = absolute_path(path)?;
        let open_error = |source: io::Error| WrapperError::Open {
            path: resolved.clone(),
            source,
        };
        let file = options
            .mode
            .open_options()
            .open(&resolved)
            .map_err(open_error)?;
        let file_size = file.metadata().map_err(open_error)?.len();
        let inner = match options.buffering.capacity() {
            Some(capacity) => BufReader::with_capacity(capacity, file),
            None => BufReader::new(file),
        };
        let name = resolved.to_string_lossy().replace('\\', "/");
        debug!(
            path = name,
            size = file_size,
            force_size = options.force_size,
            "open upload file"
        );

        Ok(Self {
            name,
            inner,
            file_size,
            force_size: options.force_size,
            progress: ProgressSampler::new(options.callback, options.callback_size),
            in_memory_limit: options.in_memory_limit,
        })
    }

    /// 绝对路径，分隔符统一为 `/`。
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 打开时记录的文件大小。
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn force_size(&self) -> Option<usize> {
        self.force_size
    }

    pub(crate) fn in_memory_limit(&self) -> u64 {
        self.in_memory_limit
    }

    /// 当前读取偏移。
    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        self.inner.rewind()
    }

    /// Reads up to `size` bytes, rewinding to offset 0 afterwards when the
    /// read came back empty or could have covered the whole file.
    ///
    /// A configured force size replaces `size`. The progress callback receives
    /// `floor(100 * size / file_size)` when that value is a multiple of the
    /// callback step; for [`ReadSize::All`] the size is the number of bytes
    /// returned.
    pub fn read(&mut self, size: ReadSize) -> io::Result<Vec<u8>> {
        let effective = match self.force_size {
            Some(forced) => ReadSize::Bytes(forced),
            None => size,
        };
        let (data, covers_file, percent_size) = match effective {
            ReadSize::All => {
                let data = self.read_raw(u64::MAX)?;
                let returned = data.len() as u64;
                (data, true, returned)
            }
            ReadSize::Bytes(bytes) => {
                let bytes = bytes as u64;
                (self.read_raw(bytes)?, bytes >= self.file_size, bytes)
            }
        };
        self.finish_read(data.is_empty() || covers_file, percent_size)?;
        Ok(data)
    }

    /// 关闭底层句柄。消费 `self`，因此无法重复关闭或在关闭后读取。
    pub fn close(self) {
        debug!(path = self.name, "close upload file");
        drop(self.inner);
    }

    /// 读取至多 `limit` 字节，不触发回绕与回调。
    pub(crate) fn read_raw(&mut self, limit: u64) -> io::Result<Vec<u8>> {
        let capacity = usize::try_from(limit.min(self.file_size)).unwrap_or(0);
        let mut data = Vec::with_capacity(capacity);
        self.inner.by_ref().take(limit).read_to_end(&mut data)?;
        Ok(data)
    }

    fn finish_read(&mut self, rewind: bool, percent_size: u64) -> io::Result<()> {
        if rewind {
            self.inner.rewind()?;
            debug!(path = self.name, "rewind upload file");
        }
        let percent = percent_of(percent_size, self.file_size);
        let fired = self.progress.sample(percent);
        trace!(path = self.name, size = percent_size, percent, fired, "read");
        Ok(())
    }
}

/// Bridges the wrapper into HTTP clients that accept a [`Read`] body and
/// read it until `Ok(0)`.
///
/// Requests `buf.len()` bytes (capped by the force size) and rewinds only on
/// a zero-byte read at EOF, so consumers looping until `Ok(0)` see exactly
/// one pass and leave the handle at offset 0. An empty `buf` reads nothing,
/// does not rewind and does not report progress.
///
/// Clients bounded by Content-Length (`read_exact`, `take(len)`) stop before
/// that final read and leave the handle at EOF; call
/// [`FileWrapper::rewind`] before re-sending the body.
impl Read for FileWrapper {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let len = self
            .force_size
            .map_or(buf.len(), |forced| forced.min(buf.len()));
        let buf = &mut buf[..len];
        let mut filled = 0;
        while filled < len {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        self.finish_read(filled == 0, filled as u64)?;
        Ok(filled)
    }
}

impl Seek for FileWrapper {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl fmt::Debug for FileWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileWrapper")
            .field("name", &self.name)
            .field("file_size", &self.file_size)
            .field("force_size", &self.force_size)
            .field("callback_step", &self.progress.step())
            .field("in_memory_limit", &self.in_memory_limit)
            .finish_non_exhaustive()
    }
}

/// 转为绝对路径并按词法规则去除 `.` 与 `..`，不访问文件系统。
fn absolute_path(path: &Path) -> Result<PathBuf, WrapperError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(WrapperError::CurrentDir)?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
