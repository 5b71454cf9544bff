//! 包装器构造选项：打开模式、缓冲、强制块大小与进度回调。

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;

use crate::error::WrapperError;
use crate::wrapper::FileWrapper;

/// 默认回调步长（百分比），即仅在 0% 与 100% 处回调。
pub const DEFAULT_CALLBACK_SIZE: u32 = 100;
/// 小于等于该大小的文件在分块读取时一次性载入内存。
pub const IN_MEMORY_LIMIT: u64 = 50_000_000;
/// 分块读取的默认块大小。
pub const DEFAULT_BLOCK_SIZE: usize = 127_000_000;

/// 进度回调，参数为本次读取对应的百分比。
pub type ProgressCallback = Box<dyn FnMut(u64) + Send>;

/// 单次读取请求的字节数。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadSize {
    /// 读取剩余的全部内容。
    All,
    Bytes(usize),
}

impl ReadSize {
    /// Maps the signed convention used by HTTP client bodies: any negative
    /// value means "everything remaining".
    pub fn from_signed(size: i64) -> Self {
        match usize::try_from(size) {
            Ok(bytes) => ReadSize::Bytes(bytes),
            Err(_) if size < 0 => ReadSize::All,
            Err(_) => ReadSize::Bytes(usize::MAX),
        }
    }
}

impl From<usize> for ReadSize {
    fn from(bytes: usize) -> Self {
        ReadSize::Bytes(bytes)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpenMode {
    /// 只读二进制。
    #[default]
    Read,
    /// 读写二进制，文件必须已存在。
    ReadWrite,
}

impl OpenMode {
    pub(crate) fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(true);
        if self == OpenMode::ReadWrite {
            options.write(true);
        }
        options
    }
}

/// 底层句柄的读缓冲策略。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Buffering {
    #[default]
    Default,
    Unbuffered,
    Capacity(usize),
}

impl Buffering {
    /// `None` 表示使用标准库默认容量。
    pub(crate) fn capacity(self) -> Option<usize> {
        match self {
            Buffering::Default => None,
            Buffering::Unbuffered => Some(0),
            Buffering::Capacity(size) => Some(size),
        }
    }
}

/// [`FileWrapper`] 的构造配置。
pub struct WrapperOptions {
    pub(crate) mode: OpenMode,
    pub(crate) buffering: Buffering,
    pub(crate) force_size: Option<usize>,
    pub(crate) callback: Option<ProgressCallback>,
    pub(crate) callback_size: u32,
    pub(crate) in_memory_limit: u64,
}

impl Default for WrapperOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::Read,
            buffering: Buffering::Default,
            force_size: None,
            callback: None,
            callback_size: DEFAULT_CALLBACK_SIZE,
            in_memory_limit: IN_MEMORY_LIMIT,
        }
    }
}

impl WrapperOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn buffering(mut self, buffering: Buffering) -> Self {
        self.buffering = buffering;
        self
    }

    /// 强制每次读取都请求 `size` 字节；`0` 表示关闭。
    pub fn force_size(mut self, size: usize) -> Self {
        self.force_size = (size > 0).then_some(size);
        self
    }

    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// 回调步长（百分比），`0` 会被修正为 `1`。
    pub fn callback_size(mut self, step: u32) -> Self {
        self.callback_size = step.max(1);
        self
    }

    /// Size threshold for the single-block branch of
    /// [`FileWrapper::read_chunked`].
    pub fn in_memory_limit(mut self, limit: u64) -> Self {
        self.in_memory_limit = limit;
        self
    }

    /// 按当前配置打开文件。
    pub fn open(self, path: impl AsRef<Path>) -> Result<FileWrapper, WrapperError> {
        FileWrapper::open_with(path.as_ref(), self)
    }
}

impl fmt::Debug for WrapperOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperOptions")
            .field("mode", &self.mode)
            .field("buffering", &self.buffering)
            .field("force_size", &self.force_size)
            .field("callback", &self.callback.is_some())
            .field("callback_size", &self.callback_size)
            .field("in_memory_limit", &self.in_memory_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_signed_size_reads_everything() {
        assert_eq!(ReadSize::from_signed(-1), ReadSize::All);
        assert_eq!(ReadSize::from_signed(-42), ReadSize::All);
        assert_eq!(ReadSize::from_signed(0), ReadSize::Bytes(0));
        assert_eq!(ReadSize::from_signed(8192), ReadSize::Bytes(8192));
    }

    #[test]
    fn zero_callback_size_is_coerced_to_one() {
        let options = WrapperOptions::new().callback_size(0);
        assert_eq!(options.callback_size, 1);
    }

    #[test]
    fn zero_force_size_disables_override() {
        assert_eq!(WrapperOptions::new().force_size(0).force_size, None);
        assert_eq!(WrapperOptions::new().force_size(10).force_size, Some(10));
    }

    #[test]
    fn buffering_maps_to_reader_capacity() {
        assert_eq!(Buffering::Default.capacity(), None);
        assert_eq!(Buffering::Unbuffered.capacity(), Some(0));
        assert_eq!(Buffering::Capacity(4096).capacity(), Some(4096));
    }
}
