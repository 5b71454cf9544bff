//! 文件包装器的错误类型与转换。

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum WrapperError {
    /// 打开文件或读取其元数据失败（不存在、权限不足等）。
    Open { path: PathBuf, source: io::Error },
    /// 无法解析当前工作目录，相对路径无法转为绝对路径。
    CurrentDir(io::Error),
    Io(io::Error),
}

impl fmt::Display for WrapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapperError::Open { path, source } => {
                write!(f, "failed to open {}: {source}", path.display())
            }
            WrapperError::CurrentDir(err) => {
                write!(f, "failed to resolve current directory: {err}")
            }
            WrapperError::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WrapperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WrapperError::Open { source, .. } => Some(source),
            WrapperError::CurrentDir(err) | WrapperError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for WrapperError {
    fn from(err: io::Error) -> Self {
        WrapperError::Io(err)
    }
}

impl From<WrapperError> for io::Error {
    fn from(error: WrapperError) -> Self {
        match error {
            WrapperError::Open { path, source } => io::Error::new(
                source.kind(),
                format!("failed to open {}: {source}", path.display()),
            ),
            WrapperError::CurrentDir(err) | WrapperError::Io(err) => err,
        }
    }
}
