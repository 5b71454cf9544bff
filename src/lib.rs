//! Rewindable, progress-reporting file bodies for WebDAV uploads.
//!
//! [`FileWrapper`] wraps an on-disk file so an HTTP client can read the same
//! request body again after an authentication challenge. Reads may be forced
//! to a fixed block size and report a percentage to an optional callback.

mod chunked;
mod error;
mod options;
mod progress;
pub mod transfer;
mod wrapper;

pub use chunked::Chunks;
pub use error::WrapperError;
pub use options::{
    Buffering, DEFAULT_BLOCK_SIZE, DEFAULT_CALLBACK_SIZE, IN_MEMORY_LIMIT, OpenMode,
    ProgressCallback, ReadSize, WrapperOptions,
};
pub use progress::percent_of;
pub use wrapper::FileWrapper;
