//! 分块读取：小文件一次性载入，大文件按固定块大小惰性产出。

use std::io;
use std::iter::FusedIterator;
use tracing::debug;

use crate::options::DEFAULT_BLOCK_SIZE;
use crate::wrapper::FileWrapper;

enum ChunkState {
    Whole,
    Blocks,
    Done,
}

/// [`FileWrapper::read_chunked`] 返回的惰性块序列。
///
/// 与 `read` 不同，迭代结束后不会回绕，偏移停留在最后一次读取的位置。
pub struct Chunks<'a> {
    wrapper: &'a mut FileWrapper,
    block_size: usize,
    remaining: Option<usize>,
    state: ChunkState,
}

impl FileWrapper {
    /// Yields the file as blocks.
    ///
    /// Files no larger than the in-memory limit come back as one block read
    /// from the current offset, ignoring both arguments. Larger files yield
    /// non-empty `block_size` reads until EOF or until `chunk_limit` blocks
    /// were produced (`None` means unlimited).
    pub fn read_chunked(&mut self, block_size: usize, chunk_limit: Option<usize>) -> Chunks<'_> {
        let state = if self.file_size() <= self.in_memory_limit() {
            ChunkState::Whole
        } else {
            ChunkState::Blocks
        };
        debug!(
            path = self.name(),
            size = self.file_size(),
            block_size,
            chunk_limit,
            whole = matches!(state, ChunkState::Whole),
            "start chunked read"
        );
        Chunks {
            wrapper: self,
            block_size,
            remaining: chunk_limit,
            state,
        }
    }

    /// 使用默认块大小且不限块数。
    pub fn read_chunked_default(&mut self) -> Chunks<'_> {
        self.read_chunked(DEFAULT_BLOCK_SIZE, None)
    }
}

impl Iterator for Chunks<'_> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            ChunkState::Done => None,
            ChunkState::Whole => {
                self.state = ChunkState::Done;
                let size = self.wrapper.file_size();
                Some(self.wrapper.read_raw(size))
            }
            ChunkState::Blocks => {
                if self.remaining == Some(0) {
                    self.state = ChunkState::Done;
                    return None;
                }
                match self.wrapper.read_raw(self.block_size as u64) {
                    Ok(data) if data.is_empty() => {
                        self.state = ChunkState::Done;
                        None
                    }
                    Ok(data) => {
                        if let Some(remaining) = self.remaining.as_mut() {
                            *remaining -= 1;
                        }
                        Some(Ok(data))
                    }
                    Err(err) => {
                        self.state = ChunkState::Done;
                        Some(Err(err))
                    }
                }
            }
        }
    }
}

impl FusedIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use crate::options::{IN_MEMORY_LIMIT, ReadSize, WrapperOptions};
    use crate::wrapper::FileWrapper;
    use std::fs::File;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn make_file(content: &[u8]) -> (TempDir, PathBuf) {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("chunked.bin");
        std::fs::write(&path, content).expect("write fixture");
        (temp, path)
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 253) as u8).collect()
    }

    #[test]
    fn small_file_yields_single_block() {
        let content = pattern(4500);
        let (_temp, path) = make_file(&content);
        let mut wrapper = FileWrapper::open(&path).expect("open");

        let blocks = wrapper
            .read_chunked(1000, Some(2))
            .collect::<Result<Vec<_>, _>>()
            .expect("chunks");
        assert_eq!(blocks, vec![content]);
    }

    #[test]
    fn empty_file_yields_one_empty_block() {
        let (_temp, path) = make_file(b"");
        let mut wrapper = FileWrapper::open(&path).expect("open");

        let blocks = wrapper
            .read_chunked_default()
            .collect::<Result<Vec<_>, _>>()
            .expect("chunks");
        assert_eq!(blocks, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn large_file_respects_chunk_limit() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("sparse.bin");
        let file = File::create(&path).expect("create");
        file.set_len(IN_MEMORY_LIMIT + 1).expect("set_len");
        drop(file);

        let mut wrapper = FileWrapper::open(&path).expect("open");
        let blocks = wrapper
            .read_chunked(1000, Some(3))
            .collect::<Result<Vec<_>, _>>()
            .expect("chunks");
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|block| block.len() == 1000));
        assert_eq!(wrapper.position().expect("position"), 3000);
    }

    #[test]
    fn blocks_stop_at_eof_without_rewind() {
        let content = pattern(2500);
        let (_temp, path) = make_file(&content);
        let mut wrapper = WrapperOptions::new()
            .in_memory_limit(100)
            .open(&path)
            .expect("open");

        let blocks = wrapper
            .read_chunked(1000, None)
            .collect::<Result<Vec<_>, _>>()
            .expect("chunks");
        assert_eq!(
            blocks.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![1000, 1000, 500]
        );
        assert_eq!(blocks.concat(), content);
        assert_eq!(wrapper.position().expect("position"), 2500);

        assert_eq!(wrapper.read_chunked(1000, None).count(), 0);
        assert!(wrapper.read(ReadSize::Bytes(10)).expect("read").is_empty());
        assert_eq!(wrapper.position().expect("position"), 0);
    }

    #[test]
    fn zero_chunk_limit_yields_nothing_for_large_files() {
        let content = pattern(300);
        let (_temp, path) = make_file(&content);
        let mut wrapper = WrapperOptions::new()
            .in_memory_limit(0)
            .open(&path)
            .expect("open");

        assert_eq!(wrapper.read_chunked(100, Some(0)).count(), 0);
        assert_eq!(wrapper.position().expect("position"), 0);
    }
}
