//! Trailing NUL trimming for images padded to a fixed size.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Size of each backward positioned read.
pub const CHUNK_SIZE: usize = 2 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("Failed to open file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to get file size of {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not a regular file")]
    UnsupportedTarget { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to shrink {path}: {source}")]
    Truncate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "ShrinkOutcome reports whether the file changed"]
pub enum ShrinkOutcome {
    /// The file is empty or its last byte is not NUL
    AlreadyShrunk { len: u64 },
    /// Trailing NUL bytes were cut off
    Shrunk { from: u64, to: u64 },
}

/// Truncate `path` right after its last non-zero byte.
///
/// A file made only of NUL bytes ends up empty.
pub fn shrink(path: impl AsRef<Path>) -> Result<ShrinkOutcome, TrimError> {
    let path = path.as_ref();

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| TrimError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let metadata = file.metadata().map_err(|source| TrimError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(TrimError::UnsupportedTarget {
            path: path.to_path_buf(),
        });
    }

    let len = metadata.len();
    if len == 0 {
        return Ok(ShrinkOutcome::AlreadyShrunk { len });
    }

    let read_err = |source: std::io::Error| TrimError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut last = [0u8; 1];
    file.read_exact_at(&mut last, len - 1).map_err(read_err)?;
    if last[0] != 0 {
        return Ok(ShrinkOutcome::AlreadyShrunk { len });
    }

    let new_len = data_end(&file, len).map_err(read_err)?;
    file.set_len(new_len).map_err(|source| TrimError::Truncate {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ShrinkOutcome::Shrunk {
        from: len,
        to: new_len,
    })
}

/// Offset one past the last non-zero byte, scanning backward chunk by chunk.
fn data_end(file: &File, len: u64) -> std::io::Result<u64> {
    let mut buffer = vec![0u8; len.min(CHUNK_SIZE as u64) as usize];
    let mut end = len;

    while end > 0 {
        let start = end.saturating_sub(CHUNK_SIZE as u64);
        let chunk = &mut buffer[..(end - start) as usize];
        file.read_exact_at(chunk, start)?;

        if let Some(i) = chunk.iter().rposition(|&b| b != 0) {
            return Ok(start + i as u64 + 1);
        }
        end = start;
    }

    Ok(0)
}
