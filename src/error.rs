use std::path::PathBuf;
use thiserror::Error;

/// Exit sentinel for system/internal failures (open, stat, size query,
/// allocation, read, seek, write).
pub const CODE_FAILURE: i32 = -1;

/// Exit sentinel for invalid or unsafe user input.
pub const USER_FAILURE: i32 = -2;

/// Which side of the two-tier error taxonomy a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The operating system or a resource failed.
    System,
    /// The input was invalid or unsafe to process.
    User,
}

impl FailureClass {
    pub fn exit_code(self) -> i32 {
        match self {
            FailureClass::System => CODE_FAILURE,
            FailureClass::User => USER_FAILURE,
        }
    }
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fstat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is neither a regular file nor a block device")]
    UnsupportedTarget { path: PathBuf },

    #[error("Failed to get size of {path}: {source}")]
    SizeQuery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file size: {len} (longest pattern is {longest} bytes)")]
    TargetTooSmall { len: u64, longest: usize },

    #[error("Failed to query total system memory: {0}")]
    MemoryQuery(#[source] std::io::Error),

    #[error("This file is too big to fit in your memory ({len} bytes, limit {limit} bytes)")]
    InsufficientMemory { len: u64, limit: u64 },

    #[error("Failed to allocate {len} bytes for file contents")]
    Allocation { len: u64 },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to seek {path} to offset {offset}: {source}")]
    Seek {
        path: PathBuf,
        offset: u64,
        committed: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path} at offset {offset}: {source}")]
    Write {
        path: PathBuf,
        offset: u64,
        committed: usize,
        #[source]
        source: std::io::Error,
    },
}

impl PatchError {
    pub fn class(&self) -> FailureClass {
        match self {
            PatchError::UnsupportedTarget { .. }
            | PatchError::TargetTooSmall { .. }
            | PatchError::InsufficientMemory { .. } => FailureClass::User,
            _ => FailureClass::System,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.class().exit_code()
    }

    /// Number of replacements already written to the target before the
    /// failure. Non-zero only for seek/write failures; the target is then
    /// partially patched.
    pub fn committed(&self) -> usize {
        match self {
            PatchError::Seek { committed, .. } | PatchError::Write { committed, .. } => *committed,
            _ => 0,
        }
    }
}
