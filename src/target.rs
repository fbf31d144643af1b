//! Opening and sizing the file or block device being patched.

use crate::error::PatchError;
use std::fs::{File, FileType, OpenOptions};
use std::os::unix::fs::FileTypeExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

// BLKGETSIZE64: total addressable size of a block device in bytes.
nix::ioctl_read!(blkgetsize64, 0x12, 114, u64);

/// Device class of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    RegularFile,
    BlockDevice,
}

impl TargetKind {
    /// Classify a file type, `None` for anything that cannot be patched
    /// (directories, pipes, sockets, character devices).
    pub fn classify(file_type: &FileType) -> Option<Self> {
        if file_type.is_file() {
            Some(TargetKind::RegularFile)
        } else if file_type.is_block_device() {
            Some(TargetKind::BlockDevice)
        } else {
            None
        }
    }
}

/// An open, classified, sized target.
///
/// The descriptor is closed when the value is dropped, on success and on
/// every error path.
#[derive(Debug)]
pub struct Target {
    path: PathBuf,
    file: File,
    kind: TargetKind,
    len: u64,
}

impl Target {
    /// Open `path` read-write and determine its exact byte length.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PatchError> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| PatchError::Open {
                path: path.clone(),
                source,
            })?;

        let metadata = file.metadata().map_err(|source| PatchError::Stat {
            path: path.clone(),
            source,
        })?;

        let kind = TargetKind::classify(&metadata.file_type())
            .ok_or_else(|| PatchError::UnsupportedTarget { path: path.clone() })?;

        let len = match kind {
            TargetKind::RegularFile => metadata.len(),
            TargetKind::BlockDevice => {
                block_device_size(&file).map_err(|source| PatchError::SizeQuery {
                    path: path.clone(),
                    source,
                })?
            }
        };

        Ok(Self {
            path,
            file,
            kind,
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Byte length, from stat for files and from the device for block devices.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

fn block_device_size(file: &File) -> std::io::Result<u64> {
    let mut size: u64 = 0;
    // SAFETY: the descriptor is open for the lifetime of `file` and `size`
    // is a valid u64 the kernel writes into.
    unsafe { blkgetsize64(file.as_raw_fd(), &mut size) }?;
    Ok(size)
}
