//! Patch engine: buffer the whole target, scan it, write back changed spans.
//!
//! Every pair scans the same snapshot taken by the initial read. Writes go
//! straight to the descriptor at the match offset and are never mirrored
//! into the snapshot, so:
//! - a pair never re-matches bytes it has just written, and
//! - a later pair never sees what an earlier pair wrote.
//!
//! There is no rollback. If a seek or write fails midway, replacements
//! already written stay on disk and the error reports how many there were.
//! The engine assumes it is the only writer of the target for the duration
//! of the run.

use crate::error::PatchError;
use crate::memory::{check_budget, total_system_memory};
use crate::replacement::ReplacementList;
use crate::target::{Target, TargetKind};
use memchr::memmem;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "PatchReport carries the replacement count"]
pub struct PatchReport {
    pub path: PathBuf,
    pub kind: TargetKind,
    /// Target length in bytes, unchanged by patching
    pub len: u64,
    /// Total replacements written
    pub replaced: usize,
    /// Replacements written per pair, in list order
    pub per_pair: Vec<usize>,
    /// Indices of pairs the engine refused to apply
    pub skipped: Vec<usize>,
}

/// Patch engine configuration.
#[derive(Debug, Clone, Default)]
pub struct Patcher {
    total_memory: Option<u64>,
}

impl Patcher {
    /// Engine that queries the host's physical memory for the budget check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a fixed memory total instead of the host's.
    pub fn with_total_memory(total_memory: u64) -> Self {
        Self {
            total_memory: Some(total_memory),
        }
    }

    /// Apply every pair of `replacements`, in order, to the target at `path`.
    pub fn patch(
        &self,
        path: impl AsRef<Path>,
        replacements: &ReplacementList,
    ) -> Result<PatchReport, PatchError> {
        let mut target = Target::open(path)?;

        let longest = replacements.longest_pattern();
        if target.len() < longest as u64 {
            return Err(PatchError::TargetTooSmall {
                len: target.len(),
                longest,
            });
        }

        let total_memory = match self.total_memory {
            Some(total) => total,
            None => total_system_memory()?,
        };
        check_budget(target.len(), total_memory)?;

        let path = target.path().to_path_buf();
        let len = target.len();
        let kind = target.kind();
        let buffer = read_all(target.file_mut(), len, &path)?;

        let mut report = PatchReport {
            path,
            kind,
            len,
            replaced: 0,
            per_pair: Vec::with_capacity(replacements.len()),
            skipped: Vec::new(),
        };
        apply_pairs(target.file_mut(), &buffer, replacements, &mut report)?;

        Ok(report)
    }
}

/// Patch `path` with the host memory budget.
pub fn patch(
    path: impl AsRef<Path>,
    replacements: &ReplacementList,
) -> Result<PatchReport, PatchError> {
    Patcher::new().patch(path, replacements)
}

/// Read exactly `len` bytes into a freshly allocated buffer.
fn read_all<R: Read>(reader: &mut R, len: u64, path: &Path) -> Result<Vec<u8>, PatchError> {
    let size = usize::try_from(len).map_err(|_| PatchError::Allocation { len })?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| PatchError::Allocation { len })?;
    buffer.resize(size, 0);

    reader
        .read_exact(&mut buffer)
        .map_err(|source| PatchError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(buffer)
}

/// Scan `snapshot` for every pair and write each match to `dest`.
///
/// `report` is updated as writes succeed, so on error it still holds the
/// counts of what reached `dest`.
fn apply_pairs<W: Write + Seek>(
    dest: &mut W,
    snapshot: &[u8],
    replacements: &ReplacementList,
    report: &mut PatchReport,
) -> Result<(), PatchError> {
    for (index, pair) in replacements.pairs().iter().enumerate() {
        if !pair.is_length_preserving() {
            report.skipped.push(index);
            report.per_pair.push(0);
            continue;
        }

        let mut count = 0;
        for offset in memmem::find_iter(snapshot, &pair.from) {
            write_at(dest, &report.path, offset as u64, &pair.to, report.replaced)?;
            count += 1;
            report.replaced += 1;
        }
        report.per_pair.push(count);
    }

    Ok(())
}

fn write_at<W: Write + Seek>(
    dest: &mut W,
    path: &Path,
    offset: u64,
    bytes: &[u8],
    committed: usize,
) -> Result<(), PatchError> {
    dest.seek(SeekFrom::Start(offset))
        .map_err(|source| PatchError::Seek {
            path: path.to_path_buf(),
            offset,
            committed,
            source,
        })?;

    dest.write_all(bytes).map_err(|source| PatchError::Write {
        path: path.to_path_buf(),
        offset,
        committed,
        source,
    })
}
