//! Memory budget for whole-target buffering.
//!
//! The engine loads the entire target into process memory, so targets above
//! a fixed share of physical memory are refused instead of streamed.

use crate::error::PatchError;

/// Share of total physical memory a single target may occupy.
pub const MAX_MEMORY_PERCENT: u64 = 60;

/// Largest target length allowed for a host with `total_memory` bytes.
pub fn budget_limit(total_memory: u64) -> u64 {
    total_memory / 100 * MAX_MEMORY_PERCENT
}

/// Check a target length against the budget derived from `total_memory`.
pub fn check_budget(len: u64, total_memory: u64) -> Result<(), PatchError> {
    let limit = budget_limit(total_memory);
    if len > limit {
        return Err(PatchError::InsufficientMemory { len, limit });
    }
    Ok(())
}

/// Total physical memory of the host in bytes.
pub fn total_system_memory() -> Result<u64, PatchError> {
    let info = nix::sys::sysinfo::sysinfo().map_err(|e| PatchError::MemoryQuery(e.into()))?;
    Ok(info.ram_total())
}
