//! Image Patcher: in-place fixed-width byte replacement for system images
//!
//! Rewrites string constants (partition names, mount points) embedded in
//! large binary images and block devices without changing their length or
//! layout.
//!
//! # Architecture
//!
//! - [`replacement`] turns raw `from|to` arguments into validated
//!   [`ReplacementPair`]s.
//! - [`target`] opens the file or block device and discovers its exact size.
//! - [`memory`] refuses targets that would not fit the memory budget.
//! - [`engine`] reads the target once, scans the snapshot for each pair and
//!   writes only the matched spans back at their absolute offsets.
//! - [`trim`] drops trailing NUL padding from an image.
//!
//! # Caveats
//!
//! - Writes are not transactional: a failure midway leaves the target
//!   partially patched ([`PatchError::committed`] says how far it got).
//! - No locking is done; concurrent writers to the same target give
//!   undefined results.
//!
//! # Example
//!
//! ```no_run
//! use image_patcher::{Patcher, ReplacementList};
//!
//! let (replacements, rejected) = ReplacementList::from_args(["system|vendor"]);
//! assert!(rejected.is_empty());
//!
//! match Patcher::new().patch("system.img", &replacements) {
//!     Ok(report) => println!("Replaced {} occurrences.", report.replaced),
//!     Err(e) => eprintln!("Patch failed: {}", e),
//! }
//! ```

pub mod console;
pub mod engine;
pub mod error;
pub mod memory;
pub mod replacement;
pub mod target;
pub mod trim;

// Re-exports
pub use console::Console;
pub use engine::{patch, PatchReport, Patcher};
pub use error::{FailureClass, PatchError, CODE_FAILURE, USER_FAILURE};
pub use memory::{budget_limit, check_budget, total_system_memory, MAX_MEMORY_PERCENT};
pub use replacement::{ArgumentError, Rejected, ReplacementList, ReplacementPair};
pub use target::{Target, TargetKind};
pub use trim::{shrink, ShrinkOutcome, TrimError, CHUNK_SIZE};
