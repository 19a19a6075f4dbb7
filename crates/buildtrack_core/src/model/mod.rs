//! Domain model for construction-project task tracking.
//!
//! # Responsibility
//! - Define the canonical task record produced by document/spreadsheet import.
//! - Define the persisted rows (`Task`, `Project`, `User`) the import writes to.
//!
//! # Invariants
//! - `Priority` and `TaskStatus` are closed enums; unknown text never survives
//!   past normalization.
//! - Every persisted row is identified by a non-nil UUID.

pub mod project;
pub mod task;
