//! Database Layer
//!
//! Embedded redb document store. All writes that must be consistent with
//! each other go through one `WriteTransaction`; redb's single-writer
//! model is what makes find-or-create and counter allocation atomic.

pub mod storage;

pub use storage::{PosStorage, StorageError, StorageResult};
