//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod workload_record_repo;

pub use workload_record_repo::{RecordScope, WorkloadRecordRepo};
