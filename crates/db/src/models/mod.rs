//! Database row models.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! table row, plus conversions to and from the core domain types.

pub mod workload_record;
