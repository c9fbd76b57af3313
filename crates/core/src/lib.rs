//! Catalog client domain logic.
//!
//! Pure types, validation and state machines for browsing and bulk-loading a
//! product catalog. Nothing in this crate performs I/O: requests are
//! described by tickets and their outcomes are fed back in by the caller.

pub mod bulk_import;
pub mod controller;
pub mod error;
pub mod filter;
pub mod import_schema;
pub mod paging;
pub mod query;
pub mod template;
pub mod types;
