//! HTTP client, async drivers and command-line front end for the catalog
//! collection service.

pub mod api;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod files;
pub mod session;
