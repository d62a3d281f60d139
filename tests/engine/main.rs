//! Engine integration tests: ingest, read, query and purge over real stores.

#[path = "../common/mod.rs"]
mod common;

mod fallback;
mod ingest;
mod properties;
mod purge;
mod scenarios;
