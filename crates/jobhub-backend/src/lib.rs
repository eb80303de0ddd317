//! # jobhub-backend
//!
//! Data backend providers for JobHub. The production deployment talks to
//! the hosted Postgres service through an adapter crate implementing
//! [`jobhub_core::traits::DataBackend`]; this crate supplies:
//!
//! - **memory**: an in-process backend (JSON rows + broadcast change feed)
//!   used by tests and the dev daemon
//! - the provider dispatcher selected at runtime from configuration
//! - typed query builders per consumed table
//!
//! Query construction is centralized here so column names live in exactly
//! one place per table.

pub mod memory;
pub mod provider;
pub mod queries;

pub use memory::MemoryBackend;
pub use provider::BackendManager;
