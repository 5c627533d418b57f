//! Spark Canvas Core - Shared types library.
//!
//! This crate provides common types used across all Spark Canvas components:
//! - `client` - Authenticated client for the Spark Canvas HTTP API
//! - `cli` - Command-line host for the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no session
//! storage, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, API records, and request payloads with presence checks
//! - [`gateway`] - IPFS gateway URL rewriting for image display

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod gateway;
pub mod types;

pub use gateway::GatewayRewriter;
pub use types::*;
