#![doc = "knowl-docgen: orchestration pipeline for static API-documentation generation."]

//! This crate prepares a target project directory for documentation analysis:
//! it provisions the result/tool directories, optionally downloads
//! platform-specific tooling from the release server, invokes the external
//! route-extraction preprocessor, and supervises the analyser binary as a
//! child process.
//!
//! # Usage
//! The `knowl-docgen` binary drives the pipeline; the library exposes each
//! stage for integration tests and embedding.

pub mod analyser;
pub mod cli;
pub mod context;
pub mod contract;
pub mod fetch;
pub mod pipeline;
pub mod platform;
pub mod preprocess;
pub mod provision;
