//! Yak package staging and build library.
//!
//! This crate assembles a Rhino/Grasshopper yak package from a project's
//! manifest template, logo, readme, license and pre-built `.ghuser`
//! components, then drives the vendor's packaging executable to build it.
//! It is used by the `yakerize` CLI binary and can be consumed
//! programmatically for testing or custom release workflows.
//!
//! # Modules
//!
//! - [`artefact`] - Built package discovery and platform tagging
//! - [`builder`] - Packaging executable download, invocation and validation
//! - [`changelog`] - Changelog preparation for the next release
//! - [`clean`] - Removal of generated artefacts
//! - [`cli`] - Command-line argument definitions
//! - [`components`] - Component collection into the staging area
//! - [`config`] - Project configuration and componentizer flavours
//! - [`download`] - Builder executable download
//! - [`error`] - Semantic error types with remedy hints
//! - [`executor`] - External command execution with timeouts
//! - [`manifest`] - Version substitution in the staged manifest
//! - [`output`] - Progress and summary messages
//! - [`pipeline`] - Stage-and-build orchestration
//! - [`platform`] - Target platform identifiers and builder flags
//! - [`resolution`] - Input resolution and validation
//! - [`staging`] - Staging directory preparation and population
//! - [`verification`] - Integrity checks for the downloaded builder
//! - [`version`] - Version lookup in project metadata

pub mod artefact;
pub mod builder;
pub mod changelog;
pub mod clean;
pub mod cli;
pub mod components;
pub mod config;
pub mod download;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod resolution;
pub mod staging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod verification;
pub mod version;
