//! artaudit CLI library.
//!
//! Hosts the audit engine on a directory of assets: scanning and metadata
//! collection, material documents and import sidecars, model metadata
//! scaffolding, embedded asset extraction, and the command implementations.

pub mod commands;
pub mod extract;
pub mod project;
pub mod scaffold;
