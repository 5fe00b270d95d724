//! artaudit End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the flows that touch disk:
//!
//! - **Audit**: asset tree -> findings -> `AuditReport.json`
//! - **Remediation**: fixable findings -> rewritten material documents
//! - **Models**: glTF/GLB -> ModelData records and extracted assets
//! - **Import**: derived settings -> `.import.json` sidecars
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p artaudit-tests
//! ```

pub mod fixtures;
