//! Web handlers module
//!
//! HTTP request handlers organized by domain. Each handler delegates to the
//! service layer for business logic.

pub mod health;
pub mod index;
pub mod vins;
