//! # Storefront CLI
//!
//! Operator tool around `storefront-client`: send ad-hoc requests through the
//! authenticated pipeline, manage the stored session, inspect configuration.

pub mod cli;
pub mod error;

pub use error::*;
