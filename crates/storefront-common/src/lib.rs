//! Shared building blocks for the storefront client workspace

pub mod constants;
pub mod logging;

pub use constants::*;
