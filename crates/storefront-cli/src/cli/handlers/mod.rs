//! Command handlers for the storefront CLI

pub mod config;
pub mod request;
pub mod session;
