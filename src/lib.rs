//! setup-texlive - Cached TeX Live provisioning for CI runners
//!
//! Picks the freshest mirror from the TeX Live mirror status catalog,
//! restores a cached installation keyed by platform, package set and
//! release, and installs or updates TeX Live as needed.

pub mod archive;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod install;
pub mod mirror;
pub mod output;
pub mod packages;
pub mod platform;

pub use error::{SetupError, SetupResult};
