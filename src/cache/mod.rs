//! Installation snapshots
//!
//! Snapshots of the TeX Live tree are addressed by a content-derived key:
//! same platform, namespace, package set and release = same key prefix.
//!
//! # Key Layout
//!
//! | Part | Source |
//! |------|--------|
//! | `texlive-<platform>` | host platform |
//! | `<namespace>` | `cache_version` input |
//! | `<hash>` | SHA256 of the sorted package list |
//! | `<version>` | TeX Live release or `NONE` |
//! | suffix | repository revision, else the UTC date |

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheStore, LocalCacheStore};
