//! findbase: region resolution and baseline identity matching for
//! machine-generated static-analysis findings.
//!
//! Two cores live here. The region engine translates between the three
//! addressing schemes for a span of source text (line/column, character
//! offset/length, byte offset/length), caching per-file derived data so
//! repeated translations are cheap. The identity matcher decides whether
//! two findings from different runs represent the same underlying issue,
//! using a tiered, trust-weighted comparison over partially-unreliable
//! identity signals.
//!
//! The analysis driver, format converters, and artifact enumeration are
//! external collaborators consumed through narrow seams ([`fs::FileSystem`],
//! the [`model`] record types); nothing here owns a file format.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod fs;
pub mod index;
pub mod matcher;
pub mod model;
pub mod region;
pub mod resolver;
pub mod snippet;
pub mod trust;

pub use cache::{DEFAULT_CACHE_CAPACITY, FileDataCache, HashData};
pub use config::EngineConfig;
pub use error::Error;
pub use extract::{ExtractedFinding, PropertySet, WhatComponent, extract};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use index::LineIndex;
pub use matcher::matches;
pub use model::{Finding, Location, Message, Rule, Run};
pub use region::Region;
pub use resolver::{RegionResolver, Strictness};
pub use snippet::{BIG_SNIPPET_CHARS, SMALL_SNIPPET_CHARS, SnippetBuilder};
pub use trust::{DEFAULT_TRUST, TrustMap};
