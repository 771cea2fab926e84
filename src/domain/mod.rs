//! Core domain models for yarn-comb
//!
//! This module contains the fundamental types used throughout the application:
//! - Lockfile entries with their line spans and resolved versions
//! - Strictness classification of constraint descriptors
//! - Package groups and duplicate buckets
//! - Recommendation records

mod entry;
mod group;
mod recommendation;
mod strictness;

pub use entry::{Confidence, LineSpan, LockEntry, MajorKey, MinorKey};
pub use group::PackageGroup;
pub use recommendation::{Recommendation, RecommendationKind};
pub use strictness::Strictness;
