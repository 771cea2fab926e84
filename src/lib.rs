//! yarn-comb - duplicate package analysis for yarn lockfiles
//!
//! This library provides the core functionality for combing a lockfile:
//! - Parsing entries, descriptors and resolved versions
//! - Classifying descriptor strictness and intersecting version ranges
//! - Grouping duplicates and recommending safe merges
//! - Deleting mergeable entries and reinstalling, with rollback

pub mod analysis;
pub mod autofix;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod parser;
pub mod patch;
pub mod process;
pub mod prompt;
pub mod range;
