//! optmap: layered config maps reconciled against a live option store
//!
//! Config maps are ordered documents describing named options, each with a value, a type
//! tag and an apply action. The engine loads and renders those documents, merges a set of
//! maps by priority, diffs the result against an option store and applies the changes.

pub mod api;
pub mod cli;
pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod logging;
pub mod map_set;
pub mod merge;
pub mod reconcile;
pub mod store;
