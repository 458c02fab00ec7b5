//! Property-based tests for documents and merging

mod merge_laws;
mod round_trip;
