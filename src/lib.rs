//! Comment Batch - extract comments from HTML, accumulate them in a CSV
//! batch, export the batch and merge earlier exports.
//!
//! The batch store is generic over [`infrastructure::BatchStorage`], so the
//! same operations run against the filesystem or an in-memory map.

pub mod application;
pub mod domain;
pub mod infrastructure;
