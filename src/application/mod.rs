//! Application layer - use cases and orchestration.
//!
//! This layer contains the codec, the extractor, the accumulator store,
//! the merge engine and the service tying them together.

pub mod accumulator;
pub mod batch_service;
pub mod codec;
pub mod extractor;
pub mod formatter;
pub mod merge;

pub use accumulator::AccumulatorStore;
pub use batch_service::{BatchService, BatchStatus, ClearResponse, Download, ExtractResponse};
pub use extractor::{extract, ExtractOptions};
pub use formatter::{
    format_clear, format_extract, format_json, format_records_table, format_status, OutputFormat,
};
pub use merge::merge;
