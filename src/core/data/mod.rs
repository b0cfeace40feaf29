//! Data types produced by the extraction pipeline.
//!
//! ## Module Structure
//!
//! - `message`: Message records, their locations and format flags

pub mod message;

pub use message::{
    Location, Message, PYTHON_BRACE_FORMAT_FLAG, PYTHON_FORMAT_FLAG, format_flags,
};
