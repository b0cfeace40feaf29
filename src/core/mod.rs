//! Core extraction engine.
//!
//! ## Module Structure
//!
//! - `tokenizer`: Token stream over a tree-sitter-python parse
//! - `keywords`: Keyword specifications and the merged keyword table
//! - `collect`: Translator comment collection
//! - `extract`: Call matching, argument binding and message emission
//! - `data`: Message records and format flags
//! - `file_scanner`: Python source discovery
//! - `error`: Error types

pub mod collect;
pub mod data;
pub mod error;
pub mod extract;
pub mod file_scanner;
pub mod keywords;
pub mod tokenizer;

pub use collect::CommentTag;
pub use data::{Location, Message};
pub use error::{ExtractError, KeywordSpecError};
pub use extract::{ExtractOptions, Extraction, PythonExtractor};
pub use keywords::{KeywordSpec, KeywordTable};
