//! Message extraction from Python sources.
//!
//! The pipeline per file is:
//!
//! 1. `Tokenizer` turns the source into tokens (fatal on syntax errors)
//! 2. `CallMatcher` finds keyword calls and splits their arguments, feeding
//!    comments to the `CommentCollector` as it goes
//! 3. `binder` assigns argument spans to roles and folds literals
//! 4. `Extraction` turns bound calls into `Message` records, lazily

pub mod binder;
pub mod call_matcher;
pub mod extractor;
pub mod literal;


pub use binder::{ArgValue, BoundCall, Unbound, bind};
pub use call_matcher::{CallMatcher, MatchedCall};
pub use extractor::{ExtractOptions, Extraction, PythonExtractor};
pub use literal::{LiteralValue, concat_literals, parse_literal};
