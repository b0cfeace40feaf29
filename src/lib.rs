//! pyglot - gettext message extraction for Python sources
//!
//! pyglot finds calls to translation functions such as `_()`, `ngettext()`
//! and `pgettext()` in Python code and extracts their literal arguments as
//! translatable messages, together with translator comments, context,
//! plural forms and source locations.
//!
//! ```ignore
//! use pyglot::core::{ExtractOptions, PythonExtractor};
//!
//! let extractor = PythonExtractor::new(&ExtractOptions::default())?;
//! for message in extractor.extract("app.py", "print(_('Hello'))", 0) {
//!     println!("{}", message?.msgid);
//! }
//! ```
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (tokenizer, call matching, message emission)
//! - `catalog`: Merged message catalog and output writers

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
