//! Translator comments.
//!
//! ## Module Structure
//!
//! - `collector`: CommentCollector and the comment tag filter

pub mod collector;
