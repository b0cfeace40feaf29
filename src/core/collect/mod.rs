//! Collection of source comments that travel with extracted messages.
//!
//! Comments are observed token by token while the call matcher walks the
//! file, so no second pass over the source is needed.

pub mod comments;

pub use comments::collector::{CommentCollector, CommentTag, PendingComment};
