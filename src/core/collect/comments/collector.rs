//! Translator comment collector.
//!
//! Buffers the comment block written just before a translation call so it
//! can be attached to the extracted message. For example, with the tag
//! `I18N:`:
//!
//! ```python
//! # I18N: Shown on the checkout button,
//! # keep it short.
//! label = _("Pay now")
//! ```
//!
//! yields the comment `Shown on the checkout button, keep it short.`
//!
//! # Block rules
//!
//! - Only consecutive comment lines form one block; a comment after a gap
//!   starts a new block and discards the old one.
//! - With a tag, the block's first line must start with the tag. Later lines
//!   may repeat it; a leading tag is stripped wherever it appears.
//! - Blank lines between the block and the call do not break the link, but a
//!   completed statement does: a block not consumed by the statement that
//!   follows it is dropped.
//! - A block is consumed at most once.

/// Which comments are eligible for attachment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommentTag {
    /// No comment is ever attached.
    #[default]
    Disabled,
    /// Every comment block is attached.
    All,
    /// Only blocks whose first line starts with this tag.
    Tagged(String),
}

/// Comment block waiting for the next translation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingComment {
    pub first_line: usize,
    pub last_line: usize,
    pub fragments: Vec<String>,
}

impl PendingComment {
    fn new(line: usize) -> Self {
        Self {
            first_line: line,
            last_line: line,
            fragments: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str, line: usize) {
        if !fragment.is_empty() {
            self.fragments.push(fragment.to_string());
        }
        self.last_line = line;
    }

    pub fn text(&self) -> String {
        self.fragments.join(" ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentCollector {
    tag: CommentTag,
    pending: Option<PendingComment>,
}

impl CommentCollector {
    pub fn new(tag: CommentTag) -> Self {
        Self { tag, pending: None }
    }

    /// Observe a comment token (including its `#`) found on `line`.
    pub fn observe(&mut self, comment: &str, line: usize) {
        let text = comment.strip_prefix('#').unwrap_or(comment).trim();

        let continues_block = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.last_line + 1 == line);

        if continues_block {
            let fragment = match &self.tag {
                CommentTag::Tagged(tag) => text.strip_prefix(tag.as_str()).unwrap_or(text).trim(),
                _ => text,
            };
            if let Some(pending) = self.pending.as_mut() {
                pending.push(fragment, line);
            }
            return;
        }

        self.pending = match &self.tag {
            CommentTag::Disabled => None,
            CommentTag::All => {
                let mut pending = PendingComment::new(line);
                pending.push(text, line);
                Some(pending)
            }
            CommentTag::Tagged(tag) => text.strip_prefix(tag.as_str()).map(|rest| {
                let mut pending = PendingComment::new(line);
                pending.push(rest.trim(), line);
                pending
            }),
        };
    }

    /// A logical line ending on `line` completed outside any translation call.
    /// Blocks written before that line were not claimed and are dropped.
    pub fn statement_ended(&mut self, line: usize) {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.last_line < line)
        {
            self.pending = None;
        }
    }

    /// Consume the pending block, if any.
    pub fn take(&mut self) -> Option<String> {
        self.pending.take().map(|pending| pending.text())
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<&PendingComment> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::collect::comments::collector::*;

    fn tagged(tag: &str) -> CommentCollector {
        CommentCollector::new(CommentTag::Tagged(tag.to_string()))
    }

    #[test]
    fn test_disabled_never_collects() {
        let mut collector = CommentCollector::new(CommentTag::Disabled);
        collector.observe("# source comment", 1);
        assert_eq!(collector.take(), None);
    }

    #[test]
    fn test_all_collects_any_comment() {
        let mut collector = CommentCollector::new(CommentTag::All);
        collector.observe("# source comment", 1);
        assert_eq!(collector.take(), Some("source comment".to_string()));
        assert_eq!(collector.take(), None);
    }

    #[test]
    fn test_tag_is_stripped() {
        let mut collector = tagged("I18N:");
        collector.observe("# I18N: source comment", 1);
        assert_eq!(collector.take(), Some("source comment".to_string()));
    }

    #[test]
    fn test_untagged_comment_is_ignored() {
        let mut collector = tagged("I18N:");
        collector.observe("# just a note", 1);
        assert_eq!(collector.take(), None);
    }

    #[test]
    fn test_tagged_lines_are_joined() {
        let mut collector = tagged("I18N:");
        collector.observe("# I18N: one", 1);
        collector.observe("# I18N: two", 2);
        assert_eq!(collector.take(), Some("one two".to_string()));
    }

    #[test]
    fn test_continuation_lines_need_no_tag() {
        let mut collector = tagged("I18N:");
        collector.observe("# I18N: Shown on the checkout button,", 4);
        collector.observe("# keep it short.", 5);
        assert_eq!(
            collector.take(),
            Some("Shown on the checkout button, keep it short.".to_string())
        );
    }

    #[test]
    fn test_gap_starts_new_block() {
        let mut collector = CommentCollector::new(CommentTag::All);
        collector.observe("# first", 1);
        collector.observe("# second", 3);
        assert_eq!(collector.take(), Some("second".to_string()));
    }

    #[test]
    fn test_untagged_comment_after_gap_discards_block() {
        let mut collector = tagged("I18N:");
        collector.observe("# I18N: stale", 1);
        collector.observe("# unrelated", 3);
        assert_eq!(collector.take(), None);
    }

    #[test]
    fn test_empty_lines_keep_block_contiguous() {
        let mut collector = CommentCollector::new(CommentTag::All);
        collector.observe("# one", 1);
        collector.observe("#", 2);
        collector.observe("# two", 3);
        let pending = collector.pending().unwrap();
        assert_eq!(pending.first_line, 1);
        assert_eq!(pending.last_line, 3);
        assert_eq!(collector.take(), Some("one two".to_string()));
    }

    #[test]
    fn test_statement_end_drops_earlier_block() {
        let mut collector = CommentCollector::new(CommentTag::All);
        collector.observe("# note", 1);
        collector.statement_ended(2);
        assert_eq!(collector.take(), None);
    }

    #[test]
    fn test_trailing_comment_survives_its_own_statement() {
        let mut collector = CommentCollector::new(CommentTag::All);
        collector.observe("# trailing", 3);
        collector.statement_ended(3);
        assert_eq!(collector.take(), Some("trailing".to_string()));
    }
}
