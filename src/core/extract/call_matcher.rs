//! Keyword call matcher.
//!
//! A small state machine over the token stream that recognises
//! `IDENTIFIER (` where the identifier (the last component of a dotted name)
//! is a translation keyword, and collects the call's top-level argument
//! spans up to the matching `)`.
//!
//! Open keyword calls are kept on a stack so that keyword calls nested in
//! another call's arguments are matched too:
//!
//! ```python
//! _("Save", default=_("Save changes"))   # both calls are matched
//! other(six.u("word"))                    # `u` is not a keyword: one span, a call
//! ```
//!
//! Completed calls are held back until the outermost open call closes and
//! are then released in source order.

use crate::core::{
    collect::CommentCollector,
    keywords::{KeywordSpec, KeywordTable},
    tokenizer::{Position, Token, TokenKind, is_reserved_word},
};

/// A keyword call with its raw argument spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedCall<'k, 'src> {
    pub keyword: &'k KeywordSpec,
    /// Position of the keyword identifier.
    pub start: Position,
    /// Top-level comma-separated argument spans, without the commas.
    pub args: Vec<Vec<Token<'src>>>,
    /// Comment block attached to this call.
    pub comment: Option<String>,
}

#[derive(Debug)]
struct Frame<'k, 'src> {
    call: MatchedCall<'k, 'src>,
    /// Bracket depth just inside the call's `(`.
    open_depth: usize,
    seq: usize,
}

#[derive(Debug)]
pub struct CallMatcher<'k, 'src> {
    keywords: &'k KeywordTable,
    depth: usize,
    frames: Vec<Frame<'k, 'src>>,
    completed: Vec<(usize, MatchedCall<'k, 'src>)>,
    /// Keyword identifier waiting to see whether a `(` follows.
    candidate: Option<Token<'src>>,
    /// Last significant token of the current logical line.
    previous: Option<Token<'src>>,
    next_seq: usize,
}

impl<'k, 'src> CallMatcher<'k, 'src> {
    pub fn new(keywords: &'k KeywordTable) -> Self {
        Self {
            keywords,
            depth: 0,
            frames: Vec::new(),
            completed: Vec::new(),
            candidate: None,
            previous: None,
            next_seq: 0,
        }
    }

    /// Whether a keyword call is currently open.
    pub fn in_call(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Feed the next token. Returns the calls released by this token, in
    /// source order.
    pub fn feed(
        &mut self,
        token: Token<'src>,
        comments: &mut CommentCollector,
    ) -> Vec<MatchedCall<'k, 'src>> {
        match token.kind {
            TokenKind::Comment => {
                comments.observe(token.text, token.start.line);
                return Vec::new();
            }
            TokenKind::Nl | TokenKind::EndMarker => return Vec::new(),
            TokenKind::Newline => {
                if !self.in_call() {
                    comments.statement_ended(token.start.line);
                }
                self.candidate = None;
                self.previous = None;
                return Vec::new();
            }
            _ => {}
        }

        let mut released = Vec::new();
        let candidate = self.candidate.take();

        if let Some(name) = candidate
            && token.is_op("(")
            && let Some(keyword) = self.keywords.get(name.text)
        {
            self.append(&token, false);
            self.depth += 1;
            self.frames.push(Frame {
                call: MatchedCall {
                    keyword,
                    start: name.start,
                    args: vec![Vec::new()],
                    comment: comments.take(),
                },
                open_depth: self.depth,
                seq: self.next_seq,
            });
            self.next_seq += 1;
        } else if token.kind == TokenKind::Op {
            match token.text {
                "(" | "[" | "{" => {
                    self.depth += 1;
                    self.append(&token, false);
                }
                ")" if self.closes_top_frame() => {
                    self.depth -= 1;
                    if let Some(frame) = self.frames.pop() {
                        let mut call = frame.call;
                        if call.args.last().is_some_and(Vec::is_empty) {
                            call.args.pop();
                        }
                        if call.comment.is_none() {
                            // A comment written inside the argument list.
                            call.comment = comments.take();
                        }
                        self.completed.push((frame.seq, call));
                    }
                    self.append(&token, false);
                    if self.frames.is_empty() {
                        self.completed.sort_by_key(|(seq, _)| *seq);
                        released.extend(self.completed.drain(..).map(|(_, call)| call));
                    }
                }
                ")" | "]" | "}" => {
                    self.depth = self.depth.saturating_sub(1);
                    self.append(&token, false);
                }
                "," if self.frames.last().is_some_and(|f| f.open_depth == self.depth) => {
                    self.append(&token, true);
                    if let Some(frame) = self.frames.last_mut() {
                        frame.call.args.push(Vec::new());
                    }
                }
                _ => self.append(&token, false),
            }
        } else {
            self.append(&token, false);
        }

        if self.is_call_candidate(&token) {
            self.candidate = Some(token.clone());
        }
        self.previous = Some(token);

        released
    }

    fn closes_top_frame(&self) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.open_depth == self.depth)
    }

    /// Append a token to the current argument span of every open call,
    /// optionally skipping the innermost one.
    fn append(&mut self, token: &Token<'src>, skip_innermost: bool) {
        let count = if skip_innermost {
            self.frames.len().saturating_sub(1)
        } else {
            self.frames.len()
        };
        for frame in &mut self.frames[..count] {
            if let Some(span) = frame.call.args.last_mut() {
                span.push(token.clone());
            }
        }
    }

    fn is_call_candidate(&self, token: &Token<'src>) -> bool {
        if token.kind != TokenKind::Name
            || is_reserved_word(token.text)
            || !self.keywords.contains(token.text)
        {
            return false;
        }
        // `def _(...)` and `class gettext(...)` define, they do not call.
        !self
            .previous
            .as_ref()
            .is_some_and(|prev| prev.kind == TokenKind::Name && matches!(prev.text, "def" | "class"))
    }
}
