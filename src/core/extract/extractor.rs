//! Message emission.
//!
//! [`PythonExtractor`] holds the per-run configuration (merged keyword table,
//! comment tag, domain filter). Each call to [`PythonExtractor::extract`]
//! returns an [`Extraction`]: a lazy iterator that pulls tokens only as far
//! as needed to produce the next message. Every extraction owns its own
//! tokenizer, comment collector and call stack; only the immutable
//! configuration is shared.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::{
    collect::{CommentCollector, CommentTag},
    data::{Location, Message, format_flags},
    error::{ExtractError, KeywordSpecError, LexError},
    extract::{
        binder::bind,
        call_matcher::{CallMatcher, MatchedCall},
    },
    keywords::KeywordTable,
    tokenizer::Tokenizer,
};

/// Options supplied by the caller for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Additional keyword specifications (`name` or `name:1,2`).
    pub keywords: Vec<String>,
    pub comment_tag: CommentTag,
    /// Only keep messages whose resolved domain equals this one.
    pub domain: Option<String>,
    /// Domain of messages that do not name one explicitly.
    pub default_domain: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PythonExtractor {
    keywords: KeywordTable,
    comment_tag: CommentTag,
    domain: Option<String>,
    default_domain: Option<String>,
}

impl PythonExtractor {
    pub fn new(options: &ExtractOptions) -> Result<Self, KeywordSpecError> {
        Ok(Self {
            keywords: KeywordTable::with_additions(&options.keywords)?,
            comment_tag: options.comment_tag.clone(),
            domain: options.domain.clone(),
            default_domain: options.default_domain.clone(),
        })
    }

    /// Lazily extract messages from `source`.
    ///
    /// `lineno` is added to every reported line, so a block embedded in a
    /// larger file can report absolute positions. Use `0` for a whole file.
    pub fn extract<'a, 'src>(
        &'a self,
        filename: &'a str,
        source: &'src str,
        lineno: usize,
    ) -> Extraction<'a, 'src> {
        Extraction {
            extractor: self,
            filename,
            line_offset: lineno,
            tokens: Tokenizer::new(source),
            matcher: CallMatcher::new(&self.keywords),
            comments: CommentCollector::new(self.comment_tag.clone()),
            ready: VecDeque::new(),
            finished: false,
        }
    }

    /// Extract every message of `source`, stopping at the first syntax error.
    pub fn extract_all(
        &self,
        filename: &str,
        source: &str,
        lineno: usize,
    ) -> Result<Vec<Message>, ExtractError> {
        self.extract(filename, source, lineno).collect()
    }
}

/// Lazy sequence of messages from one source text.
///
/// Yields messages in source order. After a syntax error it yields that
/// error once and then ends; messages still queued are discarded.
#[derive(Debug)]
pub struct Extraction<'a, 'src> {
    extractor: &'a PythonExtractor,
    filename: &'a str,
    line_offset: usize,
    tokens: Tokenizer<'src>,
    matcher: CallMatcher<'a, 'src>,
    comments: CommentCollector,
    ready: VecDeque<Message>,
    finished: bool,
}

impl Extraction<'_, '_> {
    fn fail(&mut self, mut error: LexError) -> ExtractError {
        self.finished = true;
        self.ready.clear();
        error.line += self.line_offset;
        ExtractError::syntax(self.filename, error)
    }

    fn emit(&self, call: MatchedCall<'_, '_>) -> Option<Message> {
        let line = call.start.line + self.line_offset;
        let bound = match bind(call.keyword, &call.args) {
            Ok(bound) => bound,
            Err(reason) => {
                debug!(
                    file = self.filename,
                    line,
                    keyword = %call.keyword.name,
                    ?reason,
                    "skipping call without literal message"
                );
                return None;
            }
        };

        let domain = bound
            .domain
            .or_else(|| self.extractor.default_domain.clone());
        if let (Some(filter), Some(domain)) = (&self.extractor.domain, &domain)
            && filter != domain
        {
            debug!(file = self.filename, line, %domain, "skipping message from other domain");
            return None;
        }

        let comment = match bound.default {
            Some(default) => format!("Default: {}", default),
            None => call.comment.unwrap_or_default(),
        };
        let flags = format_flags(&bound.msgid, bound.msgid_plural.as_deref());

        Some(Message {
            msgctxt: bound.msgctxt,
            msgid: bound.msgid,
            msgid_plural: bound.msgid_plural,
            flags,
            comment,
            location: Location::new(self.filename, line, call.start.column),
            domain,
        })
    }
}

impl Iterator for Extraction<'_, '_> {
    type Item = Result<Message, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(message) = self.ready.pop_front() {
                return Some(Ok(message));
            }
            if self.finished {
                return None;
            }

            let token = match self.tokens.next() {
                Some(Ok(token)) => token,
                Some(Err(error)) => return Some(Err(self.fail(error))),
                None => {
                    self.finished = true;
                    continue;
                }
            };

            for call in self.matcher.feed(token, &mut self.comments) {
                if let Some(message) = self.emit(call) {
                    self.ready.push_back(message);
                }
            }
        }
    }
}
