//! Python tokenizer.
//!
//! The source is parsed once with tree-sitter-python and the leaves of the
//! syntax tree are replayed, in source order, as the token stream the call
//! matcher walks. A string literal (prefix, quotes, f-string fields and all)
//! is one token. Line breaks are not tree nodes, so they are recovered from
//! the text between leaves: `Newline` ends a logical line, `Nl` is a line
//! break inside brackets or on a blank or comment-only line.
//!
//! Any error or missing node in the tree ends the stream at that point:
//! after a broken token there is no reliable point to resynchronise from.

use std::{collections::VecDeque, vec};

use tree_sitter::{Node, Parser, Tree};

use crate::core::error::LexError;

/// Python reserved words. None of them can name a call.
pub const RESERVED_WORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

const MISSING_COMMA: &str = "invalid syntax. Perhaps you forgot a comma?";

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Number,
    String,
    Comment,
    Op,
    /// End of a logical line.
    Newline,
    /// Line break that does not end a logical line.
    Nl,
    EndMarker,
}

/// 1-based line and column (in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub start: Position,
    pub end: Position,
    /// Physical line the token starts on, without its line terminator.
    pub line: &'src str,
}

impl Token<'_> {
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }
}

/// A leaf of the syntax tree, before positions are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Leaf<'src> {
    kind: TokenKind,
    text: &'src str,
    start: usize,
}

impl Leaf<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// A literal or a plain name. Reserved words are operators, except the
    /// three constants.
    fn is_operand(&self) -> bool {
        match self.kind {
            TokenKind::Number | TokenKind::String => true,
            TokenKind::Name => {
                !is_reserved_word(self.text) || matches!(self.text, "True" | "False" | "None")
            }
            _ => false,
        }
    }
}

enum NodeClass<'src> {
    Inner,
    Leaf(Leaf<'src>),
    Ignored,
}

fn classify<'src>(source: &'src str, node: Node<'_>) -> NodeClass<'src> {
    let text = source.get(node.byte_range()).unwrap_or("");
    let leaf = |kind| {
        NodeClass::Leaf(Leaf {
            kind,
            text,
            start: node.start_byte(),
        })
    };
    match node.kind() {
        "string" => leaf(TokenKind::String),
        "line_continuation" => NodeClass::Ignored,
        _ if node.child_count() > 0 => NodeClass::Inner,
        _ if text.trim().is_empty() => NodeClass::Ignored,
        "comment" => leaf(TokenKind::Comment),
        "integer" | "float" => leaf(TokenKind::Number),
        _ if text.starts_with(is_identifier_start) => leaf(TokenKind::Name),
        _ => leaf(TokenKind::Op),
    }
}

enum Step {
    Descend,
    Skip,
    Stop,
}

/// Pre-order walk of the subtree rooted at `root`.
fn walk_tree<'tree>(root: Node<'tree>, mut visit: impl FnMut(Node<'tree>) -> Step) {
    let mut cursor = root.walk();
    loop {
        match visit(cursor.node()) {
            Step::Stop => return,
            Step::Descend if cursor.goto_first_child() => continue,
            Step::Descend | Step::Skip => {}
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn is_fault(node: Node<'_>) -> bool {
    node.is_error() || node.is_missing()
}

fn first_fault(root: Node<'_>) -> Option<Node<'_>> {
    let mut found = None;
    walk_tree(root, |node| {
        if is_fault(node) {
            found = Some(node);
            Step::Stop
        } else {
            Step::Descend
        }
    });
    found
}

/// The `string_start` of a literal that never got its closing quote.
fn unclosed_string_start(root: Node<'_>) -> Option<Node<'_>> {
    let mut found = None;
    walk_tree(root, |node| match node.kind() {
        "string_start" if node.parent().is_none_or(|parent| parent.kind() != "string") => {
            found = Some(node);
            Step::Stop
        }
        "string" if !node.has_error() => Step::Skip,
        _ => Step::Descend,
    });
    found
}

fn parse(source: &str) -> Result<Tree, String> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| format!("failed to load the Python grammar: {e}"))?;
    parser
        .parse(source, None)
        .ok_or_else(|| "failed to parse source".to_string())
}

/// Collects the leaves of a parsed module up to the first fault.
struct LeafCollector<'src> {
    source: &'src str,
    leaves: Vec<Leaf<'src>>,
    /// Open brackets among the collected leaves, with their byte offsets.
    brackets: Vec<(&'src str, usize)>,
}

impl<'src> LeafCollector<'src> {
    fn collect(source: &'src str) -> (Vec<Leaf<'src>>, Option<LexError>) {
        let tree = match parse(source) {
            Ok(tree) => tree,
            Err(message) => return (Vec::new(), Some(LexError::new(1, 1, message))),
        };

        let mut collector = Self {
            source,
            leaves: Vec::new(),
            brackets: Vec::new(),
        };
        let mut error = None;
        walk_tree(tree.root_node(), |node| {
            if is_fault(node) {
                error = Some(collector.describe(node));
                return Step::Stop;
            }
            if node.kind() == "string" && node.has_error() {
                error = Some(collector.describe(first_fault(node).unwrap_or(node)));
                return Step::Stop;
            }
            match classify(source, node) {
                NodeClass::Inner => Step::Descend,
                NodeClass::Leaf(leaf) => {
                    collector.push(leaf);
                    Step::Skip
                }
                NodeClass::Ignored => Step::Skip,
            }
        });
        (collector.leaves, error)
    }

    fn push(&mut self, leaf: Leaf<'src>) {
        if leaf.kind == TokenKind::Op {
            match leaf.text {
                "(" | "[" | "{" => self.brackets.push((leaf.text, leaf.start)),
                ")" | "]" | "}" => {
                    self.brackets.pop();
                }
                _ => {}
            }
        }
        self.leaves.push(leaf);
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> LexError {
        let at = position_at(self.source, offset);
        LexError::new(at.line, at.column, message)
    }

    /// Turn a fault node into the error Python would report for it.
    fn describe(&self, node: Node<'_>) -> LexError {
        if node.is_missing() {
            return match node.kind() {
                "string_end" => {
                    let start = node
                        .parent()
                        .and_then(|string| string.child(0))
                        .unwrap_or(node);
                    self.unterminated(start)
                }
                ")" | "]" | "}" => match self.brackets.last() {
                    Some((open, at)) => self.error_at(*at, format!("'{open}' was never closed")),
                    None => self.error_at(node.start_byte(), "invalid syntax"),
                },
                kind => self.error_at(node.start_byte(), format!("expected '{kind}'")),
            };
        }

        if let Some(start) = unclosed_string_start(node) {
            return self.unterminated(start);
        }

        let inner = self.leading_leaves(node, 2);

        if !self.brackets.is_empty() {
            let run: Vec<Leaf<'_>> = self.leaves.last().into_iter().chain(&inner).copied().collect();
            for pair in run.windows(2) {
                let both_strings =
                    pair[0].kind == TokenKind::String && pair[1].kind == TokenKind::String;
                if pair[0].is_operand() && pair[1].is_operand() && !both_strings {
                    return self.error_at(pair[0].start, MISSING_COMMA);
                }
            }
        }

        if let Some(first) = inner.first()
            && matches!(first.text, ")" | "]" | "}")
        {
            return match self.brackets.last() {
                None => self.error_at(first.start, format!("unmatched '{}'", first.text)),
                Some((open, _)) => self.error_at(
                    first.start,
                    format!(
                        "closing parenthesis '{}' does not match opening parenthesis '{}'",
                        first.text, open
                    ),
                ),
            };
        }

        self.error_at(node.start_byte(), "invalid syntax")
    }

    fn unterminated(&self, string_start: Node<'_>) -> LexError {
        let opening = self.source.get(string_start.byte_range()).unwrap_or("");
        let message = if opening.ends_with("'''") || opening.ends_with("\"\"\"") {
            "unterminated triple-quoted string literal"
        } else {
            "unterminated string literal"
        };
        self.error_at(string_start.start_byte(), message)
    }

    fn leading_leaves(&self, root: Node<'_>, limit: usize) -> Vec<Leaf<'src>> {
        let mut leaves = Vec::new();
        walk_tree(root, |node| {
            if leaves.len() == limit {
                return Step::Stop;
            }
            match classify(self.source, node) {
                NodeClass::Inner => Step::Descend,
                NodeClass::Leaf(leaf) => {
                    leaves.push(leaf);
                    Step::Skip
                }
                NodeClass::Ignored => Step::Skip,
            }
        });
        leaves
    }
}

fn position_at(source: &str, offset: usize) -> Position {
    let before = source.get(..offset).unwrap_or(source);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position {
        line: before.matches('\n').count() + 1,
        column: before[line_start..].chars().count() + 1,
    }
}

fn line_at(source: &str, offset: usize) -> &str {
    let rest = source.get(offset..).unwrap_or("");
    let end = rest.find('\n').unwrap_or(rest.len());
    rest[..end].trim_end_matches('\r')
}

/// Converts byte offsets to positions. Offsets must not decrease, which
/// keeps the work linear in the length of the source.
#[derive(Debug)]
struct LineCursor<'src> {
    source: &'src str,
    offset: usize,
    line: usize,
    column: usize,
    line_text: &'src str,
}

impl<'src> LineCursor<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            line_text: line_at(source, 0),
        }
    }

    fn advance_to(&mut self, offset: usize) -> Position {
        if let Some(skipped) = self.source.get(self.offset..offset) {
            for (i, c) in skipped.char_indices() {
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                    self.line_text = line_at(self.source, self.offset + i + 1);
                } else {
                    self.column += 1;
                }
            }
            self.offset = offset;
        }
        Position {
            line: self.line,
            column: self.column,
        }
    }
}

/// Lazy token stream over a decoded Python source.
#[derive(Debug)]
pub struct Tokenizer<'src> {
    source: &'src str,
    leaves: vec::IntoIter<Leaf<'src>>,
    error: Option<LexError>,
    cursor: LineCursor<'src>,
    /// End of the last leaf; line breaks are looked for from here.
    offset: usize,
    depth: usize,
    line_has_content: bool,
    queue: VecDeque<Token<'src>>,
    finished: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let (leaves, error) = LeafCollector::collect(source);
        Self {
            source,
            leaves: leaves.into_iter(),
            error,
            cursor: LineCursor::new(source),
            offset: 0,
            depth: 0,
            line_has_content: false,
            queue: VecDeque::new(),
            finished: false,
        }
    }

    /// Queue a token for every line break between the last leaf and `until`.
    fn line_breaks(&mut self, until: usize) {
        let source = self.source;
        let Some(gap) = source.get(self.offset..until) else {
            return;
        };
        let mut continued = false;
        for (i, c) in gap.char_indices() {
            match c {
                '\\' => continued = true,
                '\n' if continued => continued = false,
                '\n' => {
                    let at = self.offset + i;
                    let kind = if self.depth == 0 && self.line_has_content {
                        TokenKind::Newline
                    } else {
                        TokenKind::Nl
                    };
                    let start = self.cursor.advance_to(at);
                    self.queue.push_back(Token {
                        kind,
                        text: &gap[i..i + 1],
                        start,
                        end: Position {
                            line: start.line,
                            column: start.column + 1,
                        },
                        line: self.cursor.line_text,
                    });
                    if self.depth == 0 {
                        self.line_has_content = false;
                    }
                }
                _ => {}
            }
        }
        self.offset = until;
    }

    fn leaf_token(&mut self, leaf: Leaf<'src>) -> Token<'src> {
        let start = self.cursor.advance_to(leaf.start);
        let line = self.cursor.line_text;
        let end = self.cursor.advance_to(leaf.end());
        self.offset = leaf.end();

        match leaf.kind {
            TokenKind::Comment => {}
            TokenKind::Op => {
                match leaf.text {
                    "(" | "[" | "{" => self.depth += 1,
                    ")" | "]" | "}" => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                self.line_has_content = true;
            }
            _ => self.line_has_content = true,
        }

        Token {
            kind: leaf.kind,
            text: leaf.text,
            start,
            end,
            line,
        }
    }

    fn end_of_input(&mut self) {
        let at = self.cursor.advance_to(self.source.len());
        if self.line_has_content {
            self.line_has_content = false;
            self.queue.push_back(Token {
                kind: TokenKind::Newline,
                text: "",
                start: at,
                end: at,
                line: self.cursor.line_text,
            });
        }
        self.queue.push_back(Token {
            kind: TokenKind::EndMarker,
            text: "",
            start: at,
            end: at,
            line: "",
        });
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(Ok(token));
            }
            if self.finished {
                return None;
            }

            match self.leaves.next() {
                Some(leaf) => {
                    self.line_breaks(leaf.start);
                    let token = self.leaf_token(leaf);
                    self.queue.push_back(token);
                }
                None => {
                    self.finished = true;
                    if let Some(error) = self.error.take() {
                        return Some(Err(error));
                    }
                    self.line_breaks(self.source.len());
                    self.end_of_input();
                }
            }
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}
