//! Argument binding.
//!
//! Maps the top-level argument spans of a matched call onto the roles its
//! keyword declares. Positional arguments take roles by position, keyword
//! arguments by name through [`keyword_argument_role`]. Names without a role
//! (for example `mapping=`) are ignored rather than treated as message text.
//!
//! Only literal strings (or adjacent literals, which Python concatenates) are
//! accepted for text roles. Anything else is dynamic and the call is skipped;
//! the extractor never guesses at text it cannot see.

use crate::core::{
    extract::literal::concat_literals,
    keywords::{KeywordSpec, Role, keyword_argument_role},
    tokenizer::{Token, TokenKind, is_reserved_word},
};

/// Value of an argument bound to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Literal(String),
    Dynamic,
}

/// A call whose roles resolved to literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundCall {
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgctxt: Option<String>,
    /// Literal `default=` text.
    pub default: Option<String>,
    pub domain: Option<String>,
}

/// Why a matched call produced no message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unbound {
    MissingMsgid,
    Dynamic(Role),
    ArgumentCount { expected: usize, found: usize },
}

/// One top-level argument of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument<'a, 'src> {
    Positional(&'a [Token<'src>]),
    Keyword(&'a str, &'a [Token<'src>]),
    /// `*args`
    Star,
    /// `**kwargs`
    DoubleStar,
}

pub fn classify<'a, 'src>(span: &'a [Token<'src>]) -> Argument<'a, 'src> {
    match span {
        [first, ..] if first.is_op("**") => Argument::DoubleStar,
        [first, ..] if first.is_op("*") => Argument::Star,
        [name, eq, value @ ..]
            if name.kind == TokenKind::Name && eq.is_op("=") && !is_reserved_word(name.text) =>
        {
            Argument::Keyword(name.text, value)
        }
        _ => Argument::Positional(span),
    }
}

/// Evaluate an argument span: literal text if it is made only of string
/// literals (optionally inside redundant parentheses), dynamic otherwise.
pub fn value_of(span: &[Token<'_>]) -> ArgValue {
    match concat_literals(strip_parens(span)) {
        Some(text) => ArgValue::Literal(text),
        None => ArgValue::Dynamic,
    }
}

fn strip_parens<'a, 'src>(mut span: &'a [Token<'src>]) -> &'a [Token<'src>] {
    while span.len() >= 2
        && span[0].is_op("(")
        && span[span.len() - 1].is_op(")")
        && first_paren_encloses(span)
    {
        span = &span[1..span.len() - 1];
    }
    span
}

/// Whether the opening bracket at `span[0]` is closed by the last token.
fn first_paren_encloses(span: &[Token<'_>]) -> bool {
    let mut depth = 0usize;
    for token in &span[..span.len() - 1] {
        if token.kind != TokenKind::Op {
            continue;
        }
        match token.text {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

#[derive(Debug, Default)]
struct BoundArguments {
    msgid: Option<ArgValue>,
    msgid_plural: Option<ArgValue>,
    context: Option<ArgValue>,
    default: Option<ArgValue>,
    domain: Option<ArgValue>,
}

impl BoundArguments {
    /// The first argument bound to a role wins.
    fn assign(&mut self, role: Role, value: ArgValue) {
        let slot = match role {
            Role::Msgid => &mut self.msgid,
            Role::MsgidPlural => &mut self.msgid_plural,
            Role::Context => &mut self.context,
            Role::DefaultComment => &mut self.default,
            Role::Domain => &mut self.domain,
            Role::Ignored => return,
        };
        slot.get_or_insert(value);
    }

    fn resolve(self) -> Result<BoundCall, Unbound> {
        let msgid = match self.msgid {
            Some(ArgValue::Literal(text)) => text,
            Some(ArgValue::Dynamic) => return Err(Unbound::Dynamic(Role::Msgid)),
            None => return Err(Unbound::MissingMsgid),
        };
        Ok(BoundCall {
            msgid,
            msgid_plural: required_literal(self.msgid_plural, Role::MsgidPlural)?,
            msgctxt: required_literal(self.context, Role::Context)?,
            default: optional_literal(self.default),
            domain: optional_literal(self.domain),
        })
    }
}

/// A dynamic value in this role changes the message identity: skip the call.
fn required_literal(value: Option<ArgValue>, role: Role) -> Result<Option<String>, Unbound> {
    match value {
        Some(ArgValue::Literal(text)) => Ok(Some(text)),
        Some(ArgValue::Dynamic) => Err(Unbound::Dynamic(role)),
        None => Ok(None),
    }
}

/// A dynamic value in this role is treated as absent.
fn optional_literal(value: Option<ArgValue>) -> Option<String> {
    match value {
        Some(ArgValue::Literal(text)) => Some(text),
        _ => None,
    }
}

/// Bind the argument spans of a call to the roles of `spec`.
pub fn bind(spec: &KeywordSpec, args: &[Vec<Token<'_>>]) -> Result<BoundCall, Unbound> {
    if let Some(expected) = spec.total_arguments
        && args.len() != expected
    {
        return Err(Unbound::ArgumentCount {
            expected,
            found: args.len(),
        });
    }

    let mut bound = BoundArguments::default();
    let mut position = 0;
    let mut after_star = false;

    for span in args {
        match classify(span) {
            Argument::Positional(value) => {
                let value = if after_star {
                    ArgValue::Dynamic
                } else {
                    value_of(value)
                };
                bound.assign(spec.role_at(position), value);
                position += 1;
            }
            Argument::Star => {
                // Positions from here on depend on the unpacked sequence.
                after_star = true;
                bound.assign(spec.role_at(position), ArgValue::Dynamic);
                position += 1;
            }
            Argument::Keyword(name, value) => {
                bound.assign(keyword_argument_role(name), value_of(value));
            }
            Argument::DoubleStar => {}
        }
    }

    bound.resolve()
}
