//! String literal evaluation.
//!
//! Python joins adjacent string literals into one string at compile time,
//! even across line breaks inside brackets. The extractor reproduces that as
//! a fold over the literal tokens of one argument: each literal is decoded on
//! its own (prefix and escapes) and the pieces are joined with no separator.

use crate::core::tokenizer::{Token, TokenKind};

/// Decoded form of a single string literal token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Text(String),
    /// f-strings and t-strings: their value depends on runtime data.
    Interpolated,
}

/// Evaluate one string literal token text such as `u'caf\xe9'` or `r"\d"`.
///
/// Returns `None` when the text is not a string literal at all.
pub fn parse_literal(text: &str) -> Option<LiteralValue> {
    let body_start = text.find(['\'', '"'])?;
    let prefix = text[..body_start].to_ascii_lowercase();
    if !prefix.chars().all(|c| matches!(c, 'r' | 'u' | 'b' | 'f' | 't')) {
        return None;
    }
    if prefix.contains(['f', 't']) {
        return Some(LiteralValue::Interpolated);
    }

    let quoted = &text[body_start..];
    let quote_len = if quoted.starts_with("'''") || quoted.starts_with("\"\"\"") {
        3
    } else {
        1
    };
    if quoted.len() < quote_len * 2 {
        return None;
    }
    let body = &quoted[quote_len..quoted.len() - quote_len];

    if prefix.contains('r') {
        return Some(LiteralValue::Text(body.to_string()));
    }
    Some(LiteralValue::Text(unescape(body, prefix.contains('b'))))
}

/// Fold a run of tokens into one string, if every token is a plain literal.
///
/// Returns `None` when the run is empty or contains anything other than
/// non-interpolated string literals.
pub fn concat_literals<'a, 'src: 'a>(
    tokens: impl IntoIterator<Item = &'a Token<'src>>,
) -> Option<String> {
    let mut result: Option<String> = None;
    for token in tokens {
        if token.kind != TokenKind::String {
            return None;
        }
        match parse_literal(token.text)? {
            LiteralValue::Text(text) => result.get_or_insert_with(String::new).push_str(&text),
            LiteralValue::Interpolated => return None,
        }
    }
    result
}

/// Decode backslash escapes the way Python does for non-raw literals.
///
/// Unknown escapes are kept verbatim (backslash included), as are `\N{...}`
/// named escapes. In byte literals `\u` and `\U` are not escapes.
pub fn unescape(body: &str, bytes: bool) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\u{fffd}'));
            }
            'x' => push_hex_escape(&mut out, &mut chars, 'x', 2),
            'u' if !bytes => push_hex_escape(&mut out, &mut chars, 'u', 4),
            'U' if !bytes => push_hex_escape(&mut out, &mut chars, 'U', 8),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn push_hex_escape(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    marker: char,
    digits: usize,
) {
    let lookahead: String = chars.clone().take(digits).collect();
    let decoded = (lookahead.len() == digits && lookahead.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| u32::from_str_radix(&lookahead, 16).ok())
        .flatten()
        .and_then(char::from_u32);

    match decoded {
        Some(c) => {
            out.push(c);
            for _ in 0..digits {
                chars.next();
            }
        }
        None => {
            out.push('\\');
            out.push(marker);
        }
    }
}
