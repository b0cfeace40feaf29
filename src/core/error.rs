//! Error types surfaced by the extraction engine.
//!
//! Only two things can go wrong inside the core: the source cannot be
//! parsed (fatal for the whole file) or a user-supplied keyword
//! specification is malformed. Dynamic arguments, unknown keyword arguments
//! and domain mismatches are not errors; they simply produce no record.

use thiserror::Error;

/// Fatal error raised while extracting messages from one file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The source does not parse. Token boundaries after this point are
    /// unreliable, so extraction stops here.
    #[error("{filename}:{line}:{column}: {message}")]
    Syntax {
        filename: String,
        line: usize,
        column: usize,
        message: String,
    },
}

impl ExtractError {
    pub fn syntax(filename: impl Into<String>, error: LexError) -> Self {
        ExtractError::Syntax {
            filename: filename.into(),
            line: error.line,
            column: error.column,
            message: error.message,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            ExtractError::Syntax { filename, .. } => filename,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ExtractError::Syntax { line, .. } => *line,
        }
    }
}

/// Syntax error produced by the tokenizer, before a file name is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl LexError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// A keyword specification such as `ngettext:1,2` could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordSpecError {
    #[error("keyword specification is empty")]
    EmptyName,
    #[error("invalid argument position '{arg}' in keyword '{spec}'")]
    InvalidPosition { spec: String, arg: String },
    #[error("keyword '{spec}' names more than two message arguments")]
    TooManyMessages { spec: String },
    #[error("keyword '{spec}' uses argument {position} twice")]
    DuplicatePosition { spec: String, position: usize },
    #[error("keyword '{spec}' has no msgid argument")]
    MissingMsgid { spec: String },
}
