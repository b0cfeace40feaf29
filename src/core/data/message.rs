use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

/// printf-style placeholder. A `%%` match is an escaped percent sign.
static PYTHON_FORMAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?:\([^)]*\))?[#0 +\-]*(?:\*|\d+)?(?:\.(?:\*|\d+))?[hlL]?([diouxXeEfFgGcrsa%])")
        .unwrap()
});

/// `str.format` replacement field. `{{` and `}}` are escaped braces.
static BRACE_FORMAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{(?:[A-Za-z_][A-Za-z0-9_]*|\d+)?(?:[.\[][^{}!:]*)?(?:![rsa])?(?::[^{}]*)?\}")
        .unwrap()
});

pub const PYTHON_FORMAT_FLAG: &str = "python-format";
pub const PYTHON_BRACE_FORMAT_FLAG: &str = "python-brace-format";

/// Where a message was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub filename: String,
    /// Line number, already adjusted by the caller's line offset.
    pub line: usize,
    /// Column of the keyword identifier (1-indexed).
    pub column: usize,
}

impl Location {
    pub fn new(filename: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// A translatable message extracted from one keyword call.
///
/// ```ignore
/// # I18N: Button label
/// ngettext("one file", "%d files", count)
/// ```
///
/// becomes `msgid = "one file"`, `msgid_plural = Some("%d files")`,
/// `comment = "Button label"` and `flags = ["python-format"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    /// Format flags detected from the message text.
    pub flags: Vec<String>,
    /// Translator comment: the source comment, or `Default: <text>` when the
    /// call supplied a literal `default=` argument. Empty when there is none.
    pub comment: String,
    pub location: Location,
    /// Explicit or default domain; used only for filtering.
    pub domain: Option<String>,
}

/// Format flags for a message and its optional plural.
pub fn format_flags(msgid: &str, msgid_plural: Option<&str>) -> Vec<String> {
    let texts = || std::iter::once(msgid).chain(msgid_plural);
    let mut flags = Vec::new();
    if texts().any(has_python_format) {
        flags.push(PYTHON_FORMAT_FLAG.to_string());
    }
    if texts().any(has_brace_format) {
        flags.push(PYTHON_BRACE_FORMAT_FLAG.to_string());
    }
    flags
}

fn has_python_format(text: &str) -> bool {
    PYTHON_FORMAT_REGEX
        .captures_iter(text)
        .any(|caps| caps.get(0).is_some_and(|m| m.as_str() != "%%"))
}

fn has_brace_format(text: &str) -> bool {
    BRACE_FORMAT_REGEX
        .find_iter(text)
        .any(|m| m.as_str() != "{{" && m.as_str() != "}}")
}
