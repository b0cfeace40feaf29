//! gettext template writer.
//!
//! ```text
//! #. Shown on the checkout button
//! #: shop/views.py:12 shop/forms.py:40
//! #, python-format
//! msgctxt "button"
//! msgid "Pay %s"
//! msgstr ""
//! ```

use std::io::{self, Write};

use crate::catalog::{Catalog, CatalogEntry};

const HEADER_FIELDS: &[&str] = &[
    "Project-Id-Version: PACKAGE VERSION",
    "Report-Msgid-Bugs-To: ",
    "MIME-Version: 1.0",
    "Content-Type: text/plain; charset=UTF-8",
    "Content-Transfer-Encoding: 8bit",
];

pub fn write_pot<W: Write>(catalog: &Catalog, out: &mut W) -> io::Result<()> {
    write_header(out)?;
    for entry in catalog.entries() {
        writeln!(out)?;
        write_entry(entry, out)?;
    }
    Ok(())
}

fn write_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "# Translations template.")?;
    writeln!(out, "#, fuzzy")?;
    writeln!(out, "msgid \"\"")?;
    writeln!(out, "msgstr \"\"")?;
    for field in HEADER_FIELDS {
        writeln!(out, "\"{}\\n\"", escape(field))?;
    }
    writeln!(
        out,
        "\"Generated-By: {} {}\\n\"",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

fn write_entry<W: Write>(entry: &CatalogEntry, out: &mut W) -> io::Result<()> {
    for comment in &entry.comments {
        for line in comment.lines() {
            writeln!(out, "#. {}", line)?;
        }
    }
    if !entry.locations.is_empty() {
        let references: Vec<String> = entry.locations.iter().map(ToString::to_string).collect();
        writeln!(out, "#: {}", references.join(" "))?;
    }
    if !entry.flags.is_empty() {
        writeln!(out, "#, {}", entry.flags.join(", "))?;
    }
    if let Some(msgctxt) = &entry.msgctxt {
        write_field(out, "msgctxt", msgctxt)?;
    }
    write_field(out, "msgid", &entry.msgid)?;
    match &entry.msgid_plural {
        Some(plural) => {
            write_field(out, "msgid_plural", plural)?;
            writeln!(out, "msgstr[0] \"\"")?;
            writeln!(out, "msgstr[1] \"\"")
        }
        None => writeln!(out, "msgstr \"\""),
    }
}

/// Write `keyword "value"`, splitting multi-line values after each newline.
fn write_field<W: Write>(out: &mut W, keyword: &str, value: &str) -> io::Result<()> {
    let trimmed = value.strip_suffix('\n').unwrap_or(value);
    if !trimmed.contains('\n') {
        return writeln!(out, "{} \"{}\"", keyword, escape(value));
    }
    writeln!(out, "{} \"\"", keyword)?;
    for line in value.split_inclusive('\n') {
        writeln!(out, "\"{}\"", escape(line))?;
    }
    Ok(())
}

/// Escape a string for a PO file.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}
