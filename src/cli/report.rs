//! Report formatting and printing utilities.
//!
//! Renders extracted messages in a cargo-style listing for the `text`
//! output format. Kept apart from the core so pyglot can be used as a
//! library without pulling terminal formatting in.

use std::io::{self, Write};

use colored::Colorize;

use crate::catalog::pot::escape;
use crate::core::data::Message;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Print messages in source order to a custom writer.
///
/// ```text
/// app/views.py:12:9: "Pay now"
///   = context: button
///   = comment: Shown on the checkout button
/// ```
pub fn report_to<W: Write>(messages: &[Message], writer: &mut W) -> io::Result<()> {
    for message in messages {
        print_message(message, writer)?;
    }
    Ok(())
}

fn print_message<W: Write>(message: &Message, writer: &mut W) -> io::Result<()> {
    let location = &message.location;
    writeln!(
        writer,
        "{}:{}:{}: \"{}\"",
        location.filename,
        location.line,
        location.column,
        escape(&message.msgid).bold()
    )?;

    if let Some(plural) = &message.msgid_plural {
        print_note(writer, "plural:", &format!("\"{}\"", escape(plural)))?;
    }
    if let Some(msgctxt) = &message.msgctxt {
        print_note(writer, "context:", msgctxt)?;
    }
    if !message.comment.is_empty() {
        print_note(writer, "comment:", &message.comment)?;
    }
    if !message.flags.is_empty() {
        print_note(writer, "flags:", &message.flags.join(", "))?;
    }
    Ok(())
}

fn print_note<W: Write>(writer: &mut W, label: &str, value: &str) -> io::Result<()> {
    writeln!(writer, "  {} {} {}", "=".blue(), label.bold(), value)
}

/// Print the closing summary line.
pub fn print_summary_to<W: Write>(
    message_count: usize,
    file_count: usize,
    writer: &mut W,
) -> io::Result<()> {
    let msg = format!(
        "Extracted {} {} from {} {}",
        message_count,
        if message_count == 1 { "message" } else { "messages" },
        file_count,
        if file_count == 1 { "file" } else { "files" }
    );
    writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green())
}
