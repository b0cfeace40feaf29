use std::io::Write;

use anyhow::{Context, Result};

use crate::core::data::Message;

/// Write messages as a pretty-printed JSON array, one object per record.
pub fn write_json<W: Write>(messages: &[Message], out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, messages).context("Failed to serialize messages.")?;
    writeln!(out)?;
    Ok(())
}
