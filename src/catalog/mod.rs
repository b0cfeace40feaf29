//! Message catalog assembled from extracted messages.
//!
//! Messages that share `(msgctxt, msgid)` are merged into one entry so each
//! translatable string appears once in the output, with every location it
//! was found at.
//!
//! ## Module Structure
//!
//! - `pot`: gettext template (`.pot`) writer
//! - `json`: JSON writer

pub mod json;
pub mod pot;

use std::collections::HashMap;

use crate::core::data::{Location, Message};

pub use json::write_json;
pub use pot::write_pot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub flags: Vec<String>,
    pub comments: Vec<String>,
    pub locations: Vec<Location>,
}

impl CatalogEntry {
    fn new(message: Message) -> Self {
        let mut entry = Self {
            msgctxt: message.msgctxt,
            msgid: message.msgid,
            msgid_plural: None,
            flags: Vec::new(),
            comments: Vec::new(),
            locations: Vec::new(),
        };
        entry.merge(message.msgid_plural, message.flags, message.comment, message.location);
        entry
    }

    fn merge(
        &mut self,
        msgid_plural: Option<String>,
        flags: Vec<String>,
        comment: String,
        location: Location,
    ) {
        if self.msgid_plural.is_none() {
            self.msgid_plural = msgid_plural;
        }
        for flag in flags {
            if !self.flags.contains(&flag) {
                self.flags.push(flag);
            }
        }
        if !comment.is_empty() && !self.comments.contains(&comment) {
            self.comments.push(comment);
        }
        if !self.locations.contains(&location) {
            self.locations.push(location);
        }
    }
}

type EntryKey = (Option<String>, String);

/// Entries in first-seen order.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<EntryKey, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: Message) {
        let key = (message.msgctxt.clone(), message.msgid.clone());
        match self.index.get(&key) {
            Some(&i) => self.entries[i].merge(
                message.msgid_plural,
                message.flags,
                message.comment,
                message.location,
            ),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(CatalogEntry::new(message));
            }
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Message> for Catalog {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for message in iter {
            catalog.add(message);
        }
        catalog
    }
}
