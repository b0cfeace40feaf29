//! Translation keyword table.
//!
//! A keyword names a function whose call marks translatable text, together
//! with the argument positions that carry the msgid, plural, context and
//! domain. User keywords use the xgettext notation (`ngettext:1,2`,
//! `pgettext:1c,2`, `fn:1,2t`) and are merged over the built-in table once
//! per run; the merged table is immutable afterwards.

use std::collections::HashMap;

use crate::core::error::KeywordSpecError;

/// Semantic role of a call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Msgid,
    MsgidPlural,
    Context,
    /// `default=` of translationstring-style calls; becomes `Default: <text>`.
    DefaultComment,
    Domain,
    Ignored,
}

/// Role of a keyword argument, shared by every keyword.
pub fn keyword_argument_role(name: &str) -> Role {
    match name {
        "default" => Role::DefaultComment,
        "context" | "msgctxt" => Role::Context,
        "domain" => Role::Domain,
        _ => Role::Ignored,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSpec {
    pub name: String,
    /// Role of each positional argument; position `i` is argument `i + 1`.
    /// Positions past the end are ignored.
    pub positional: Vec<Role>,
    /// Exact argument count the call must have to match (`Nt` in xgettext).
    pub total_arguments: Option<usize>,
}

impl KeywordSpec {
    /// A keyword whose first argument is the msgid.
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positional: vec![Role::Msgid],
            total_arguments: None,
        }
    }

    /// Build a keyword from 1-based positions. `domain` and `context` are
    /// optional; `plural` is optional too.
    fn with_positions(
        name: &str,
        domain: Option<usize>,
        context: Option<usize>,
        msgid: usize,
        plural: Option<usize>,
    ) -> Self {
        let mut assignments = vec![(msgid, Role::Msgid)];
        assignments.extend(domain.map(|p| (p, Role::Domain)));
        assignments.extend(context.map(|p| (p, Role::Context)));
        assignments.extend(plural.map(|p| (p, Role::MsgidPlural)));
        Self {
            name: name.to_string(),
            positional: roles_from(&assignments),
            total_arguments: None,
        }
    }

    /// Parse an xgettext-style keyword specification.
    pub fn parse(spec: &str) -> Result<Self, KeywordSpecError> {
        let spec = spec.trim();
        let (name, args) = match spec.split_once(':') {
            Some((name, args)) => (name.trim(), Some(args)),
            None => (spec, None),
        };
        if name.is_empty() {
            return Err(KeywordSpecError::EmptyName);
        }
        let Some(args) = args else {
            return Ok(Self::simple(name));
        };

        let mut messages: Vec<usize> = Vec::new();
        let mut context = None;
        let mut total_arguments = None;
        let mut used: Vec<usize> = Vec::new();

        for arg in args.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            let (digits, marker) = match arg.char_indices().last() {
                Some((idx, c @ ('c' | 't'))) => (&arg[..idx], Some(c)),
                _ => (arg, None),
            };
            let position = digits
                .parse::<usize>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| KeywordSpecError::InvalidPosition {
                    spec: spec.to_string(),
                    arg: arg.to_string(),
                })?;

            if marker == Some('t') {
                total_arguments = Some(position);
                continue;
            }
            if used.contains(&position) {
                return Err(KeywordSpecError::DuplicatePosition {
                    spec: spec.to_string(),
                    position,
                });
            }
            used.push(position);

            if marker == Some('c') {
                context = Some(position);
            } else if messages.len() == 2 {
                return Err(KeywordSpecError::TooManyMessages {
                    spec: spec.to_string(),
                });
            } else {
                messages.push(position);
            }
        }

        let Some(&msgid) = messages.first() else {
            return Err(KeywordSpecError::MissingMsgid {
                spec: spec.to_string(),
            });
        };
        let mut keyword =
            Self::with_positions(name, None, context, msgid, messages.get(1).copied());
        keyword.total_arguments = total_arguments;
        Ok(keyword)
    }

    pub fn role_at(&self, index: usize) -> Role {
        self.positional.get(index).copied().unwrap_or(Role::Ignored)
    }
}

fn roles_from(assignments: &[(usize, Role)]) -> Vec<Role> {
    let len = assignments.iter().map(|(p, _)| *p).max().unwrap_or(0);
    let mut roles = vec![Role::Ignored; len];
    for (position, role) in assignments {
        roles[position - 1] = *role;
    }
    roles
}

/// Built-in gettext keywords.
pub fn default_keywords() -> Vec<KeywordSpec> {
    let with = KeywordSpec::with_positions;
    vec![
        KeywordSpec::simple("_"),
        KeywordSpec::simple("gettext"),
        KeywordSpec::simple("ugettext"),
        KeywordSpec::simple("N_"),
        with("ngettext", None, None, 1, Some(2)),
        with("ungettext", None, None, 1, Some(2)),
        with("pluralize", None, None, 1, Some(2)),
        with("dgettext", Some(1), None, 2, None),
        with("dngettext", Some(1), None, 2, Some(3)),
        with("pgettext", None, Some(1), 2, None),
        with("npgettext", None, Some(1), 2, Some(3)),
        with("dpgettext", Some(1), Some(2), 3, None),
        with("dnpgettext", Some(1), Some(2), 3, Some(4)),
    ]
}

/// Immutable keyword lookup built once per extraction run.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    specs: HashMap<String, KeywordSpec>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::from_specs(default_keywords())
    }
}

impl KeywordTable {
    pub fn from_specs(specs: impl IntoIterator<Item = KeywordSpec>) -> Self {
        Self {
            specs: specs
                .into_iter()
                .map(|spec| (spec.name.clone(), spec))
                .collect(),
        }
    }

    /// Built-in keywords plus user additions. An addition with a built-in
    /// name replaces the built-in entry.
    pub fn with_additions<S: AsRef<str>>(additions: &[S]) -> Result<Self, KeywordSpecError> {
        let mut table = Self::default();
        for addition in additions {
            let spec = KeywordSpec::parse(addition.as_ref())?;
            table.specs.insert(spec.name.clone(), spec);
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&KeywordSpec> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
