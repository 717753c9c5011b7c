//! Tracked ant identities
//!
//! Ant kinds were renamed between file generations. Old names survive only as
//! legacy aliases used while reading version 2 files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction class of a tracked ant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AntKind {
    /// Ant leaving the nest
    Outbound,
    /// Ant returning to the nest
    Inbound,
    #[default]
    Unknown,
}

/// Names used by version 2 files, mapped onto the current kinds
static LEGACY_ALIASES: &[(&str, AntKind)] = &[
    ("Forager", AntKind::Outbound),
    ("Control", AntKind::Inbound),
];

impl AntKind {
    pub const ALL: [Self; 3] = [Self::Outbound, Self::Inbound, Self::Unknown];

    /// Canonical identifier, as written to files
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Outbound => "Outbound",
            Self::Inbound => "Inbound",
            Self::Unknown => "Unknown",
        }
    }

    /// The pre-rename name of this kind, if it had one
    #[must_use]
    pub fn legacy_alias(self) -> Option<&'static str> {
        LEGACY_ALIASES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(alias, _)| *alias)
    }

    /// Resolve a kind by its current name, falling back to legacy aliases.
    pub fn resolve(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .or_else(|| {
                LEGACY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, kind)| *kind)
            })
            .ok_or_else(|| Error::UnknownIdentityKind {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for AntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AntKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

/// A tracked subject: numeric id plus kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AntIdentity {
    pub id: u32,
    pub kind: AntKind,
}

impl AntIdentity {
    #[must_use]
    pub fn new(id: u32, kind: AntKind) -> Self {
        Self { id, kind }
    }
}

impl fmt::Display for AntIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ant {} ({})", self.id, self.kind)
    }
}
