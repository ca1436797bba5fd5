//! Atomic propositions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named boolean signal (an activity or event label).
///
/// Atoms are compared by name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Atom(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomError {
    #[error("atomic proposition name cannot be empty")]
    Empty,
}

impl Atom {
    pub fn new(name: impl Into<String>) -> Result<Self, AtomError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AtomError::Empty);
        }
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether the name can be written bare in the formula text form.
    ///
    /// Single uppercase letters are reserved for temporal operators.
    pub fn is_plain_ident(&self) -> bool {
        let mut chars = self.0.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return false;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
        !crate::parser::is_reserved_word(&self.0)
    }
}

impl TryFrom<String> for Atom {
    type Error = AtomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Atom::new(value)
    }
}

impl From<Atom> for String {
    fn from(atom: Atom) -> Self {
        atom.0
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_plain_ident() {
            write!(f, "{}", self.0)
        } else {
            let escaped = self.0.replace('\\', "\\\\").replace('"', "\\\"");
            write!(f, "\"{escaped}\"")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms_with_same_name_are_equal() {
        assert_eq!(Atom::new("slack").unwrap(), Atom::new("slack").unwrap());
        assert_ne!(Atom::new("slack").unwrap(), Atom::new("gmail").unwrap());
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(Atom::new(""), Err(AtomError::Empty));
        assert_eq!(Atom::new("   "), Err(AtomError::Empty));
    }

    #[test]
    fn non_identifier_names_render_quoted() {
        assert_eq!(Atom::new("gmail").unwrap().to_string(), "gmail");
        assert_eq!(Atom::new("google Drive").unwrap().to_string(), "\"google Drive\"");
        assert_eq!(Atom::new("F").unwrap().to_string(), "\"F\"");
    }
}
