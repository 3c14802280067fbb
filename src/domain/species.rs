// src/domain/species.rs
//
// Species value type and its identity rule

use std::hash::{Hash, Hasher};

/// A group of related species (e.g. birds of prey).
/// Identity is carried by the scientific name.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    scientific_name: String,
}

impl Group {
    pub fn new(name: impl Into<String>, scientific_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scientific_name: scientific_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scientific_name(&self) -> &str {
        &self.scientific_name
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.scientific_name == other.scientific_name
    }
}

impl Eq for Group {}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.scientific_name)
    }
}

/// A specific species.
///
/// Identity rule: if both operands carry a scientific name, equality and
/// hashing are based solely on the scientific name. If neither does, the
/// plain name decides. A name-only species and a fully-specified one are
/// never equal, even when their plain names match - otherwise `Hash` would
/// be inconsistent with `Eq` and the species could not serve as a map key.
#[derive(Debug, Clone)]
pub struct Species {
    name: String,
    scientific_name: Option<String>,
    group: Option<Group>,
}

impl Species {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scientific_name: None,
            group: None,
        }
    }

    pub fn with_scientific_name(
        name: impl Into<String>,
        scientific_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            scientific_name: Some(scientific_name.into()),
            group: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scientific_name(&self) -> Option<&str> {
        self.scientific_name.as_deref()
    }

    pub fn has_scientific_name(&self) -> bool {
        self.scientific_name.is_some()
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    /// Back-fills the scientific name after creation.
    pub fn set_scientific_name(&mut self, scientific_name: impl Into<String>) {
        self.scientific_name = Some(scientific_name.into());
    }

    /// Back-fills the group membership after creation.
    pub fn set_group(&mut self, group: Group) {
        self.group = Some(group);
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        match (&self.scientific_name, &other.scientific_name) {
            (Some(ours), Some(theirs)) => ours == theirs,
            (None, None) => self.name == other.name,
            _ => false,
        }
    }
}

impl Eq for Species {}

impl Hash for Species {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // discriminant keeps name-only and fully-specified species apart
        match &self.scientific_name {
            Some(scientific) => {
                1u8.hash(state);
                scientific.hash(state);
            }
            None => {
                0u8.hash(state);
                self.name.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scientific_name {
            Some(scientific) => write!(f, "{} ({})", self.name, scientific),
            None => write!(f, "{}", self.name),
        }
    }
}
