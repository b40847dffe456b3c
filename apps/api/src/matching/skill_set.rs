//! Skill Set Algebra: normalized skill sets and the differences/unions built on them.
//!
//! Members are keyed by their normalized form (whitespace collapsed, lower-cased).
//! The first-seen trimmed spelling is kept for display, so "Kubernetes" reads as
//! "Kubernetes" in output while "kubernetes " still compares equal to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

/// Normalized form of a single skill name. Empty result means "absent".
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A set of skill names compared by normalized form. Iteration is sorted by that form.
#[derive(Debug, Clone, Default)]
pub struct SkillSet {
    members: BTreeMap<String, String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from raw names, dropping blanks.
    pub fn normalize<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    /// Inserts `name` unless it is blank. Returns whether the set grew.
    pub fn insert(&mut self, name: &str) -> bool {
        let key = normalize_name(name);
        if key.is_empty() || self.members.contains_key(&key) {
            return false;
        }
        let display = name.split_whitespace().collect::<Vec<_>>().join(" ");
        self.members.insert(key, display);
        true
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adds every member of `other` not already present.
    #[cfg(test)]
    pub fn extend(&mut self, other: &SkillSet) {
        for (key, display) in &other.members {
            self.members
                .entry(key.clone())
                .or_insert_with(|| display.clone());
        }
    }

    /// Members of `self` whose normalized form is absent from `other`.
    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        SkillSet {
            members: self
                .members
                .iter()
                .filter(|(key, _)| !other.members.contains_key(*key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Members of `self` also present in `other`.
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        SkillSet {
            members: self
                .members
                .iter()
                .filter(|(key, _)| other.members.contains_key(*key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn is_disjoint(&self, other: &SkillSet) -> bool {
        self.members.keys().all(|k| !other.members.contains_key(k))
    }

    /// Normalized keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Display names, sorted by normalized key.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.values().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.keys().eq(other.keys())
    }
}

impl Eq for SkillSet {}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::normalize(iter)
    }
}

impl Serialize for SkillSet {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::normalize(names))
    }
}

/// Union of a skill list drawn from every entry. Taken before any difference,
/// so a skill required by at least one entry counts exactly once.
pub fn union_all<'a, I, L>(lists: I) -> SkillSet
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = &'a String>,
{
    let mut set = SkillSet::new();
    for list in lists {
        for name in list {
            set.insert(name);
        }
    }
    set
}

/// `normalized(required) − normalized(known)`
pub fn gap(required: &SkillSet, known: &SkillSet) -> SkillSet {
    required.difference(known)
}

/// `normalized(preferred) − normalized(known)`
pub fn recommended(preferred: &SkillSet, known: &SkillSet) -> SkillSet {
    preferred.difference(known)
}
