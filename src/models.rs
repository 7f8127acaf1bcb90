//! Domain model mirroring the `Persona` table. `Person` stays a plain data
//! holder so the controller and the UI can pass it around freely.

use std::fmt;
use std::hash::{Hash, Hasher};

/// One row of the `Persona` table.
///
/// Equality and hashing only look at the name, surname and age. Two records
/// with the same fields but different ids compare equal, so code that needs
/// to find a specific row must go through `id` or a list position instead.
#[derive(Debug, Clone)]
pub struct Person {
    /// Primary key. `None` until the store has inserted the record.
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
}

impl Person {
    /// Build a record that has not been persisted yet.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, age: i64) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
        }
    }

    /// Same fields, with the identifier assigned by the store.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Case-insensitive substring match on the first name. `needle` must
    /// already be lowercase; an empty needle matches everything.
    pub fn matches_filter(&self, needle: &str) -> bool {
        needle.is_empty() || self.first_name.to_lowercase().contains(needle)
    }

    /// `First Last`, used in confirmations and log lines.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.age == other.age
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first_name.hash(state);
        self.last_name.hash(state);
        self.age.hash(state);
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.age)
    }
}
