//! Bijective name ↔ id index for one generation's assignments.
//!
//! Each run keeps two of these: the *previous* registry loaded from the sidecar store and the
//! *pending* registry built while the generator runs. Entries live in a vector (insertion order,
//! or id order after [`Registry::sort_by_id`]) with one hash index per key.

use std::collections::HashMap;

/// A committed `{name, id}` pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    pub name: String,
    pub id: u32,
}

impl Assignment {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self { name: name.into(), id }
    }
}

/// Why an insertion was rejected. The registry is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// The id is already bound to another name.
    Id { existing: String },
    /// The name is already bound to another id.
    Name { existing: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Assignment>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<u32, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `id`.
    ///
    /// ## Returns
    /// - `Ok(true)` when the pair was added.
    /// - `Ok(false)` when exactly this pair was already present.
    /// - `Err(conflict)` when either key is bound to something else.
    pub fn insert(&mut self, name: &str, id: u32) -> Result<bool, Conflict> {
        if let Some(&i) = self.by_id.get(&id) {
            let existing = &self.entries[i];
            if existing.name == name {
                return Ok(false);
            }
            return Err(Conflict::Id {
                existing: existing.name.clone(),
            });
        }
        if let Some(&i) = self.by_name.get(name) {
            return Err(Conflict::Name {
                existing: self.entries[i].id,
            });
        }
        let i = self.entries.len();
        self.entries.push(Assignment::new(name, id));
        self.by_name.insert(name.to_string(), i);
        self.by_id.insert(id, i);
        Ok(true)
    }

    /// Erase `name` and its id. Returns the removed assignment.
    pub fn remove(&mut self, name: &str) -> Option<Assignment> {
        let i = self.by_name.remove(name)?;
        self.by_id.remove(&self.entries[i].id);
        let removed = self.entries.swap_remove(i);
        if let Some(moved) = self.entries.get(i) {
            self.by_name.insert(moved.name.clone(), i);
            self.by_id.insert(moved.id, i);
        }
        Some(removed)
    }

    pub fn by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).map(|&i| self.entries[i].id)
    }

    pub fn by_id(&self, id: u32) -> Option<&str> {
        self.by_id.get(&id).map(|&i| self.entries[i].name.as_str())
    }

    /// Reorder entries ascending by id.
    pub fn sort_by_id(&mut self) {
        self.entries.sort_by_key(|a| a.id);
        for (i, a) in self.entries.iter().enumerate() {
            self.by_name.insert(a.name.clone(), i);
            self.by_id.insert(a.id, i);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Assignment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
