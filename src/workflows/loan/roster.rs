//! Ordered collections of repeatable sub-records (family members, witnesses,
//! documents). A roster is never empty, and entry ids come from a monotonic
//! per-roster counter so removing a middle entry can never lead to a
//! duplicate id later in the session.

use serde::{Deserialize, Serialize};

/// Identifier unique within one roster for the life of a wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry<T> {
    pub id: EntryId,
    pub fields: T,
}

/// Error raised when a mutation would break the roster invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("at least one entry is required; removal refused")]
    WouldEmpty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster<T> {
    entries: Vec<RosterEntry<T>>,
    next_id: u32,
}

impl<T: Default> Roster<T> {
    /// A roster starts with one blank entry; the form always shows a row.
    pub fn new() -> Self {
        let mut roster = Self {
            entries: Vec::new(),
            next_id: 1,
        };
        roster.add();
        roster
    }

    /// Append a blank entry and return its freshly minted id.
    pub fn add(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(RosterEntry {
            id,
            fields: T::default(),
        });
        id
    }
}

impl<T> Roster<T> {
    /// Remove the entry with `id`, preserving relative order. Refused when it
    /// would leave the roster empty; an unknown id leaves the roster as-is.
    pub fn remove(&mut self, id: EntryId) -> Result<(), RosterError> {
        let Some(position) = self.entries.iter().position(|entry| entry.id == id) else {
            return Ok(());
        };

        if self.entries.len() == 1 {
            return Err(RosterError::WouldEmpty);
        }

        self.entries.remove(position);
        Ok(())
    }

    /// Apply `mutate` to the matching entry's fields. Unknown ids are a
    /// silent no-op: the widgets only ever hold ids we handed out, but the
    /// contract degrades gracefully rather than panicking.
    pub fn update(&mut self, id: EntryId, mutate: impl FnOnce(&mut T)) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            mutate(&mut entry.fields);
        }
    }

    pub fn entries(&self) -> &[RosterEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.fields)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    pub fn fields(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.fields)
    }
}

impl<T: Default> Default for Roster<T> {
    fn default() -> Self {
        Self::new()
    }
}
