use std::collections::BTreeMap;
use std::fmt;

use commons_types::{HelpRequest, Item, Ride, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Ride,
    Item,
    HelpRequest,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Ride => "ride",
            Self::Item => "item",
            Self::HelpRequest => "help request",
        };
        f.write_str(name)
    }
}

/// A record that can live in a [`Table`].
pub trait Entity: Clone {
    const KIND: EntityKind;

    fn id(&self) -> u64;
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for Ride {
    const KIND: EntityKind = EntityKind::Ride;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for Item {
    const KIND: EntityKind = EntityKind::Item;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for HelpRequest {
    const KIND: EntityKind = EntityKind::HelpRequest;

    fn id(&self) -> u64 {
        self.id
    }
}

/// Keyed collection for one entity type with its own id sequence.
///
/// Ids start at 1 and are never handed out twice, even if the caller drops
/// an allocated id without storing anything under it. Rows are kept in id
/// order, which is also insertion order for allocated ids.
#[derive(Debug)]
pub struct Table<T> {
    next_id: u64,
    rows: BTreeMap<u64, T>,
}

impl<T: Entity> Table<T> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Insert or overwrite by id. Returns the value it replaced, if any.
    pub fn put(&mut self, entity: T) -> Option<T> {
        self.rows.insert(entity.id(), entity)
    }

    pub fn list(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
