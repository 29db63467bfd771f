use thiserror::Error;

use crate::table::EntityKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u64 },

    /// The owner id handed to a create call names no user. Only reachable
    /// through miswiring, never through client input.
    #[error("owner {0} does not resolve to a user")]
    OwnerNotFound(u64),

    #[error("ride {0} has no seats available")]
    NoSeatsAvailable(u64),

    #[error("item {0} has already been claimed")]
    AlreadyClaimed(u64),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("{0} table lock poisoned")]
    LockPoisoned(EntityKind),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: u64) -> Self {
        Self::NotFound { kind, id }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
