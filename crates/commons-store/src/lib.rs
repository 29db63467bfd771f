pub mod error;
pub mod queries;
pub mod seed;
pub mod table;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use commons_types::{HelpRequest, Item, Ride, User};

pub use error::{StoreError, StoreResult};
pub use seed::DEMO_USER_ID;
pub use table::{Entity, EntityKind, Table};

/// Source of `created_at` stamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Volatile, process-scoped store for all four entity types.
///
/// Each table has its own lock, so a read-modify-write on one ride never
/// interleaves with another on the same table. No operation holds two locks
/// at once.
pub struct Store {
    users: Mutex<Table<User>>,
    rides: Mutex<Table<Ride>>,
    items: Mutex<Table<Item>>,
    help_requests: Mutex<Table<HelpRequest>>,
    clock: Clock,
}

impl Store {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            users: Mutex::new(Table::new()),
            rides: Mutex::new(Table::new()),
            items: Mutex::new(Table::new()),
            help_requests: Mutex::new(Table::new()),
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

/// Run `f` with exclusive access to one table.
fn with_table<E, F, T>(table: &Mutex<Table<E>>, f: F) -> StoreResult<T>
where
    E: Entity,
    F: FnOnce(&mut Table<E>) -> StoreResult<T>,
{
    let mut guard = table
        .lock()
        .map_err(|_| StoreError::LockPoisoned(E::KIND))?;
    f(&mut guard)
}
