use std::cmp::Reverse;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::{debug, info, warn};

use commons_types::{
    HelpRequest, Item, NewHelpRequest, NewItem, NewRide, NewUser, Ride, Urgency, User,
};

use crate::table::EntityKind;
use crate::{Store, StoreError, StoreResult, with_table};

/// Placeholder shown on every ride until drivers can actually be rated.
pub const DEFAULT_DRIVER_RATING: &str = "4.8";

/// Owner fields copied onto a new ride, item or help request.
struct OwnerSnapshot {
    id: u64,
    name: String,
    image: String,
}

impl Store {
    // -- Users --

    pub fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        // Hash outside the lock; Argon2 is deliberately slow.
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| StoreError::PasswordHash(e.to_string()))?
            .to_string();

        let created_at = self.now();
        with_table(&self.users, |users| {
            if users.values().any(|u| u.username == new_user.username) {
                return Err(StoreError::UsernameTaken(new_user.username));
            }

            let user = User {
                id: users.allocate_id(),
                username: new_user.username,
                password: password_hash,
                full_name: new_user.full_name,
                profile_image: new_user.profile_image,
                verified: new_user.verified,
                created_at,
            };
            users.put(user.clone());
            Ok(user)
        })
    }

    pub fn get_user(&self, id: u64) -> StoreResult<Option<User>> {
        with_table(&self.users, |users| Ok(users.get(id).cloned()))
    }

    pub fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        with_table(&self.users, |users| {
            Ok(users.values().find(|u| u.username == username).cloned())
        })
    }

    /// Returns the user if `password` matches their stored hash.
    pub fn verify_password(&self, username: &str, password: &str) -> StoreResult<Option<User>> {
        let Some(user) = self.get_user_by_username(username)? else {
            return Ok(None);
        };

        let parsed_hash =
            PasswordHash::new(&user.password).map_err(|e| StoreError::PasswordHash(e.to_string()))?;
        let matches = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        Ok(matches.then_some(user))
    }

    fn owner_snapshot(&self, owner_id: u64) -> StoreResult<OwnerSnapshot> {
        let owner = self
            .get_user(owner_id)?
            .ok_or_else(|| StoreError::OwnerNotFound(owner_id))?;

        Ok(OwnerSnapshot {
            id: owner.id,
            name: owner.full_name,
            image: owner.profile_image.unwrap_or_default(),
        })
    }

    // -- Rides --

    pub fn create_ride(&self, draft: NewRide, owner_id: u64) -> StoreResult<Ride> {
        let owner = self.owner_snapshot(owner_id)?;
        let created_at = self.now();

        let ride = with_table(&self.rides, |rides| {
            let ride = Ride {
                id: rides.allocate_id(),
                driver_id: owner.id,
                from_location: draft.from_location,
                to_location: draft.to_location,
                date: draft.date,
                time: draft.time,
                total_seats: draft.total_seats,
                available_seats: draft.total_seats,
                cost_per_person: draft.cost_per_person,
                vehicle_info: draft.vehicle_info,
                driver_name: owner.name,
                driver_image: owner.image,
                driver_rating: DEFAULT_DRIVER_RATING.to_string(),
                created_at,
            };
            rides.put(ride.clone());
            Ok(ride)
        })?;

        info!(
            "Ride {} posted by user {}: {} -> {}, {} seats",
            ride.id, ride.driver_id, ride.from_location, ride.to_location, ride.total_seats
        );
        Ok(ride)
    }

    /// All rides, newest first.
    pub fn list_rides(&self) -> StoreResult<Vec<Ride>> {
        let mut rides = with_table(&self.rides, |rides| Ok(rides.list()))?;
        rides.sort_by_key(|r| Reverse(r.created_at));
        Ok(rides)
    }

    pub fn get_ride(&self, id: u64) -> StoreResult<Option<Ride>> {
        with_table(&self.rides, |rides| Ok(rides.get(id).cloned()))
    }

    /// Take one seat. The only path that changes `available_seats`.
    pub fn request_seat(&self, ride_id: u64) -> StoreResult<Ride> {
        with_table(&self.rides, |rides| {
            let mut ride = rides
                .get(ride_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(EntityKind::Ride, ride_id))?;

            let Some(remaining) = ride.available_seats.checked_sub(1) else {
                warn!("Seat requested on full ride {}", ride_id);
                return Err(StoreError::NoSeatsAvailable(ride_id));
            };

            ride.available_seats = remaining;
            rides.put(ride.clone());
            debug!("Ride {}: seat taken, {} left", ride_id, remaining);
            Ok(ride)
        })
    }

    // -- Items --

    pub fn create_item(&self, draft: NewItem, owner_id: u64) -> StoreResult<Item> {
        let owner = self.owner_snapshot(owner_id)?;
        let created_at = self.now();

        let item = with_table(&self.items, |items| {
            let item = Item {
                id: items.allocate_id(),
                sharer_id: owner.id,
                name: draft.name,
                category: draft.category,
                condition: draft.condition,
                description: draft.description,
                image_url: draft.image_url,
                sharer_name: owner.name,
                sharer_image: owner.image,
                available: true,
                created_at,
            };
            items.put(item.clone());
            Ok(item)
        })?;

        info!("Item {} shared by user {}: {}", item.id, item.sharer_id, item.name);
        Ok(item)
    }

    /// Unclaimed items, newest first. Claimed items stay reachable via
    /// [`Store::get_item`].
    pub fn list_items(&self) -> StoreResult<Vec<Item>> {
        let mut items = with_table(&self.items, |items| {
            Ok(items.values().filter(|i| i.available).cloned().collect::<Vec<_>>())
        })?;
        items.sort_by_key(|i| Reverse(i.created_at));
        Ok(items)
    }

    pub fn list_items_in_category(&self, category: &str) -> StoreResult<Vec<Item>> {
        let mut items = self.list_items()?;
        items.retain(|i| i.category == category);
        Ok(items)
    }

    pub fn get_item(&self, id: u64) -> StoreResult<Option<Item>> {
        with_table(&self.items, |items| Ok(items.get(id).cloned()))
    }

    /// Mark an item as claimed. There is no way back.
    pub fn claim_item(&self, item_id: u64) -> StoreResult<Item> {
        with_table(&self.items, |items| {
            let mut item = items
                .get(item_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(EntityKind::Item, item_id))?;

            if !item.available {
                warn!("Claim on already claimed item {}", item_id);
                return Err(StoreError::AlreadyClaimed(item_id));
            }

            item.available = false;
            items.put(item.clone());
            debug!("Item {} claimed", item_id);
            Ok(item)
        })
    }

    // -- Help requests --

    pub fn create_help_request(
        &self,
        draft: NewHelpRequest,
        owner_id: u64,
    ) -> StoreResult<HelpRequest> {
        let owner = self.owner_snapshot(owner_id)?;
        let created_at = self.now();

        let request = with_table(&self.help_requests, |requests| {
            let request = HelpRequest {
                id: requests.allocate_id(),
                requester_id: owner.id,
                title: draft.title,
                category: draft.category,
                description: draft.description,
                location: draft.location,
                urgency: draft.urgency,
                requester_name: owner.name,
                requester_image: owner.image,
                helpers_count: 0,
                resolved: false,
                created_at,
            };
            requests.put(request.clone());
            Ok(request)
        })?;

        info!(
            "Help request {} opened by user {} ({})",
            request.id, request.requester_id, request.urgency
        );
        Ok(request)
    }

    /// Open requests, most urgent first, newest first within a rank.
    pub fn list_help_requests(&self) -> StoreResult<Vec<HelpRequest>> {
        let mut requests = with_table(&self.help_requests, |requests| {
            Ok(requests.values().filter(|r| !r.resolved).cloned().collect::<Vec<_>>())
        })?;
        requests.sort_by_key(|r| (Urgency::classify(&r.urgency), Reverse(r.created_at)));
        Ok(requests)
    }

    pub fn list_help_requests_in_category(&self, category: &str) -> StoreResult<Vec<HelpRequest>> {
        let mut requests = self.list_help_requests()?;
        requests.retain(|r| r.category == category);
        Ok(requests)
    }

    pub fn get_help_request(&self, id: u64) -> StoreResult<Option<HelpRequest>> {
        with_table(&self.help_requests, |requests| Ok(requests.get(id).cloned()))
    }

    /// Count one more helper. Repeat offers all count; there is no cap.
    pub fn offer_help(&self, request_id: u64) -> StoreResult<HelpRequest> {
        with_table(&self.help_requests, |requests| {
            let mut request = requests
                .get(request_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(EntityKind::HelpRequest, request_id))?;

            request.helpers_count = request.helpers_count.saturating_add(1);
            requests.put(request.clone());
            debug!("Help request {}: {} helpers", request_id, request.helpers_count);
            Ok(request)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::{Clock, DEMO_USER_ID};

    /// Each call is one minute after the previous one.
    fn ticking_clock() -> Clock {
        let tick = Arc::new(AtomicI64::new(0));
        Arc::new(move || {
            let secs = 1_700_000_000 + tick.fetch_add(60, Ordering::Relaxed);
            DateTime::from_timestamp(secs, 0).unwrap()
        })
    }

    fn frozen_clock() -> Clock {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        Arc::new(move || at)
    }

    fn store_with(clock: Clock) -> Store {
        let store = Store::with_clock(clock);
        store.seed_demo_user("password123").unwrap();
        store
    }

    fn store() -> Store {
        store_with(ticking_clock())
    }

    fn ride(total_seats: u8) -> NewRide {
        NewRide {
            from_location: "North Campus".into(),
            to_location: "Downtown Station".into(),
            date: "Friday".into(),
            time: "17:30".into(),
            total_seats,
            cost_per_person: 5,
            vehicle_info: "Grey Corolla".into(),
        }
    }

    fn item(name: &str, category: &str) -> NewItem {
        NewItem {
            name: name.into(),
            category: category.into(),
            condition: "Good".into(),
            description: "Pick up at the library".into(),
            image_url: None,
        }
    }

    fn help(title: &str, urgency: &str) -> NewHelpRequest {
        NewHelpRequest {
            title: title.into(),
            category: "Academic".into(),
            description: "Anyone around?".into(),
            location: "Science Hall".into(),
            urgency: urgency.into(),
        }
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    #[test]
    fn passwords_are_hashed() {
        let store = store();
        let user = store.get_user(DEMO_USER_ID).unwrap().unwrap();
        assert_ne!(user.password, "password123");
        assert!(user.password.starts_with("$argon2"));

        let verified = store.verify_password(&user.username, "password123").unwrap();
        assert_eq!(verified.map(|u| u.id), Some(DEMO_USER_ID));
        assert!(store.verify_password(&user.username, "nope").unwrap().is_none());
        assert!(store.verify_password("ghost", "password123").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let store = store();
        let err = store
            .create_user(NewUser {
                username: "saurabh.bhandari".into(),
                password: "hunter22".into(),
                full_name: "Someone Else".into(),
                profile_image: None,
                verified: false,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(name) if name == "saurabh.bhandari"));
    }

    #[test]
    fn lookup_by_username() {
        let store = store();
        let found = store.get_user_by_username("saurabh.bhandari").unwrap();
        assert_eq!(found.map(|u| u.id), Some(DEMO_USER_ID));
        assert!(store.get_user_by_username("nobody").unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Rides
    // -----------------------------------------------------------------------

    #[test]
    fn create_ride_fills_derived_fields() {
        let store = store();
        let ride = store.create_ride(ride(3), DEMO_USER_ID).unwrap();

        assert_eq!(ride.id, 1);
        assert_eq!(ride.driver_id, DEMO_USER_ID);
        assert_eq!(ride.available_seats, 3);
        assert_eq!(ride.total_seats, 3);
        assert_eq!(ride.driver_name, "Saurabh Bhandari");
        assert!(ride.driver_image.starts_with("https://"));
        assert_eq!(ride.driver_rating, DEFAULT_DRIVER_RATING);
        assert_eq!(store.get_ride(ride.id).unwrap(), Some(ride));
    }

    #[test]
    fn create_ride_with_unknown_owner_persists_nothing() {
        let store = store();
        let err = store.create_ride(ride(2), 99).unwrap_err();
        assert!(matches!(err, StoreError::OwnerNotFound(99)));
        assert!(store.list_rides().unwrap().is_empty());

        // The failed attempt did not burn an id.
        assert_eq!(store.create_ride(ride(2), DEMO_USER_ID).unwrap().id, 1);
    }

    #[test]
    fn owner_without_image_gets_empty_snapshot() {
        let store = store();
        let owner = store
            .create_user(NewUser {
                username: "ana".into(),
                password: "hunter22".into(),
                full_name: "Ana Lopez".into(),
                profile_image: None,
                verified: false,
            })
            .unwrap();

        let ride = store.create_ride(ride(1), owner.id).unwrap();
        assert_eq!(ride.driver_name, "Ana Lopez");
        assert_eq!(ride.driver_image, "");
    }

    #[test]
    fn rides_list_newest_first() {
        let store = store();
        let first = store.create_ride(ride(2), DEMO_USER_ID).unwrap();
        let second = store.create_ride(ride(4), DEMO_USER_ID).unwrap();
        assert!(first.created_at < second.created_at);

        let ids: Vec<u64> = store.list_rides().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn rides_with_equal_timestamps_keep_insertion_order() {
        let store = store_with(frozen_clock());
        for _ in 0..3 {
            store.create_ride(ride(1), DEMO_USER_ID).unwrap();
        }

        let ids: Vec<u64> = store.list_rides().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn request_seat_decrements_until_full() {
        let store = store();
        let ride = store.create_ride(ride(2), DEMO_USER_ID).unwrap();

        assert_eq!(store.request_seat(ride.id).unwrap().available_seats, 1);
        assert_eq!(store.request_seat(ride.id).unwrap().available_seats, 0);

        let err = store.request_seat(ride.id).unwrap_err();
        assert!(matches!(err, StoreError::NoSeatsAvailable(id) if id == ride.id));

        let stored = store.get_ride(ride.id).unwrap().unwrap();
        assert_eq!(stored.available_seats, 0);
        assert_eq!(stored.total_seats, 2);
    }

    #[test]
    fn request_seat_on_missing_ride() {
        let store = store();
        let err = store.request_seat(7).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { kind: EntityKind::Ride, id: 7 }
        ));
    }

    #[test]
    fn concurrent_seat_requests_never_oversell() {
        let store = Arc::new(store());
        let ride_id = store.create_ride(ride(5), DEMO_USER_ID).unwrap().id;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.request_seat(ride_id).is_ok())
            })
            .collect();
        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(granted, 5);
        assert_eq!(store.get_ride(ride_id).unwrap().unwrap().available_seats, 0);
    }

    #[test]
    fn owner_snapshot_is_not_live() {
        let store = store();
        let ride = store.create_ride(ride(3), DEMO_USER_ID).unwrap();

        // Rewrite the driver's profile behind the store's back.
        with_table(&store.users, |users| {
            let mut user = users.get(DEMO_USER_ID).cloned().unwrap();
            user.full_name = "Renamed".into();
            users.put(user);
            Ok(())
        })
        .unwrap();

        let stored = store.get_ride(ride.id).unwrap().unwrap();
        assert_eq!(stored.driver_name, "Saurabh Bhandari");
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    #[test]
    fn create_item_starts_available() {
        let store = store();
        let created = store.create_item(item("Desk lamp", "Furniture"), DEMO_USER_ID).unwrap();

        assert!(created.available);
        assert_eq!(created.sharer_id, DEMO_USER_ID);
        assert_eq!(created.sharer_name, "Saurabh Bhandari");
        assert_eq!(store.list_items().unwrap(), vec![created]);
    }

    #[test]
    fn create_item_with_unknown_owner() {
        let store = store();
        let err = store.create_item(item("Kettle", "Other"), 5).unwrap_err();
        assert!(matches!(err, StoreError::OwnerNotFound(5)));
        assert!(store.get_item(1).unwrap().is_none());
    }

    #[test]
    fn claimed_items_leave_the_listing() {
        let store = store();
        let lamp = store.create_item(item("Desk lamp", "Furniture"), DEMO_USER_ID).unwrap();
        let book = store.create_item(item("Calculus", "Books"), DEMO_USER_ID).unwrap();

        let claimed = store.claim_item(lamp.id).unwrap();
        assert!(!claimed.available);

        let listed: Vec<u64> = store.list_items().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(listed, vec![book.id]);

        // Still reachable by id, in its claimed state.
        assert_eq!(store.get_item(lamp.id).unwrap(), Some(claimed));
    }

    #[test]
    fn second_claim_fails_and_changes_nothing() {
        let store = store();
        let lamp = store.create_item(item("Desk lamp", "Furniture"), DEMO_USER_ID).unwrap();
        let claimed = store.claim_item(lamp.id).unwrap();

        let err = store.claim_item(lamp.id).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyClaimed(id) if id == lamp.id));
        assert_eq!(store.get_item(lamp.id).unwrap(), Some(claimed));
        assert!(store.list_items().unwrap().is_empty());
    }

    #[test]
    fn claim_missing_item() {
        let store = store();
        assert!(matches!(
            store.claim_item(3).unwrap_err(),
            StoreError::NotFound { kind: EntityKind::Item, id: 3 }
        ));
    }

    #[test]
    fn items_filter_by_category_newest_first() {
        let store = store();
        let old_chair = store.create_item(item("Chair", "Furniture"), DEMO_USER_ID).unwrap();
        store.create_item(item("Novel", "Books"), DEMO_USER_ID).unwrap();
        let new_desk = store.create_item(item("Desk", "Furniture"), DEMO_USER_ID).unwrap();

        let ids: Vec<u64> = store
            .list_items_in_category("Furniture")
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![new_desk.id, old_chair.id]);
        assert!(store.list_items_in_category("Sports").unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Help requests
    // -----------------------------------------------------------------------

    #[test]
    fn create_help_request_starts_open() {
        let store = store();
        let request = store
            .create_help_request(help("Jump start", "Urgent (today)"), DEMO_USER_ID)
            .unwrap();

        assert_eq!(request.helpers_count, 0);
        assert!(!request.resolved);
        assert_eq!(request.requester_id, DEMO_USER_ID);
        assert_eq!(request.requester_name, "Saurabh Bhandari");
    }

    #[test]
    fn create_help_request_with_unknown_owner() {
        let store = store();
        let err = store
            .create_help_request(help("Ride to clinic", "Soon (this week)"), 2)
            .unwrap_err();
        assert!(matches!(err, StoreError::OwnerNotFound(2)));
        assert!(store.list_help_requests().unwrap().is_empty());
    }

    #[test]
    fn help_requests_sort_by_urgency_then_recency() {
        let store = store();
        for (title, urgency) in [
            ("a", "Not urgent"),
            ("b", "Very Urgent (within 1 hour)"),
            ("c", "Soon (this week)"),
        ] {
            store.create_help_request(help(title, urgency), DEMO_USER_ID).unwrap();
        }

        let urgencies: Vec<String> = store
            .list_help_requests()
            .unwrap()
            .into_iter()
            .map(|r| r.urgency)
            .collect();
        assert_eq!(
            urgencies,
            vec!["Very Urgent (within 1 hour)", "Soon (this week)", "Not urgent"]
        );
    }

    #[test]
    fn equal_urgency_lists_newest_first_and_unknown_last() {
        let store = store();
        let older = store.create_help_request(help("older", "Urgent (today)"), DEMO_USER_ID).unwrap();
        let odd = store.create_help_request(help("odd", "whenever"), DEMO_USER_ID).unwrap();
        let newer = store.create_help_request(help("newer", "Urgent"), DEMO_USER_ID).unwrap();
        let calm = store.create_help_request(help("calm", "Not urgent"), DEMO_USER_ID).unwrap();

        let ids: Vec<u64> = store.list_help_requests().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newer.id, older.id, calm.id, odd.id]);
    }

    #[test]
    fn resolved_requests_are_hidden() {
        let store = store();
        let open = store.create_help_request(help("open", "Soon"), DEMO_USER_ID).unwrap();
        let done = store.create_help_request(help("done", "Soon"), DEMO_USER_ID).unwrap();

        // Nothing in the public API resolves a request; flip it directly.
        with_table(&store.help_requests, |requests| {
            let mut request = requests.get(done.id).cloned().unwrap();
            request.resolved = true;
            requests.put(request);
            Ok(())
        })
        .unwrap();

        let ids: Vec<u64> = store.list_help_requests().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![open.id]);
        assert!(store.get_help_request(done.id).unwrap().unwrap().resolved);
    }

    #[test]
    fn offer_help_counts_every_offer() {
        let store = store();
        let request = store.create_help_request(help("Move couch", "Soon"), DEMO_USER_ID).unwrap();

        for n in 1..=12 {
            assert_eq!(store.offer_help(request.id).unwrap().helpers_count, n);
        }
        assert_eq!(store.get_help_request(request.id).unwrap().unwrap().helpers_count, 12);
    }

    #[test]
    fn offer_help_on_missing_request() {
        let store = store();
        assert!(matches!(
            store.offer_help(1).unwrap_err(),
            StoreError::NotFound { kind: EntityKind::HelpRequest, id: 1 }
        ));
    }

    #[test]
    fn help_requests_filter_by_category() {
        let store = store();
        let mut tech = help("Laptop won't boot", "Urgent (today)");
        tech.category = "Technical".into();
        let tech = store.create_help_request(tech, DEMO_USER_ID).unwrap();
        store.create_help_request(help("Study group", "Soon"), DEMO_USER_ID).unwrap();

        let found = store.list_help_requests_in_category("Technical").unwrap();
        assert_eq!(found, vec![tech]);
    }

    #[test]
    fn id_sequences_are_per_type() {
        let store = store();
        let ride = store.create_ride(ride(1), DEMO_USER_ID).unwrap();
        let item = store.create_item(item("Mug", "Other"), DEMO_USER_ID).unwrap();
        let request = store.create_help_request(help("x", "Soon"), DEMO_USER_ID).unwrap();
        assert_eq!((ride.id, item.id, request.id), (1, 1, 1));
    }

    #[test]
    fn created_at_comes_from_the_clock() {
        let at: DateTime<Utc> = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let store = store_with(frozen_clock());
        let ride = store.create_ride(ride(2), DEMO_USER_ID).unwrap();
        assert_eq!(ride.created_at, at);
    }
}
