use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered student. `password` holds an Argon2 PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub profile_image: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// The user shape that leaves the service: everything but the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: u64,
    pub username: String,
    pub full_name: String,
    pub profile_image: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            profile_image: user.profile_image,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

/// A carpool offer. `driver_name`, `driver_image` and `driver_rating` are
/// copied from the driver when the ride is posted and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub id: u64,
    pub driver_id: u64,
    pub from_location: String,
    pub to_location: String,
    pub date: String,
    pub time: String,
    pub total_seats: u8,
    /// Always within `0..=total_seats`.
    pub available_seats: u8,
    pub cost_per_person: u32,
    pub vehicle_info: String,
    pub driver_name: String,
    pub driver_image: String,
    pub driver_rating: String,
    pub created_at: DateTime<Utc>,
}

/// A shareable item. Once `available` is false the item has been claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    pub sharer_id: u64,
    pub name: String,
    pub category: String,
    pub condition: String,
    pub description: String,
    pub image_url: Option<String>,
    pub sharer_name: String,
    pub sharer_image: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    pub id: u64,
    pub requester_id: u64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    /// Free-text label; see [`crate::Urgency::classify`] for how it sorts.
    pub urgency: String,
    pub requester_name: String,
    pub requester_image: String,
    pub helpers_count: u32,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

// -- Drafts --
//
// Validated input for creation. Server-assigned fields (id, owner snapshot,
// timestamps, counters) are absent and filled in by the store.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    /// Plaintext; hashed by the store before it is kept.
    pub password: String,
    pub full_name: String,
    pub profile_image: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRide {
    pub from_location: String,
    pub to_location: String,
    pub date: String,
    pub time: String,
    pub total_seats: u8,
    pub cost_per_person: u32,
    pub vehicle_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub condition: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHelpRequest {
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub urgency: String,
}
