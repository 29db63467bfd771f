use tracing::info;

use commons_types::{NewUser, User};

use crate::{Store, StoreResult};

/// Id of the demo principal every create call is attributed to. The seed user
/// is the first row in a fresh store, so it always lands here.
pub const DEMO_USER_ID: u64 = 1;

pub const DEMO_USERNAME: &str = "saurabh.bhandari";
pub const DEMO_FULL_NAME: &str = "Saurabh Bhandari";
pub const DEMO_PROFILE_IMAGE: &str = "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?ixlib=rb-4.0.3&auto=format&fit=crop&w=100&h=100";

impl Store {
    /// A fresh store holding only the demo user.
    pub fn seeded(demo_password: &str) -> StoreResult<Self> {
        let store = Self::new();
        store.seed_demo_user(demo_password)?;
        Ok(store)
    }

    pub fn seed_demo_user(&self, demo_password: &str) -> StoreResult<User> {
        let user = self.create_user(NewUser {
            username: DEMO_USERNAME.to_string(),
            password: demo_password.to_string(),
            full_name: DEMO_FULL_NAME.to_string(),
            profile_image: Some(DEMO_PROFILE_IMAGE.to_string()),
            verified: true,
        })?;

        info!(user_id = user.id, username = %user.username, "Seeded demo user");
        Ok(user)
    }
}
