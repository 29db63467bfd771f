pub mod api;
pub mod models;
pub mod urgency;

pub use models::{
    HelpRequest, Item, NewHelpRequest, NewItem, NewRide, NewUser, PublicUser, Ride, User,
};
pub use urgency::Urgency;
