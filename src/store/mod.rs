pub mod events;
pub mod rsvps;
pub mod users;
