//! Sea-ORM entities for event-store

pub mod divisions;
pub mod events;
pub mod feeds;

pub use divisions::Entity as Divisions;
pub use events::Entity as Events;
pub use feeds::Entity as Feeds;
