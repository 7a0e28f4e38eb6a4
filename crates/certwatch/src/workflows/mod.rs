pub mod compliance;
pub mod notifications;
pub mod roster;
