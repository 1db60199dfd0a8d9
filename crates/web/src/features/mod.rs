pub mod announcements;
pub mod dashboard;
pub mod events;
pub mod house_leaders;
pub mod houses;
pub mod notifications;
pub mod participants;
pub mod results;
pub mod tournaments;
