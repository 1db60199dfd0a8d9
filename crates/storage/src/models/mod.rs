pub mod announcement;
pub mod event;
pub mod event_result;
pub mod event_update;
pub mod house;
pub mod house_leader;
pub mod participant;
pub mod tournament;

pub use announcement::Announcement;
pub use event::{Event, EventKind, EventStatus};
pub use event_result::EventResult;
pub use event_update::EventUpdate;
pub use house::House;
pub use house_leader::HouseLeader;
pub use participant::Participant;
pub use tournament::Tournament;
