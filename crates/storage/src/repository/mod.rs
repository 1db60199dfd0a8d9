pub mod announcement;
pub mod dashboard;
pub mod event;
pub mod house;
pub mod house_leader;
pub mod participant;
pub mod result;
pub mod tournament;
