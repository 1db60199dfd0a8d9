pub mod dashboard;
pub mod scoring;
pub mod settlement;
