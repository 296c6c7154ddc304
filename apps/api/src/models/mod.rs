pub mod client;
pub mod interview;
pub mod job;
pub mod resume;
pub mod submission;
pub mod user;
