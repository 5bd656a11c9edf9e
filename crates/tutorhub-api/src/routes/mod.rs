//! HTTP route handlers, grouped by audience.

pub mod offerings;
pub mod reports;
pub mod rooms;
pub mod students;
pub mod tutors;
