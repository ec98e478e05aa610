pub mod api;
pub mod job;
pub mod lenient;
pub mod result;
