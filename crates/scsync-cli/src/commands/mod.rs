pub mod config;
pub mod digest;
pub mod job;
pub mod sync;
