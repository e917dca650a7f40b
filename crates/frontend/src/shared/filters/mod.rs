pub mod api;
pub mod location;
pub mod sync;
pub mod time_period;
