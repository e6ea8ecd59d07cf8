pub mod event;
pub mod location;
pub mod movie;
pub mod review;
pub mod trail;
pub mod weather;
