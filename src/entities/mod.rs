pub mod prelude;

pub mod events;
pub mod locations;
pub mod movies;
pub mod reviews;
pub mod trails;
pub mod weathers;
