pub mod cache;
pub use cache::{CacheError, CacheOrchestrator, CategoryStore};

pub mod location;
pub use location::{LocationError, LocationService, LocationStore};

pub mod registry;
pub use registry::{CategoryRegistry, Providers};
