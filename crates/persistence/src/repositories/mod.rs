//! Repository implementations.

pub mod asset;
pub mod location;
pub mod location_log;
pub mod reader;
pub mod tag;

pub use asset::AssetRepository;
pub use location::LocationRepository;
pub use location_log::{LocationLogRepository, NewLocationLog};
pub use reader::ReaderRepository;
pub use tag::TagRepository;
