//! Domain models and request/response payloads.

pub mod asset;
pub mod location;
pub mod location_log;
pub mod reader;
pub mod tag;

pub use asset::{Asset, AssetType};
pub use location::Location;
pub use location_log::{AssetLocationLog, LogAction, ObservationStatus, ObservationType};
pub use reader::{DiscoveryMode, KalmanSeed, Reader, ReaderConfig, DEFAULT_READER_CONFIG};
pub use tag::Tag;
