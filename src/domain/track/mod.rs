pub mod error;
pub mod model;
pub mod service;

pub use error::{MasteringError, StorageError, TrackError};
pub use model::{Track, TrackRecord, TrackSummary};
pub use service::{MasteringSettings, TrackService, TrackServiceApi};
