pub mod cursor;
pub mod engine;
pub mod error;
pub mod session;
pub mod state;

pub use cursor::{resolve, CursorTracker};
pub use engine::PlaybackEngine;
pub use error::PlaybackError;
pub use session::PlaybackSession;
pub use state::{PlaybackState, PlaybackStatus};
