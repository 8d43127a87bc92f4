pub mod dto;
pub mod error;
pub mod model;

pub use dto::{GeneratedLine, GeneratedScript};
pub use error::ScriptError;
pub use model::{DialogueLine, NormalizedLine, Script, Speaker};
