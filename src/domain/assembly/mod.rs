pub mod assembler;
pub mod error;
pub mod pause;
pub mod timing;

pub use assembler::{AssembledTrack, AudioAssembler};
pub use error::AssemblyError;
pub use pause::{PauseModel, PauseSettings};
pub use timing::{rescale, SegmentTiming};
