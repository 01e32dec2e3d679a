pub mod errors;
pub mod models;
pub mod utils;

pub use errors::MorphsegError;
pub use models::{Analysis, Label, Language, PerLabel, SegmentationModel};
