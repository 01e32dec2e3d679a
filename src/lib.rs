pub mod analysis;
pub mod core;
pub mod grammar;
pub mod persistence;
pub mod preprocessing;
pub mod segmentation;

pub use crate::core::{
    errors::MorphsegError,
    models::{Analysis, Label, Language, PerLabel, SegmentationModel},
};
pub use crate::segmentation::{
    model::{build_model, build_model_from_path, LabelScheme},
    segmenter::{SegmentOptions, Segmenter},
};
