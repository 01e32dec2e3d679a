use std::{
    fs,
    path::Path,
};

use crate::core::{models::SegmentationModel, MorphsegError};

/// Save a model as pretty-printed JSON, readable for inspection and diffing.
pub fn save_model_json(model: &SegmentationModel, path: &Path) -> Result<(), MorphsegError> {
    let json = serde_json::to_string_pretty(model)?;
    fs::write(path, json)?;
    println!("Model saved to: {}", path.display());
    Ok(())
}

pub fn load_model_json(path: &Path) -> Result<SegmentationModel, MorphsegError> {
    let json = fs::read_to_string(path)?;
    let model: SegmentationModel = serde_json::from_str(&json)?;
    Ok(model)
}

/// Save a model in the compact binary format used for fast startup.
pub fn save_model(model: &SegmentationModel, path: &Path) -> Result<(), MorphsegError> {
    let encoded = bincode::serde::encode_to_vec(model, bincode::config::standard())?;
    fs::write(path, encoded)?;
    println!("Model saved to: {}", path.display());
    Ok(())
}

pub fn load_model(path: &Path) -> Result<SegmentationModel, MorphsegError> {
    let buffer = fs::read(path)?;
    let (model, _): (SegmentationModel, usize) =
        bincode::serde::decode_from_slice(&buffer, bincode::config::standard())?;
    Ok(model)
}
