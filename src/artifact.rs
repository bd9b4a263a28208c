//! Model persistence
//!
//! Fitted models are serialized whole with `bincode`, so a loaded model
//! predicts exactly like the one that was saved. Saving under an existing
//! name overwrites the previous artifact.

use crate::error::Result;
use crate::models::ClassifierModel;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores serialized models under one directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Serialize `model` under `name`, creating the directory if needed
    pub fn save(&self, name: &str, model: &ClassifierModel) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        let bytes = bincode::serialize(model)?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Deserialize a previously saved model
    pub fn load(&self, name: &str) -> Result<ClassifierModel> {
        let bytes = fs::read(self.path_for(name))?;
        Ok(bincode::deserialize(&bytes)?)
    }
}
