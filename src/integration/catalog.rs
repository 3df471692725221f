//! Lookup of model descriptors by identifier.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::detection::{FrameDimensions, ModelDescriptor, TensorLayout};
use crate::error::{PipelineError, Result};

/// Supplies the descriptor for a model identifier. Loaded once before the
/// frame loop starts.
pub trait ModelCatalog {
    fn descriptor(&self, model_id: &str) -> Result<Arc<ModelDescriptor>>;
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    models: HashMap<String, Arc<ModelDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    models: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    input: FrameDimensions,
    labels: Vec<String>,
    #[serde(default)]
    layout: TensorLayout,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the stock `yolov8n` COCO model.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.insert("yolov8n", ModelDescriptor::yolov8_coco());
        catalog
    }

    /// Load entries from JSON:
    ///
    /// ```json
    /// {"models": [
    ///     {"id": "yolov8n", "input": {"width": 640, "height": 640}, "labels": ["person"], "layout": "nhwc"}
    /// ]}
    /// ```
    ///
    /// `layout` is optional and defaults to `nhwc`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for entry in file.models {
            if catalog.models.contains_key(&entry.id) {
                return Err(PipelineError::InvalidDescriptor(format!(
                    "duplicate model id '{}'",
                    entry.id
                )));
            }
            let descriptor =
                ModelDescriptor::new(entry.input, entry.labels)?.with_layout(entry.layout);
            catalog.insert(entry.id, descriptor);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, model_id: impl Into<String>, descriptor: ModelDescriptor) {
        self.models.insert(model_id.into(), Arc::new(descriptor));
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelCatalog for StaticCatalog {
    fn descriptor(&self, model_id: &str) -> Result<Arc<ModelDescriptor>> {
        self.models
            .get(model_id)
            .cloned()
            .ok_or_else(|| PipelineError::UnknownModel(model_id.to_string()))
    }
}
