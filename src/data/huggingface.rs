use burn::data::dataset::{HuggingfaceDatasetLoader, SqliteDataset};

use super::{DatasetDict, DatasetLoader, Record};
use crate::{config::FlowConfig, error::FlowError};

/// Loads datasets from the HuggingFace hub through burn's importer.
///
/// The importer downloads the dataset once and stores every split as a
/// table of a sqlite database under `base_dir`; later loads reuse it.
/// Image columns come back flattened into `<column>_bytes` and
/// `<column>_path`.
#[derive(Debug, Clone)]
pub struct HuggingfaceLoader {
    splits: Vec<String>,
    base_dir: Option<String>,
    token: Option<String>,
    subset: Option<String>,
}

impl HuggingfaceLoader {
    pub fn from_config(config: &FlowConfig) -> Self {
        Self {
            splits: config.split_names(),
            base_dir: config.base_dir.clone(),
            token: config.token.clone(),
            subset: config.subset.clone(),
        }
    }

    fn importer(&self, id: &str) -> HuggingfaceDatasetLoader {
        let mut importer = HuggingfaceDatasetLoader::new(id);
        if let Some(base_dir) = &self.base_dir {
            importer = importer.with_base_dir(base_dir);
        }
        if let Some(token) = &self.token {
            importer = importer.with_huggingface_token(token);
        }
        if let Some(subset) = &self.subset {
            importer = importer.with_subset(subset);
        }
        importer
    }

    fn split(&self, id: &str, split: &str) -> Result<SqliteDataset<Record>, FlowError> {
        log::info!("loading split `{split}` of `{id}`");
        self.importer(id)
            .dataset(split)
            .map_err(|err| FlowError::DatasetUnavailable {
                id: id.to_owned(),
                reason: format!("split `{split}`: {err}"),
            })
    }
}

impl DatasetLoader for HuggingfaceLoader {
    fn load(&self, id: &str) -> Result<DatasetDict, FlowError> {
        self.splits.iter().try_fold(DatasetDict::new(id), |dict, split| {
            let dataset = self.split(id, split)?;
            Ok(dict.with_split(split, Box::new(dataset)))
        })
    }
}
