use std::collections::{BTreeMap, HashMap};

use burn::data::dataset::InMemDataset;

use super::{DatasetDict, DatasetLoader, Record};
use crate::error::FlowError;

/// Serves datasets registered up front, without touching the network.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    datasets: HashMap<String, BTreeMap<String, Vec<Record>>>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split(mut self, id: &str, split: &str, records: Vec<Record>) -> Self {
        self.datasets
            .entry(id.to_owned())
            .or_default()
            .insert(split.to_owned(), records);
        self
    }
}

impl DatasetLoader for InMemoryLoader {
    fn load(&self, id: &str) -> Result<DatasetDict, FlowError> {
        let splits = self
            .datasets
            .get(id)
            .ok_or_else(|| FlowError::DatasetUnavailable {
                id: id.to_owned(),
                reason: "no such dataset registered".to_owned(),
            })?;

        log::debug!("serving `{id}` from memory");
        Ok(splits
            .iter()
            .fold(DatasetDict::new(id), |dict, (name, records)| {
                dict.with_split(name, Box::new(InMemDataset::new(records.clone())))
            }))
    }
}
