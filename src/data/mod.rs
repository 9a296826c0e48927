use std::collections::BTreeMap;

use burn::data::dataset::Dataset;

use crate::error::FlowError;

pub mod huggingface;
pub mod memory;
pub mod record;

pub use self::record::{FieldValue, Record};

pub type Split = Box<dyn Dataset<Record>>;

/// Something that can resolve a dataset identifier into its splits.
pub trait DatasetLoader {
    fn load(&self, id: &str) -> Result<DatasetDict, FlowError>;
}

/// A loaded dataset: named splits, each an ordered sequence of records.
pub struct DatasetDict {
    id: String,
    splits: BTreeMap<String, Split>,
}

impl DatasetDict {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            splits: BTreeMap::new(),
        }
    }

    pub fn with_split(mut self, name: &str, split: Split) -> Self {
        self.splits.insert(name.to_owned(), split);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn split_names(&self) -> impl Iterator<Item = &str> {
        self.splits.keys().map(String::as_str)
    }

    pub fn num_rows(&self) -> BTreeMap<String, usize> {
        self.splits
            .iter()
            .map(|(name, split)| (name.clone(), split.len()))
            .collect()
    }

    pub fn split(&self, name: &str) -> Result<&dyn Dataset<Record>, FlowError> {
        self.splits
            .get(name)
            .map(|split| split.as_ref())
            .ok_or_else(|| FlowError::UnknownSplit {
                split: name.to_owned(),
                available: self.split_names().map(str::to_owned).collect(),
            })
    }

    pub fn record(&self, split: &str, index: usize) -> Result<Record, FlowError> {
        let dataset = self.split(split)?;
        let len = dataset.len();
        if index >= len {
            return Err(FlowError::IndexOutOfRange {
                index,
                split: split.to_owned(),
                len,
            });
        }

        dataset.get(index).ok_or_else(|| FlowError::RecordUnreadable {
            split: split.to_owned(),
            index,
        })
    }
}

impl std::fmt::Debug for DatasetDict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetDict")
            .field("id", &self.id)
            .field("num_rows", &self.num_rows())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use burn::data::dataset::InMemDataset;

    use super::*;

    fn dict() -> DatasetDict {
        let rows: Vec<Record> = (0..3)
            .map(|i| Record::new().with("label", FieldValue::Integer(i)))
            .collect();
        DatasetDict::new("toy")
            .with_split("train", Box::new(InMemDataset::new(rows)))
            .with_split("test", Box::new(InMemDataset::<Record>::new(vec![])))
    }

    #[test]
    fn num_rows_per_split() {
        let rows = dict().num_rows();
        assert_eq!(rows.get("train"), Some(&3));
        assert_eq!(rows.get("test"), Some(&0));
        assert_eq!(dict().split_names().collect::<Vec<_>>(), ["test", "train"]);
    }

    #[test]
    fn record_by_index() {
        let record = dict().record("train", 2).unwrap();
        assert_eq!(record.get("label"), Some(&FieldValue::Integer(2)));
    }

    #[test]
    fn index_past_the_end() {
        match dict().record("train", 3) {
            Err(FlowError::IndexOutOfRange { index, split, len }) => {
                assert_eq!((index, split.as_str(), len), (3, "train", 3));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            dict().record("test", 0),
            Err(FlowError::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn unknown_split() {
        match dict().record("validation", 0) {
            Err(FlowError::UnknownSplit { split, available }) => {
                assert_eq!(split, "validation");
                assert_eq!(available, ["test", "train"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
