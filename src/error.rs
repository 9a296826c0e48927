use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("dataset `{id}` is unavailable: {reason}")]
    DatasetUnavailable { id: String, reason: String },

    #[error("split `{split}` not found (available: {available:?})")]
    UnknownSplit {
        split: String,
        available: Vec<String>,
    },

    #[error("index {index} out of range for split `{split}` with {len} records")]
    IndexOutOfRange {
        index: usize,
        split: String,
        len: usize,
    },

    #[error("record {index} of split `{split}` could not be read")]
    RecordUnreadable { split: String, index: usize },

    #[error("record has no image field `{field}`")]
    MissingField { field: String },

    #[error("decoding image")]
    ImageDecode(#[from] image::ImageError),

    #[error("cannot display image: {reason}")]
    Display {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("writing output")]
    Output(#[from] std::io::Error),
}

impl FlowError {
    pub fn display(reason: impl ToString) -> Self {
        Self::Display {
            reason: reason.to_string(),
            source: None,
        }
    }

    /// A display failure caused by a lower level error, kept as the source.
    pub fn display_caused(
        reason: impl ToString,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Display {
            reason: reason.to_string(),
            source: Some(Box::new(source)),
        }
    }
}
