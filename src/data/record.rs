use std::{collections::BTreeMap, fmt};

use serde::{
    de::{Error, Visitor},
    Deserialize, Deserializer,
};

use crate::error::FlowError;

/// A single column value, as stored by a row oriented source.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldValueVisitor;

        impl<'de> Visitor<'de> for FieldValueVisitor {
            type Value = FieldValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a null, integer, real, text or blob value")
            }

            fn visit_unit<E: Error>(self) -> Result<FieldValue, E> {
                Ok(FieldValue::Null)
            }

            fn visit_none<E: Error>(self) -> Result<FieldValue, E> {
                Ok(FieldValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<FieldValue, D::Error>
            where
                D: Deserializer<'de>,
            {
                FieldValue::deserialize(deserializer)
            }

            fn visit_bool<E: Error>(self, v: bool) -> Result<FieldValue, E> {
                Ok(FieldValue::Integer(v as i64))
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<FieldValue, E> {
                Ok(FieldValue::Integer(v))
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<FieldValue, E> {
                Ok(match i64::try_from(v) {
                    Ok(v) => FieldValue::Integer(v),
                    Err(_) => FieldValue::Real(v as f64),
                })
            }

            fn visit_f64<E: Error>(self, v: f64) -> Result<FieldValue, E> {
                Ok(FieldValue::Real(v))
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(v.to_owned()))
            }

            fn visit_string<E: Error>(self, v: String) -> Result<FieldValue, E> {
                Ok(FieldValue::Text(v))
            }

            fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<FieldValue, E> {
                Ok(FieldValue::Bytes(v.to_vec()))
            }

            fn visit_byte_buf<E: Error>(self, v: Vec<u8>) -> Result<FieldValue, E> {
                Ok(FieldValue::Bytes(v))
            }
        }

        deserializer.deserialize_any(FieldValueVisitor)
    }
}

/// One row of a split: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Encoded image bytes stored under `field`.
    ///
    /// The HuggingFace importer flattens an image column `image` into
    /// `image_bytes` and `image_path`, so `{field}_bytes` is tried when
    /// `field` itself holds no bytes.
    pub fn image_bytes(&self, field: &str) -> Result<&[u8], FlowError> {
        let flattened = format!("{field}_bytes");
        let bytes = [field, flattened.as_str()]
            .into_iter()
            .filter_map(|name| self.get(name))
            .filter_map(FieldValue::as_bytes)
            .find(|bytes| !bytes.is_empty())
            .ok_or_else(|| FlowError::MissingField {
                field: field.to_owned(),
            });
        bytes
    }

    pub fn image(&self, field: &str) -> Result<image::DynamicImage, FlowError> {
        let bytes = self.image_bytes(field)?;
        Ok(image::load_from_memory(bytes)?)
    }
}
