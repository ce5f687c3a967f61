//! Values a form field can hold.

use bytes::Bytes;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A file picked for an upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// File contents never go back out in a screen, only their description.
impl Serialize for Upload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Upload", 3)?;
        s.serialize_field("file_name", &self.file_name)?;
        s.serialize_field("content_type", &self.content_type)?;
        s.serialize_field("size", &self.size())?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    File(Upload),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_upload(&self) -> Option<&Upload> {
        match self {
            FieldValue::File(upload) => Some(upload),
            FieldValue::Text(_) => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FieldValue::File(_))
    }

    /// Empty text, or a file input submitted with nothing selected.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::File(upload) => upload.file_name.is_empty() && upload.bytes.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Upload> for FieldValue {
    fn from(upload: Upload) -> Self {
        FieldValue::File(upload)
    }
}
