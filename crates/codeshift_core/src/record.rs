use serde::{Deserialize, Serialize};

/// One converted source file as reported by the conversion service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Generated files (no source counterpart) arrive without this field.
    #[serde(default)]
    pub original_code: String,
    #[serde(default)]
    pub converted_code: String,
}

impl FileResult {
    /// Label used in result lists: the name, else the path, else a placeholder.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.path.as_deref())
            .unwrap_or("<unnamed>")
    }
}

/// A single line of the conversion stream, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamRecord {
    File {
        data: FileResult,
    },
    Complete {
        #[serde(rename = "downloadId")]
        download_id: String,
    },
    Error {
        message: String,
    },
}
