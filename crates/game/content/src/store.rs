//! External document store access.
//!
//! A [`DocumentSource`] is a named location on disk holding one configuration
//! document. The concrete serialization is chosen by extension (TOML by
//! default, JSON for `.json`) and normalized into `serde_json::Value`, the
//! untyped document model the schema layer walks.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;

use crate::error::{ContentError, Result};

/// Modification marker: any change to it means "re-read the source".
///
/// Compared by inequality, not ordering, so a file restored from a backup
/// (older mtime) still triggers a reload.
pub type Marker = SystemTime;

/// One addressable configuration document.
#[derive(Clone, Debug)]
pub struct DocumentSource {
    path: PathBuf,
}

impl DocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Cheap metadata check: the source's live modification marker.
    pub fn marker(&self) -> Result<Marker> {
        let metadata = fs::metadata(&self.path).map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })?;
        metadata.modified().map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Full read: marker, then contents, parsed into the untyped model.
    ///
    /// The marker is taken before the contents so a write racing the read is
    /// picked up by the next marker check rather than lost.
    pub fn read(&self) -> Result<(Value, Marker)> {
        if !self.exists() {
            return Err(ContentError::SourceNotFound(self.path.clone()));
        }
        let marker = self.marker()?;
        let text = fs::read_to_string(&self.path).map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })?;
        let document = self.parse(&text)?;
        Ok((document, marker))
    }

    fn parse(&self, text: &str) -> Result<Value> {
        let is_json = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(text).map_err(|e| ContentError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })
        } else {
            let value: toml::Value = toml::from_str(text).map_err(|e| ContentError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
            serde_json::to_value(value).map_err(|e| ContentError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn toml_documents_normalize_to_nested_records() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[monster.hp]\nbase = 100.0\nperLevel = 25.0").expect("write");

        let source = DocumentSource::new(file.path());
        let (value, _) = source.read().expect("read");
        assert_eq!(value["monster"]["hp"]["base"], serde_json::json!(100.0));
    }

    #[test]
    fn missing_source_is_reported_as_not_found() {
        let source = DocumentSource::new("/nonexistent/abilities.toml");
        assert!(!source.exists());
        assert!(matches!(
            source.read(),
            Err(ContentError::SourceNotFound(_))
        ));
    }
}
