/*!
Input acquisition.

This module defines:
- `InputSource`: a small trait returning the raw text of one input together with
  a label used in error messages.
- `FileSource`: reads a file from disk.
- `TextSource`: serves an in-memory string, handy for tests and embedding.
*/

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{GraphError, GraphResult};

/// A source of raw input text. Implementations hide where the text comes from.
pub trait InputSource {
    /// Label identifying the input in error messages.
    fn origin(&self) -> String;

    fn read_text(&self) -> GraphResult<String>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputSource for FileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    /// Reads the whole file at once; the handle is closed before returning on every path.
    fn read_text(&self) -> GraphResult<String> {
        let text = fs::read_to_string(&self.path).map_err(|source| GraphError::FileNotFound {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = text.len(), "read input file");
        Ok(text)
    }
}

#[derive(Debug, Clone)]
pub struct TextSource {
    label: String,
    text: String,
}

impl TextSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl InputSource for TextSource {
    fn origin(&self) -> String {
        self.label.clone()
    }

    fn read_text(&self) -> GraphResult<String> {
        Ok(self.text.clone())
    }
}
