//! Submitted form fields and the `group[field]` naming convention.
//!
//! A form arrives as an ordered list of `name=value` pairs, the same shape a
//! browser's `FormData` exposes. Names may use bracket grouping
//! (`sourcePoint[provider]`) which the payload builder regroups into nested
//! objects. Values prefixed with `@` name a file on disk and are only sent
//! verbatim in multipart bodies.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use super::error::FormError;

/// A single submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(FilePart),
}

impl FieldValue {
    /// Text form of the value; files contribute their file name.
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::File(part) => &part.file_name,
        }
    }
}

/// File attached to a form, read lazily when a multipart body is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

impl FilePart {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("upload.bin")
            .to_string();
        let content_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            path,
            file_name,
            content_type,
        }
    }
}

/// Ordered form entries. Duplicate names are kept; object conversion is
/// last-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    entries: Vec<(String, FieldValue)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name=value` or `name=@path` as typed on a command line.
    pub fn parse_pair(input: &str) -> Result<(String, FieldValue), FormError> {
        let (name, value) = input
            .split_once('=')
            .ok_or_else(|| FormError::MissingSeparator {
                input: input.to_string(),
            })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName {
                input: input.to_string(),
            });
        }

        let value = match value.strip_prefix('@') {
            Some(path) if path.trim().is_empty() => {
                return Err(FormError::EmptyFilePath {
                    name: name.to_string(),
                });
            }
            Some(path) => FieldValue::File(FilePart::from_path(path.trim())),
            None => FieldValue::Text(value.to_string()),
        };
        Ok((name.to_string(), value))
    }

    /// Read one pair per line; blank lines and `#` comments are skipped.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, FieldsFileError> {
        let mut fields = Self::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(FieldsFileError::Io)?;
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (name, value) =
                Self::parse_pair(trimmed).map_err(|source| FieldsFileError::Line {
                    line: index + 1,
                    source,
                })?;
            fields.push(name, value);
        }
        Ok(fields)
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.entries.push((name.into(), value));
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.push(name, FieldValue::Text(value.into()));
    }

    /// Last value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn has_files(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, value)| matches!(value, FieldValue::File(_)))
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|(_, value)| match value {
            FieldValue::File(part) => Some(part.path.as_path()),
            FieldValue::Text(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.push_text(name, value);
        }
        fields
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FieldsFileError {
    #[error("failed to read fields: {0}")]
    Io(std::io::Error),
    #[error("line {line}: {source}")]
    Line { line: usize, source: FormError },
}

/// Decoded form field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey<'a> {
    Flat(&'a str),
    Grouped { group: &'a str, field: &'a str },
}

impl<'a> FieldKey<'a> {
    /// Split `group[field]`; any other shape, including nested brackets or
    /// empty parts, stays flat.
    pub fn parse(name: &'a str) -> Self {
        let grouped = name
            .strip_suffix(']')
            .and_then(|rest| rest.split_once('['))
            .filter(|(group, field)| {
                !group.is_empty()
                    && !field.is_empty()
                    && !group.contains(['[', ']'])
                    && !field.contains(['[', ']'])
            });
        match grouped {
            Some((group, field)) => FieldKey::Grouped { group, field },
            None => FieldKey::Flat(name),
        }
    }
}
