//! Source document - the nested JSON sign database
//!
//! The document is shaped as
//! `{category_name: {series_label: [sign_record, ...]}}`.
//! It is parsed and validated in full before anything is written, so a
//! malformed entry is reported with its location instead of failing
//! halfway through an import.

use crate::catalog::{self, FileType};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One sign as it appears in the source document.
///
/// Unknown fields are ignored. `notes` defaults to an empty string when
/// absent; an explicit `null` is kept as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRecord {
    pub sign_designation: String,
    pub sign_name: String,
    #[serde(default = "empty_notes")]
    pub notes: Option<String>,
    #[serde(default)]
    pub png_file_link: Option<String>,
    #[serde(default)]
    pub svg_file_link: Option<String>,
    #[serde(default)]
    pub pdf_file_link: Option<String>,
    #[serde(default)]
    pub layout_file_link: Option<String>,
    #[serde(default)]
    pub png_file: Option<String>,
    #[serde(default)]
    pub pdf_file: Option<String>,
}

fn empty_notes() -> Option<String> {
    Some(String::new())
}

impl SignRecord {
    /// Raw value of the link field feeding `file_type`
    pub fn link(&self, file_type: FileType) -> Option<&str> {
        let value = match file_type {
            FileType::Png => &self.png_file_link,
            FileType::Svg => &self.svg_file_link,
            FileType::PdfFull => &self.pdf_file_link,
            FileType::Layout => &self.layout_file_link,
            FileType::PngPage => &self.png_file,
            FileType::PdfPage => &self.pdf_file,
        };
        value.as_deref()
    }

    /// Present, non-blank links in import order. Values are returned untrimmed.
    pub fn file_links(&self) -> impl Iterator<Item = (FileType, &str)> + '_ {
        FileType::all().iter().filter_map(move |&file_type| {
            self.link(file_type)
                .filter(|url| !url.trim().is_empty())
                .map(|url| (file_type, url))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesEntry {
    /// Label as written in the document, e.g. "R1 series"
    pub label: String,
    /// Derived code, e.g. "R1"
    pub code: String,
    pub signs: Vec<SignRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub series: Vec<SeriesEntry>,
}

/// A validated source document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignDocument {
    pub categories: Vec<CategoryEntry>,
}

impl SignDocument {
    /// Read and validate a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(categories) = value else {
            return Err(invalid(&[], "expected an object of categories"));
        };

        let mut document = SignDocument::default();
        for (name, series_value) in categories {
            if name.trim().is_empty() {
                return Err(invalid(&[], "category name is blank"));
            }
            let Value::Object(series_map) = series_value else {
                return Err(invalid(&[name.as_str()], "expected an object of series"));
            };

            let mut category = CategoryEntry {
                name,
                series: Vec::with_capacity(series_map.len()),
            };

            for (label, signs_value) in series_map {
                let code = catalog::series_code(&label).to_string();
                if code.is_empty() {
                    return Err(invalid(&[category.name.as_str(), label.as_str()], "series code is blank"));
                }
                let Value::Array(items) = signs_value else {
                    return Err(invalid(&[category.name.as_str(), label.as_str()], "expected an array of signs"));
                };

                let mut signs = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    // Entries are numbered from 1 in messages
                    let entry = format!("{} > #{}", location(&[category.name.as_str(), label.as_str()]), index + 1);
                    let record: SignRecord = serde_json::from_value(item).map_err(|e| Error::InvalidDocument {
                        location: entry.clone(),
                        message: e.to_string(),
                    })?;
                    if record.sign_designation.trim().is_empty() {
                        return Err(Error::InvalidDocument {
                            location: entry,
                            message: "sign_designation is blank".to_string(),
                        });
                    }
                    signs.push(record);
                }

                category.series.push(SeriesEntry { label, code, signs });
            }

            document.categories.push(category);
        }

        Ok(document)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total_series(&self) -> usize {
        self.categories.iter().map(|c| c.series.len()).sum()
    }

    pub fn total_signs(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.series)
            .map(|s| s.signs.len())
            .sum()
    }

    /// Number of `sign_files` rows one import of this document appends
    pub fn total_links(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.series)
            .flat_map(|s| &s.signs)
            .map(|sign| sign.file_links().count())
            .sum()
    }
}

fn location(path: &[&str]) -> String {
    if path.is_empty() {
        return "$".to_string();
    }
    path.iter()
        .map(|part| format!("{:?}", part))
        .collect::<Vec<_>>()
        .join(" > ")
}

fn invalid(path: &[&str], message: &str) -> Error {
    Error::InvalidDocument {
        location: location(path),
        message: message.to_string(),
    }
}
