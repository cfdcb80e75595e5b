//! Catalog types - the normalized sign database
//!
//! The catalog is a fixed four-level tree:
//! - `Category`: top-level grouping, e.g. "Regulatory Signs"
//! - `Series`: a family of signs inside one category, e.g. "R1"
//! - `Sign`: a single sign, keyed by its designation, e.g. "R1-1"
//! - `SignFile`: a link to an artwork or document file for a sign

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Suffix removed from a series label to obtain its series code.
pub const SERIES_SUFFIX: &str = " series";

/// Kind of file a `SignFile` row points at.
///
/// Each variant is fed by exactly one field of a source sign record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Standalone PNG rendering
    Png,
    /// Standalone SVG artwork
    Svg,
    /// Full specification PDF
    PdfFull,
    /// Layout / dimension drawing
    Layout,
    /// PNG of the sign's page in the manual
    PngPage,
    /// PDF of the sign's page in the manual
    PdfPage,
}

impl FileType {
    /// Get the string tag stored in `sign_files.file_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Png => "png",
            FileType::Svg => "svg",
            FileType::PdfFull => "pdf_full",
            FileType::Layout => "layout",
            FileType::PngPage => "png_page",
            FileType::PdfPage => "pdf_page",
        }
    }

    /// Name of the source record field this file type is read from
    pub fn source_field(&self) -> &'static str {
        match self {
            FileType::Png => "png_file_link",
            FileType::Svg => "svg_file_link",
            FileType::PdfFull => "pdf_file_link",
            FileType::Layout => "layout_file_link",
            FileType::PngPage => "png_file",
            FileType::PdfPage => "pdf_file",
        }
    }

    /// Get all file types, in import order
    pub fn all() -> &'static [FileType] {
        &[
            FileType::Png,
            FileType::Svg,
            FileType::PdfFull,
            FileType::Layout,
            FileType::PngPage,
            FileType::PdfPage,
        ]
    }
}

impl FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FileType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownFileType(s.to_string()))
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive a series code from its label: "R1 series" becomes "R1".
pub fn series_code(label: &str) -> &str {
    let trimmed = label.trim();
    trimmed
        .strip_suffix(SERIES_SUFFIX)
        .unwrap_or(trimmed)
        .trim()
}

/// Description stored on a category when it is first created.
pub fn category_description(name: &str) -> String {
    format!("{} (imported)", name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    pub category_id: i64,
    pub series_code: String,
    pub description: Option<String>,
}

/// A sign row. `designation` is unique across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sign {
    pub id: i64,
    pub series_id: i64,
    pub designation: String,
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignFile {
    pub id: i64,
    pub sign_id: i64,
    pub file_type: FileType,
    pub storage_url: String,
}
