// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{InvoiceFields, RowSets};

pub const EXTRACTION_FAILED_MESSAGE: &str = "AI extraction failed. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata =
            fs::metadata(path).with_context(|| format!("read file info {}", path.display()))?;
        if !metadata.is_file() {
            bail!("{} is not a file -- choose PDF files to upload", path.display());
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

/// Collapse files that share both name and size; the first occurrence wins.
pub fn dedupe_files(files: Vec<SelectedFile>) -> Vec<SelectedFile> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| seen.insert((file.name.clone(), file.size)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidFile {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteEntry {
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub added_names: Vec<String>,
}

/// Body of `POST /api/upload`. Missing and `null` fields read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<InvoiceFields>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_error: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invalid_files: Vec<InvalidFile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub incomplete_entries_with_names: Vec<IncompleteEntry>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep extracted rows whose external reference is neither already known
/// nor repeated earlier in the same batch. Returns the kept rows and the
/// number dropped.
pub fn select_new_rows(
    extracted: Vec<InvoiceFields>,
    existing: &RowSets,
) -> (Vec<InvoiceFields>, usize) {
    let known: BTreeSet<&str> = existing.all().map(|row| row.external_ref()).collect();
    let mut batch = BTreeSet::new();
    let total = extracted.len();
    let kept: Vec<InvoiceFields> = extracted
        .into_iter()
        .filter(|fields| {
            !known.contains(fields.external_ref.as_str())
                && batch.insert(fields.external_ref.clone())
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

pub fn reason_label(code: &str) -> String {
    match code {
        "no data found" => "no invoice data found".to_owned(),
        "incomplete entry" => "incomplete entry".to_owned(),
        "" => "unreadable".to_owned(),
        other => other.to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadReport {
    pub added: Vec<InvoiceFields>,
    pub duplicates_dropped: usize,
    /// File names grouped by reason code.
    pub invalid_files: BTreeMap<String, Vec<String>>,
    pub manual_review: Vec<IncompleteEntry>,
}

impl UploadReport {
    pub fn new(
        added: Vec<InvoiceFields>,
        duplicates_dropped: usize,
        response: UploadResponse,
    ) -> Self {
        let mut invalid_files: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for file in response.invalid_files {
            invalid_files.entry(file.reason).or_default().push(file.filename);
        }
        Self {
            added,
            duplicates_dropped,
            invalid_files,
            manual_review: response.incomplete_entries_with_names,
        }
    }

    /// True when there is nothing to advise about beyond the added rows.
    pub fn is_clean(&self) -> bool {
        self.invalid_files.is_empty() && self.manual_review.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{} new row(s) added", self.added.len())];
        if self.duplicates_dropped > 0 {
            lines.push(format!(
                "{} duplicate invoice number(s) skipped",
                self.duplicates_dropped
            ));
        }
        for (reason, files) in &self.invalid_files {
            lines.push(format!("{}: {}", reason_label(reason), files.join(", ")));
        }
        for entry in &self.manual_review {
            if entry.added_names.is_empty() {
                lines.push(format!("check manually: {}", entry.filename));
            } else {
                lines.push(format!(
                    "check manually: {} (recovered {})",
                    entry.filename,
                    entry.added_names.join(", ")
                ));
            }
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    ExtractionFailed,
    Completed(UploadReport),
}

#[cfg(test)]
mod tests {
    use super::{
        InvalidFile, SelectedFile, UploadReport, UploadResponse, dedupe_files, select_new_rows,
    };
    use crate::{InvoiceFields, Row, RowId, RowSets};
    use std::path::PathBuf;

    fn file(name: &str, size: u64) -> SelectedFile {
        SelectedFile {
            path: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_owned(),
            size,
        }
    }

    fn fields(external_ref: &str, name: &str) -> InvoiceFields {
        InvoiceFields {
            name: name.to_owned(),
            external_ref: external_ref.to_owned(),
            ..InvoiceFields::default()
        }
    }

    #[test]
    fn null_response_fields_read_as_empty() -> serde_json::Result<()> {
        let response: UploadResponse = serde_json::from_str(
            r#"{
                "data": [],
                "ai_error": null,
                "invalid_files": null,
                "incomplete_entries_with_names": [
                    {"filename": "x.pdf", "added_names": null}
                ]
            }"#,
        )?;
        assert!(!response.ai_error);
        assert!(response.invalid_files.is_empty());
        assert_eq!(response.incomplete_entries_with_names.len(), 1);
        assert!(response.incomplete_entries_with_names[0].added_names.is_empty());

        let sparse: UploadResponse = serde_json::from_str(r#"{"data": null}"#)?;
        assert_eq!(sparse, UploadResponse::default());
        Ok(())
    }

    #[test]
    fn files_dedupe_on_name_and_size() {
        let kept = dedupe_files(vec![
            file("a.pdf", 10),
            file("a.pdf", 10),
            file("a.pdf", 11),
            file("b.pdf", 10),
        ]);
        let pairs: Vec<(&str, u64)> = kept.iter().map(|f| (f.name.as_str(), f.size)).collect();
        assert_eq!(pairs, vec![("a.pdf", 10), ("a.pdf", 11), ("b.pdf", 10)]);
    }

    #[test]
    fn batch_duplicates_keep_first_occurrence() {
        let (kept, dropped) = select_new_rows(
            vec![fields("R1", "first"), fields("R1", "second"), fields("R2", "other")],
            &RowSets::default(),
        );
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].name, "first");
    }

    #[test]
    fn rows_known_in_either_collection_are_dropped() {
        let existing = RowSets {
            active: vec![Row::new(RowId::from(1), fields("R1", "active"))],
            archived: vec![Row::new(RowId::from(2), fields("R2", "archived"))],
        };
        let (kept, dropped) = select_new_rows(
            vec![fields("R1", "x"), fields("R2", "y"), fields("R3", "z")],
            &existing,
        );
        assert_eq!(dropped, 2);
        assert_eq!(kept, vec![fields("R3", "z")]);
    }

    #[test]
    fn report_groups_invalid_files_by_reason() {
        let response = UploadResponse {
            invalid_files: vec![
                InvalidFile {
                    filename: "a.pdf".to_owned(),
                    reason: "no data found".to_owned(),
                },
                InvalidFile {
                    filename: "b.pdf".to_owned(),
                    reason: "incomplete entry".to_owned(),
                },
                InvalidFile {
                    filename: "c.pdf".to_owned(),
                    reason: "no data found".to_owned(),
                },
            ],
            ..UploadResponse::default()
        };
        let report = UploadReport::new(Vec::new(), 0, response);
        assert_eq!(
            report.invalid_files.get("no data found"),
            Some(&vec!["a.pdf".to_owned(), "c.pdf".to_owned()])
        );
        assert!(!report.is_clean());
        assert!(
            report
                .lines()
                .iter()
                .any(|line| line == "no invoice data found: a.pdf, c.pdf")
        );
    }

    #[test]
    fn upload_response_tolerates_missing_optional_keys() -> serde_json::Result<()> {
        let response: UploadResponse = serde_json::from_str(
            r#"{"data":[{"Ihre Rechnungs-Nr.":"R9"}],"incomplete_entries_with_names":[{"filename":"x.pdf"}]}"#,
        )?;
        assert!(!response.ai_error);
        assert_eq!(response.data[0].external_ref, "R9");
        assert!(response.incomplete_entries_with_names[0].added_names.is_empty());
        Ok(())
    }
}
