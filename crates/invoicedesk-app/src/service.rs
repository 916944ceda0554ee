// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{
    ArchiveOutcome, AssigneeFilter, InvoiceFields, RowId, RowSets, SelectedFile, UploadResponse,
};

/// The remote row store. It is authoritative; the controller only caches
/// what it returns.
pub trait RowService {
    fn fetch_rows(&mut self, assignees: &AssigneeFilter) -> Result<RowSets>;
    fn upload(&mut self, files: &[SelectedFile]) -> Result<UploadResponse>;
    fn delete_row(&mut self, id: &RowId) -> Result<()>;
    fn unarchive_row(&mut self, id: &RowId) -> Result<()>;
    fn set_notes(&mut self, id: &RowId, notes: &str) -> Result<()>;
    fn set_starred(&mut self, id: &RowId, starred: bool) -> Result<()>;
    fn set_assignee(&mut self, id: &RowId, assignee: &str) -> Result<()>;
    fn set_archive_outcome(&mut self, id: &RowId, outcome: ArchiveOutcome) -> Result<()>;
    /// One write carrying every archive field.
    fn archive_row(&mut self, id: &RowId, outcome: ArchiveOutcome, assignee: &str) -> Result<()>;
    fn edit_row(&mut self, id: &RowId, fields: &InvoiceFields) -> Result<()>;
    fn create_row(&mut self, fields: &InvoiceFields) -> Result<()>;
}
