// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use std::collections::BTreeSet;

use invoicedesk_app::{
    ArchiveOutcome, AssigneeFilter, InvoiceFields, Row, RowId, RowService, RowSets, SelectedFile,
    UploadResponse,
};

use crate::InvoiceFaker;

/// One request as the memory service received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    FetchRows(AssigneeFilter),
    Upload(Vec<String>),
    Delete(RowId),
    Unarchive(RowId),
    SetNotes(RowId, String),
    SetStarred(RowId, bool),
    SetAssignee(RowId, String),
    SetArchiveOutcome(RowId, ArchiveOutcome),
    Archive {
        id: RowId,
        outcome: ArchiveOutcome,
        assignee: String,
    },
    Edit(RowId, InvoiceFields),
    Create(InvoiceFields),
}

/// In-process stand-in for the row backend. Records every call, can be told
/// to fail, and keeps rows the way the server would.
#[derive(Debug, Clone)]
pub struct MemoryRowService {
    rows: RowSets,
    next_id: i64,
    calls: Vec<ServiceCall>,
    fail_writes: Option<String>,
    fail_fetches: Option<String>,
    upload_responses: Vec<UploadResponse>,
    faker: InvoiceFaker,
}

impl MemoryRowService {
    pub fn new(rows: RowSets) -> Self {
        let next_id = rows
            .all()
            .filter_map(|row| row.id.as_str().parse::<i64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            rows,
            next_id,
            calls: Vec::new(),
            fail_writes: None,
            fail_fetches: None,
            upload_responses: Vec::new(),
            faker: InvoiceFaker::new(7),
        }
    }

    /// A backend pre-filled with faker rows.
    pub fn seeded(seed: u64, active: usize, archived: usize) -> Self {
        let mut faker = InvoiceFaker::new(seed);
        let rows = faker.row_sets(active, archived);
        let mut service = Self::new(rows);
        service.faker = faker;
        service
    }

    pub fn rows(&self) -> &RowSets {
        &self.rows
    }

    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    /// Calls other than fetches, in order.
    pub fn writes(&self) -> Vec<&ServiceCall> {
        self.calls
            .iter()
            .filter(|call| !matches!(call, ServiceCall::FetchRows(_)))
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Every write fails with `message` until cleared with `None`.
    pub fn fail_writes(&mut self, message: Option<&str>) {
        self.fail_writes = message.map(str::to_owned);
    }

    pub fn fail_fetches(&mut self, message: Option<&str>) {
        self.fail_fetches = message.map(str::to_owned);
    }

    /// Answer the next upload with `response` instead of faker output.
    pub fn queue_upload_response(&mut self, response: UploadResponse) {
        self.upload_responses.push(response);
    }

    fn record_write(&mut self, call: ServiceCall) -> Result<()> {
        self.calls.push(call);
        match &self.fail_writes {
            Some(message) => bail!("{message}"),
            None => Ok(()),
        }
    }

    fn row_mut(&mut self, id: &RowId) -> Result<&mut Row> {
        self.rows
            .find_mut(id)
            .ok_or_else(|| anyhow!("row {id} not found"))
    }

    fn ensure_unique(&self, external_ref: &str, except: Option<&RowId>) -> Result<()> {
        let taken = self
            .rows
            .all()
            .any(|row| Some(&row.id) != except && row.external_ref() == external_ref);
        if taken {
            bail!("invoice number {external_ref} already exists");
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId::from(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for MemoryRowService {
    fn default() -> Self {
        Self::new(RowSets::default())
    }
}

impl RowService for MemoryRowService {
    fn fetch_rows(&mut self, assignees: &AssigneeFilter) -> Result<RowSets> {
        self.calls.push(ServiceCall::FetchRows(assignees.clone()));
        if let Some(message) = &self.fail_fetches {
            bail!("{message}");
        }
        Ok(RowSets {
            active: self
                .rows
                .active
                .iter()
                .filter(|row| assignees.matches(&row.assigned_to))
                .cloned()
                .collect(),
            archived: self.rows.archived.clone(),
        })
    }

    fn upload(&mut self, files: &[SelectedFile]) -> Result<UploadResponse> {
        let names: Vec<String> = files.iter().map(|file| file.name.clone()).collect();
        self.record_write(ServiceCall::Upload(names.clone()))?;
        let response = if self.upload_responses.is_empty() {
            self.faker.upload_response(&names)
        } else {
            self.upload_responses.remove(0)
        };
        if response.ai_error {
            return Ok(response);
        }

        let mut stored: BTreeSet<String> = self
            .rows
            .all()
            .map(|row| row.external_ref().to_owned())
            .collect();
        for fields in &response.data {
            if stored.insert(fields.external_ref.clone()) {
                let id = self.allocate_id();
                self.rows.active.push(Row::new(id, fields.clone()));
            }
        }
        Ok(response)
    }

    fn delete_row(&mut self, id: &RowId) -> Result<()> {
        self.record_write(ServiceCall::Delete(id.clone()))?;
        self.rows
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("row {id} not found"))
    }

    fn unarchive_row(&mut self, id: &RowId) -> Result<()> {
        self.record_write(ServiceCall::Unarchive(id.clone()))?;
        let Some(index) = self.rows.archived.iter().position(|row| &row.id == id) else {
            bail!("row {id} is not archived");
        };
        let mut row = self.rows.archived.remove(index);
        row.archive_result = None;
        self.rows.active.push(row);
        Ok(())
    }

    fn set_notes(&mut self, id: &RowId, notes: &str) -> Result<()> {
        self.record_write(ServiceCall::SetNotes(id.clone(), notes.to_owned()))?;
        self.row_mut(id)?.notes = notes.to_owned();
        Ok(())
    }

    fn set_starred(&mut self, id: &RowId, starred: bool) -> Result<()> {
        self.record_write(ServiceCall::SetStarred(id.clone(), starred))?;
        self.row_mut(id)?.starred = starred;
        Ok(())
    }

    fn set_assignee(&mut self, id: &RowId, assignee: &str) -> Result<()> {
        self.record_write(ServiceCall::SetAssignee(id.clone(), assignee.to_owned()))?;
        self.row_mut(id)?.assigned_to = assignee.to_owned();
        Ok(())
    }

    fn set_archive_outcome(&mut self, id: &RowId, outcome: ArchiveOutcome) -> Result<()> {
        self.record_write(ServiceCall::SetArchiveOutcome(id.clone(), outcome))?;
        self.row_mut(id)?.archive_result = Some(outcome);
        Ok(())
    }

    fn archive_row(&mut self, id: &RowId, outcome: ArchiveOutcome, assignee: &str) -> Result<()> {
        self.record_write(ServiceCall::Archive {
            id: id.clone(),
            outcome,
            assignee: assignee.to_owned(),
        })?;
        let Some(index) = self.rows.active.iter().position(|row| &row.id == id) else {
            bail!("row {id} is not active");
        };
        let mut row = self.rows.active.remove(index);
        row.archive_result = Some(outcome);
        row.assigned_to = assignee.to_owned();
        self.rows.archived.push(row);
        Ok(())
    }

    fn edit_row(&mut self, id: &RowId, fields: &InvoiceFields) -> Result<()> {
        self.record_write(ServiceCall::Edit(id.clone(), fields.clone()))?;
        self.ensure_unique(&fields.external_ref, Some(id))?;
        self.row_mut(id)?.fields = fields.clone();
        Ok(())
    }

    fn create_row(&mut self, fields: &InvoiceFields) -> Result<()> {
        self.record_write(ServiceCall::Create(fields.clone()))?;
        self.ensure_unique(&fields.external_ref, None)?;
        let id = self.allocate_id();
        self.rows.active.push(Row::new(id, fields.clone()));
        Ok(())
    }
}
