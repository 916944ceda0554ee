// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::{
    ArchiveOutcome, FieldErrors, FormField, FormMode, InvoiceFormInput, Row, RowId, RowService,
    RowSets, RowView, SelectedFile, Totals, UploadOutcome, UploadReport, ViewCommand, ViewEvent,
    ViewState, dedupe_files, select_new_rows, totals, visible_rows,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Invalid(FieldErrors),
}

/// Owns the cached row collections and the view state, and routes every
/// write through the service with a snapshot to roll back to.
pub struct RowViewController<S> {
    service: S,
    rows: RowSets,
    state: ViewState,
    roster: Vec<String>,
}

impl<S: RowService> RowViewController<S> {
    pub fn new(service: S, roster: Vec<String>, start_view: RowView) -> Self {
        let state = ViewState {
            view: start_view,
            ..ViewState::default()
        };
        Self {
            service,
            rows: RowSets::default(),
            state,
            roster,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn rows(&self) -> &RowSets {
        &self.rows
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Apply a view command and re-fetch when the change calls for it.
    pub fn dispatch(&mut self, command: ViewCommand) -> Result<Vec<ViewEvent>> {
        let events = self.state.dispatch(command);
        if events.iter().any(ViewEvent::needs_refresh) {
            self.refresh()?;
        }
        self.clamp_selection();
        Ok(events)
    }

    pub fn show_error(&mut self, error: &anyhow::Error) {
        warn!(error = %format!("{error:#}"), "showing error alert");
        self.state.dispatch(ViewCommand::ShowAlert(format!("{error:#}")));
    }

    pub fn refresh(&mut self) -> Result<()> {
        let rows = self
            .service
            .fetch_rows(&self.state.filter.assignees)
            .context("load rows")?;
        debug!(
            active = rows.active.len(),
            archived = rows.archived.len(),
            "fetched rows"
        );
        self.rows = rows;
        self.clamp_selection();
        Ok(())
    }

    pub fn visible_rows(&self) -> Vec<&Row> {
        visible_rows(&self.rows, self.state.view, &self.state.filter)
    }

    pub fn totals(&self) -> Totals {
        let shown = self.visible_rows();
        totals(&self.rows, self.state.view, &shown)
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.visible_rows().get(self.state.selected).copied()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        let max = len as isize - 1;
        let next = (self.state.selected as isize + delta).clamp(0, max) as usize;
        if next != self.state.selected {
            self.state.dispatch(ViewCommand::Select(next));
        }
    }

    /// The roster entry after `current`, wrapping through "unassigned".
    pub fn next_assignee(&self, current: &str) -> String {
        match self.roster.iter().position(|name| name == current) {
            Some(index) if index + 1 < self.roster.len() => self.roster[index + 1].clone(),
            Some(_) => String::new(),
            None => self.roster.first().cloned().unwrap_or_default(),
        }
    }

    pub fn upload(&mut self, paths: &[PathBuf]) -> Result<UploadOutcome> {
        let files = paths
            .iter()
            .map(|path| SelectedFile::from_path(path))
            .collect::<Result<Vec<_>>>()?;
        self.upload_files(files)
    }

    /// Extracted rows are screened against the loaded rows only. Under an
    /// assignee filter that is the server's filtered subset, so the server
    /// still has the final say on duplicates.
    pub fn upload_files(&mut self, files: Vec<SelectedFile>) -> Result<UploadOutcome> {
        let files = dedupe_files(files);
        if files.is_empty() {
            bail!("no files selected -- enter one or more PDF paths");
        }
        self.state.dispatch(ViewCommand::UploadStarted(files.clone()));

        let mut response = match self.service.upload(&files) {
            Ok(response) => response,
            Err(error) => {
                self.state.dispatch(ViewCommand::UploadFinished(None));
                return Err(error.context(format!("upload {} file(s)", files.len())));
            }
        };
        if response.ai_error {
            warn!(files = files.len(), "extraction failed on the server");
            self.state.dispatch(ViewCommand::UploadFinished(None));
            return Ok(UploadOutcome::ExtractionFailed);
        }

        let extracted = std::mem::take(&mut response.data);
        let (kept, dropped) = select_new_rows(extracted, &self.rows);
        for fields in &kept {
            let id = RowId::pending(&fields.external_ref);
            self.rows.active.push(Row::new(id, fields.clone()));
        }
        let report = UploadReport::new(kept, dropped, response);
        info!(
            files = files.len(),
            added = report.added.len(),
            duplicates = report.duplicates_dropped,
            invalid = report.invalid_files.values().map(Vec::len).sum::<usize>(),
            manual_review = report.manual_review.len(),
            "upload finished"
        );
        self.state
            .dispatch(ViewCommand::UploadFinished(Some(report.clone())));
        self.refresh().context("reload rows after upload")?;
        Ok(UploadOutcome::Completed(report))
    }

    pub fn assign(&mut self, id: &RowId, assignee: &str) -> Result<()> {
        self.require_loaded(id)?;
        let assignee = assignee.trim().to_owned();
        self.mutate(
            "assign",
            id,
            |rows| {
                if let Some(row) = rows.find_mut(id) {
                    row.assigned_to = assignee.clone();
                }
            },
            |service| service.set_assignee(id, &assignee),
        )
    }

    /// Send the complement of the cached flag. Returns the new flag.
    pub fn toggle_star(&mut self, id: &RowId) -> Result<bool> {
        let starred = !self.require_loaded(id)?.1;
        self.mutate(
            "star",
            id,
            |rows| {
                if let Some(row) = rows.find_mut(id) {
                    row.starred = starred;
                }
            },
            |service| service.set_starred(id, starred),
        )?;
        Ok(starred)
    }

    pub fn set_notes(&mut self, id: &RowId, notes: &str) -> Result<()> {
        self.require_loaded(id)?;
        self.mutate(
            "notes",
            id,
            |rows| {
                if let Some(row) = rows.find_mut(id) {
                    row.notes = notes.to_owned();
                }
            },
            |service| service.set_notes(id, notes),
        )
    }

    pub fn set_archive_outcome(&mut self, id: &RowId, outcome: ArchiveOutcome) -> Result<()> {
        let (view, _) = self.require_loaded(id)?;
        if view != RowView::Archived {
            bail!("row {id} is not archived -- archive it before setting an outcome");
        }
        self.mutate(
            "set outcome",
            id,
            |rows| {
                if let Some(row) = rows.find_mut(id) {
                    row.archive_result = Some(outcome);
                }
            },
            |service| service.set_archive_outcome(id, outcome),
        )
    }

    pub fn archive(&mut self, id: &RowId, outcome: ArchiveOutcome, assignee: &str) -> Result<()> {
        let (view, _) = self.require_loaded(id)?;
        if view != RowView::Active {
            bail!("row {id} is already archived");
        }
        let assignee = assignee.trim().to_owned();
        self.mutate(
            "archive",
            id,
            |rows| {
                if let Some((_, mut row)) = rows.remove(id) {
                    row.archive_result = Some(outcome);
                    row.assigned_to = assignee.clone();
                    rows.archived.push(row);
                }
            },
            |service| service.archive_row(id, outcome, &assignee),
        )
    }

    pub fn unarchive(&mut self, id: &RowId) -> Result<()> {
        let (view, _) = self.require_loaded(id)?;
        if view != RowView::Archived {
            bail!("row {id} is not archived");
        }
        self.mutate(
            "unarchive",
            id,
            |rows| {
                if let Some((_, mut row)) = rows.remove(id) {
                    row.archive_result = None;
                    rows.active.push(row);
                }
            },
            |service| service.unarchive_row(id),
        )
    }

    pub fn delete(&mut self, id: &RowId) -> Result<()> {
        self.require_loaded(id)?;
        self.mutate(
            "delete",
            id,
            |rows| {
                rows.remove(id);
            },
            |service| service.delete_row(id),
        )
    }

    /// The duplicate check sees loaded rows only; rows hidden by an assignee
    /// filter are caught by the server's own uniqueness check instead.
    pub fn submit_new(&mut self, input: &InvoiceFormInput) -> Result<SubmitOutcome> {
        let errors = input.validate();
        if !errors.is_valid() {
            return Ok(SubmitOutcome::Invalid(errors));
        }
        let fields = input.to_fields();
        if self.rows.contains_external_ref(&fields.external_ref) {
            return Ok(SubmitOutcome::Invalid(duplicate_error(&fields.external_ref)));
        }
        let id = RowId::pending(&fields.external_ref);
        self.mutate(
            "create",
            &id,
            |rows| rows.active.push(Row::new(id.clone(), fields.clone())),
            |service| service.create_row(&fields),
        )?;
        Ok(SubmitOutcome::Saved)
    }

    /// Same loaded-rows duplicate check as [`Self::submit_new`].
    pub fn submit_edit(&mut self, id: &RowId, input: &InvoiceFormInput) -> Result<SubmitOutcome> {
        self.require_loaded(id)?;
        let errors = input.validate();
        if !errors.is_valid() {
            return Ok(SubmitOutcome::Invalid(errors));
        }
        let fields = input.to_fields();
        let taken = self
            .rows
            .all()
            .any(|row| &row.id != id && row.external_ref() == fields.external_ref);
        if taken {
            return Ok(SubmitOutcome::Invalid(duplicate_error(&fields.external_ref)));
        }
        self.mutate(
            "edit",
            id,
            |rows| {
                if let Some(row) = rows.find_mut(id) {
                    row.fields = fields.clone();
                }
            },
            |service| service.edit_row(id, &fields),
        )?;
        Ok(SubmitOutcome::Saved)
    }

    /// Save the open note editor and close it.
    pub fn save_note_draft(&mut self) -> Result<()> {
        let Some(draft) = self.state.popups.note.take() else {
            return Ok(());
        };
        if let Err(error) = self.set_notes(&draft.row_id, &draft.text) {
            self.state.popups.note = Some(draft);
            return Err(error);
        }
        self.set_status(format!("note saved on row {}", draft.row_id));
        Ok(())
    }

    pub fn confirm_archive_draft(&mut self) -> Result<()> {
        let Some(draft) = self.state.popups.archive.take() else {
            return Ok(());
        };
        self.archive(&draft.row_id, draft.outcome, &draft.assignee)?;
        self.set_status(format!(
            "archived row {} as {}",
            draft.row_id,
            draft.outcome.label()
        ));
        Ok(())
    }

    pub fn confirm_delete(&mut self) -> Result<()> {
        let Some(id) = self.state.popups.confirm_delete.take() else {
            return Ok(());
        };
        self.delete(&id)?;
        self.set_status(format!("deleted row {id}"));
        Ok(())
    }

    /// Submit the open form. Validation problems stay inline on the form;
    /// a saved form closes.
    pub fn submit_form(&mut self) -> Result<SubmitOutcome> {
        let Some(draft) = self.state.popups.form.clone() else {
            return Ok(SubmitOutcome::Saved);
        };
        let outcome = match &draft.mode {
            FormMode::Create => self.submit_new(&draft.input)?,
            FormMode::Edit(id) => self.submit_edit(id, &draft.input)?,
        };
        match &outcome {
            SubmitOutcome::Saved => {
                self.state.popups.form = None;
                let message = match draft.mode {
                    FormMode::Create => "invoice added".to_owned(),
                    FormMode::Edit(id) => format!("row {id} updated"),
                };
                self.set_status(message);
            }
            SubmitOutcome::Invalid(errors) => {
                self.state.dispatch(ViewCommand::SetFormErrors(errors.clone()));
            }
        }
        Ok(outcome)
    }

    fn set_status(&mut self, message: String) {
        self.state.dispatch(ViewCommand::SetStatus(message));
    }

    fn require_loaded(&self, id: &RowId) -> Result<(RowView, bool)> {
        if id.is_pending() {
            bail!("row {id} is still being saved -- refresh and retry");
        }
        match self.rows.find(id) {
            Some((view, row)) => Ok((view, row.starred)),
            None => bail!("row {id} is not loaded -- refresh and retry"),
        }
    }

    fn mutate(
        &mut self,
        action: &str,
        id: &RowId,
        apply: impl FnOnce(&mut RowSets),
        write: impl FnOnce(&mut S) -> Result<()>,
    ) -> Result<()> {
        let snapshot = self.rows.clone();
        apply(&mut self.rows);
        self.clamp_selection();

        if let Err(error) = write(&mut self.service) {
            warn!(action, row = %id, error = %format!("{error:#}"), "write failed; rolled back");
            self.rows = snapshot;
            self.clamp_selection();
            return Err(error.context(format!("{action} row {id}")));
        }
        info!(action, row = %id, "write saved");
        self.refresh()
            .with_context(|| format!("{action} row {id} was saved, but reloading failed"))
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        self.state.selected = self.state.selected.min(len.saturating_sub(1));
    }
}

fn duplicate_error(external_ref: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.insert(
        FormField::ExternalRef,
        format!("invoice number {external_ref} already exists"),
    );
    errors
}
