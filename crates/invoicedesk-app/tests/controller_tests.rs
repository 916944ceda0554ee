// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use invoicedesk_app::{
    ArchiveOutcome, AssigneeFilter, FormField, InvalidFile, InvoiceFields, InvoiceFormInput,
    PopupKind, Row, RowId, RowSets, RowView, RowViewController, SelectedFile, SubmitOutcome,
    Totals, UploadOutcome, UploadResponse, ViewCommand,
};
use invoicedesk_testkit::{MemoryRowService, ServiceCall};
use std::path::PathBuf;

fn fields(external_ref: &str, name: &str, amount: &str) -> InvoiceFields {
    InvoiceFields {
        name: name.to_owned(),
        recipient: "Barmer".to_owned(),
        internal_ref: "123456/01/2026".to_owned(),
        external_ref: external_ref.to_owned(),
        amount: amount.to_owned(),
        billing_date: "01.02.2026".to_owned(),
    }
}

fn archived(id: i64, external_ref: &str, amount: &str, outcome: ArchiveOutcome) -> Row {
    let mut row = Row::new(RowId::from(id), fields(external_ref, "Archiv", amount));
    row.archive_result = Some(outcome);
    row
}

fn fixture_rows() -> RowSets {
    RowSets {
        active: vec![
            Row::new(RowId::from(1), fields("R1", "Schneider, Anna", "100,00")),
            Row::new(RowId::from(2), fields("R2", "Weber, Paul", "1.000,50")),
        ],
        archived: vec![
            archived(3, "R3", "200,00", ArchiveOutcome::Loss),
            archived(4, "R4", "-50,00", ArchiveOutcome::Gain),
        ],
    }
}

fn controller() -> Result<RowViewController<MemoryRowService>> {
    let service = MemoryRowService::new(fixture_rows());
    let roster = vec!["anna".to_owned(), "ben".to_owned()];
    let mut controller = RowViewController::new(service, roster, RowView::Active);
    controller.refresh()?;
    controller.service_mut().clear_calls();
    Ok(controller)
}

fn file(name: &str, size: u64) -> SelectedFile {
    SelectedFile {
        path: PathBuf::from(format!("/scans/{name}")),
        name: name.to_owned(),
        size,
    }
}

fn valid_input(external_ref: &str) -> InvoiceFormInput {
    InvoiceFormInput {
        name: " Koch, Lea ".to_owned(),
        recipient: "DAK-Gesundheit".to_owned(),
        internal_ref: "654321/03/2026".to_owned(),
        external_ref: external_ref.to_owned(),
        amount: "80,00".to_owned(),
        billing_date: "03.03.2026".to_owned(),
    }
}

#[test]
fn refresh_replaces_both_collections() -> Result<()> {
    let controller = controller()?;
    assert_eq!(controller.rows(), &fixture_rows());
    assert_eq!(controller.visible_rows().len(), 2);
    Ok(())
}

#[test]
fn toggling_view_refetches() -> Result<()> {
    let mut controller = controller()?;
    controller.dispatch(ViewCommand::ToggleView)?;
    assert_eq!(controller.state().view, RowView::Archived);
    assert!(matches!(
        controller.service().calls(),
        [ServiceCall::FetchRows(_)]
    ));
    assert_eq!(controller.visible_rows().len(), 2);
    Ok(())
}

#[test]
fn upload_drops_known_and_repeated_external_refs() -> Result<()> {
    let mut controller = controller()?;
    controller
        .service_mut()
        .queue_upload_response(UploadResponse {
            data: vec![
                fields("R1", "already active", "1,00"),
                fields("R3", "already archived", "1,00"),
                fields("R9", "first", "10,00"),
                fields("R9", "second", "20,00"),
                fields("R10", "other", "30,00"),
            ],
            invalid_files: vec![InvalidFile {
                filename: "blank.pdf".to_owned(),
                reason: "no data found".to_owned(),
            }],
            ..UploadResponse::default()
        });

    let outcome = controller.upload_files(vec![
        file("a.pdf", 10),
        file("a.pdf", 10),
        file("a.pdf", 12),
    ])?;
    let UploadOutcome::Completed(report) = outcome else {
        panic!("expected a completed upload");
    };

    let added: Vec<&str> = report
        .added
        .iter()
        .map(|fields| fields.name.as_str())
        .collect();
    assert_eq!(added, vec!["first", "other"]);
    assert_eq!(report.duplicates_dropped, 3);
    assert_eq!(
        report.invalid_files.get("no data found"),
        Some(&vec!["blank.pdf".to_owned()])
    );
    assert_eq!(
        controller.service().writes(),
        vec![&ServiceCall::Upload(vec!["a.pdf".to_owned(), "a.pdf".to_owned()])]
    );

    let state = controller.state();
    assert!(!state.upload.in_flight);
    assert_eq!(state.top_popup(), Some(PopupKind::UploadReport));
    assert_eq!(controller.rows().active.len(), 4);
    assert!(controller.rows().all().all(|row| !row.id.is_pending()));
    Ok(())
}

#[test]
fn extraction_failure_short_circuits() -> Result<()> {
    let mut controller = controller()?;
    controller
        .service_mut()
        .queue_upload_response(UploadResponse {
            ai_error: true,
            data: vec![fields("R42", "ignored", "1,00")],
            ..UploadResponse::default()
        });

    let outcome = controller.upload_files(vec![file("scan.pdf", 5)])?;
    assert_eq!(outcome, UploadOutcome::ExtractionFailed);
    assert_eq!(controller.rows(), &fixture_rows());
    assert!(!controller.state().upload.in_flight);
    assert!(controller.state().upload.report.is_none());
    Ok(())
}

#[test]
fn upload_transport_failure_clears_in_flight() -> Result<()> {
    let mut controller = controller()?;
    controller.service_mut().fail_writes(Some("connection refused"));

    let err = controller
        .upload_files(vec![file("scan.pdf", 5)])
        .expect_err("upload should fail");
    assert!(format!("{err:#}").contains("connection refused"));
    assert!(!controller.state().upload.in_flight);
    assert_eq!(controller.rows(), &fixture_rows());
    Ok(())
}

#[test]
fn empty_upload_is_rejected_without_a_call() -> Result<()> {
    let mut controller = controller()?;
    assert!(controller.upload_files(Vec::new()).is_err());
    assert!(controller.service().calls().is_empty());
    Ok(())
}

#[test]
fn star_toggle_sends_complement_each_time() -> Result<()> {
    let mut controller = controller()?;
    let id = RowId::from(1);

    assert!(controller.toggle_star(&id)?);
    assert!(!controller.toggle_star(&id)?);
    assert_eq!(
        controller.service().writes(),
        vec![
            &ServiceCall::SetStarred(id.clone(), true),
            &ServiceCall::SetStarred(id.clone(), false),
        ]
    );
    assert_eq!(controller.rows(), &fixture_rows());
    Ok(())
}

#[test]
fn failed_write_restores_collections() -> Result<()> {
    let mut controller = controller()?;
    controller.service_mut().fail_writes(Some("500 internal error"));

    let err = controller
        .archive(&RowId::from(1), ArchiveOutcome::Gain, "anna")
        .expect_err("archive should fail");
    assert!(format!("{err:#}").contains("archive row 1"));
    assert_eq!(controller.rows(), &fixture_rows());

    assert!(controller.toggle_star(&RowId::from(2)).is_err());
    assert!(controller.delete(&RowId::from(3)).is_err());
    assert!(controller.set_notes(&RowId::from(1), "x").is_err());
    assert_eq!(controller.rows(), &fixture_rows());
    Ok(())
}

#[test]
fn failed_refetch_keeps_optimistic_state() -> Result<()> {
    let mut controller = controller()?;
    controller.service_mut().fail_fetches(Some("timed out"));

    let err = controller
        .set_notes(&RowId::from(2), "reminder sent")
        .expect_err("refetch should fail");
    assert!(format!("{err:#}").contains("reloading failed"));
    let (_, row) = controller
        .rows()
        .find(&RowId::from(2))
        .expect("row should stay loaded");
    assert_eq!(row.notes, "reminder sent");
    Ok(())
}

#[test]
fn archive_is_one_write_and_moves_the_row() -> Result<()> {
    let mut controller = controller()?;
    let id = RowId::from(2);

    controller.archive(&id, ArchiveOutcome::NoAnswer, "ben")?;
    assert_eq!(
        controller.service().writes(),
        vec![&ServiceCall::Archive {
            id: id.clone(),
            outcome: ArchiveOutcome::NoAnswer,
            assignee: "ben".to_owned(),
        }]
    );
    let (view, row) = controller.rows().find(&id).expect("row should exist");
    assert_eq!(view, RowView::Archived);
    assert_eq!(row.archive_result, Some(ArchiveOutcome::NoAnswer));
    assert_eq!(row.assigned_to, "ben");
    assert!(controller.rows().active.iter().all(|row| row.id != id));
    Ok(())
}

#[test]
fn archive_state_machine_rejects_wrong_side() -> Result<()> {
    let mut controller = controller()?;

    assert!(
        controller
            .archive(&RowId::from(3), ArchiveOutcome::Loss, "anna")
            .is_err()
    );
    assert!(controller.unarchive(&RowId::from(1)).is_err());
    assert!(
        controller
            .set_archive_outcome(&RowId::from(1), ArchiveOutcome::Gain)
            .is_err()
    );
    assert!(controller.service().calls().is_empty());

    controller.unarchive(&RowId::from(3))?;
    let (view, row) = controller
        .rows()
        .find(&RowId::from(3))
        .expect("row should exist");
    assert_eq!(view, RowView::Active);
    assert_eq!(row.archive_result, None);
    Ok(())
}

#[test]
fn outcome_change_applies_to_archived_rows() -> Result<()> {
    let mut controller = controller()?;
    controller.set_archive_outcome(&RowId::from(3), ArchiveOutcome::Gain)?;
    controller.dispatch(ViewCommand::ToggleView)?;
    assert_eq!(
        controller.totals(),
        Totals::Archived {
            loss: 0.0,
            gain: 150.0,
            no_answer: 0.0,
        }
    );
    Ok(())
}

#[test]
fn unknown_rows_are_rejected() -> Result<()> {
    let mut controller = controller()?;
    let err = controller
        .toggle_star(&RowId::from(99))
        .expect_err("unknown row should fail");
    assert!(err.to_string().contains("refresh and retry"));
    assert!(controller.service().calls().is_empty());
    Ok(())
}

#[test]
fn invalid_submission_issues_no_call() -> Result<()> {
    let mut controller = controller()?;
    let outcome = controller.submit_new(&InvoiceFormInput::default())?;
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("blank form should be invalid");
    };
    assert_eq!(errors.len(), FormField::ALL.len());
    assert!(controller.service().calls().is_empty());
    Ok(())
}

#[test]
fn duplicate_external_ref_is_caught_before_the_call() -> Result<()> {
    let mut controller = controller()?;
    let outcome = controller.submit_new(&valid_input(" R3 "))?;
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("duplicate should be invalid");
    };
    assert_eq!(
        errors.get(FormField::ExternalRef),
        Some("invoice number R3 already exists")
    );
    assert!(controller.service().calls().is_empty());
    Ok(())
}

#[test]
fn duplicate_hidden_by_assignee_filter_is_rejected_by_the_server() -> Result<()> {
    let mut controller = controller()?;
    controller.dispatch(ViewCommand::SetAssigneeFilter(AssigneeFilter::only(["anna"])))?;
    assert!(controller.rows().active.is_empty());
    controller.service_mut().clear_calls();

    let error = controller
        .submit_new(&valid_input("R1"))
        .expect_err("server should refuse the hidden duplicate");
    assert!(format!("{error:#}").contains("invoice number R1 already exists"));
    assert_eq!(
        controller.service().writes(),
        vec![&ServiceCall::Create(valid_input("R1").to_fields())]
    );
    assert!(controller.rows().active.is_empty());
    Ok(())
}

#[test]
fn manual_entry_sends_trimmed_fields() -> Result<()> {
    let mut controller = controller()?;
    assert_eq!(
        controller.submit_new(&valid_input("R77"))?,
        SubmitOutcome::Saved
    );

    let sent = valid_input("R77").to_fields();
    assert_eq!(sent.name, "Koch, Lea");
    assert_eq!(
        controller.service().writes(),
        vec![&ServiceCall::Create(sent)]
    );
    let created = controller
        .rows()
        .active
        .iter()
        .find(|row| row.external_ref() == "R77")
        .expect("created row should be fetched");
    assert_eq!(created.id, RowId::from(5));
    Ok(())
}

#[test]
fn edit_may_keep_its_own_external_ref() -> Result<()> {
    let mut controller = controller()?;
    let mut input = valid_input("R1");
    input.amount = "120,00".to_owned();

    assert_eq!(
        controller.submit_edit(&RowId::from(1), &input)?,
        SubmitOutcome::Saved
    );
    let clash = controller.submit_edit(&RowId::from(1), &valid_input("R2"))?;
    assert!(matches!(clash, SubmitOutcome::Invalid(_)));
    assert_eq!(controller.service().writes().len(), 1);
    Ok(())
}

#[test]
fn form_submission_closes_or_shows_errors() -> Result<()> {
    let mut controller = controller()?;
    controller.dispatch(ViewCommand::OpenCreateForm)?;
    controller.submit_form()?;
    let form = controller
        .state()
        .popups
        .form
        .as_ref()
        .expect("invalid form stays open");
    assert!(!form.errors.is_valid());

    controller.dispatch(ViewCommand::OpenEditForm {
        row_id: RowId::from(2),
        input: valid_input("R2"),
    })?;
    assert_eq!(controller.submit_form()?, SubmitOutcome::Saved);
    assert!(controller.state().popups.form.is_none());
    assert_eq!(controller.state().status_line.as_deref(), Some("row 2 updated"));
    Ok(())
}

#[test]
fn drafts_drive_note_archive_and_delete() -> Result<()> {
    let mut controller = controller()?;

    controller.dispatch(ViewCommand::OpenNote {
        row_id: RowId::from(1),
        text: String::new(),
    })?;
    for ch in "call back".chars() {
        controller.dispatch(ViewCommand::InputChar(ch))?;
    }
    controller.save_note_draft()?;
    assert!(controller.state().popups.note.is_none());

    controller.dispatch(ViewCommand::OpenArchive {
        row_id: RowId::from(1),
        assignee: "anna".to_owned(),
    })?;
    controller.dispatch(ViewCommand::CycleArchiveOutcome)?;
    controller.confirm_archive_draft()?;

    controller.dispatch(ViewCommand::ConfirmDelete(RowId::from(2)))?;
    controller.confirm_delete()?;

    let rows = controller.rows();
    assert!(rows.active.is_empty());
    let (_, row) = rows.find(&RowId::from(1)).expect("archived row");
    assert_eq!(row.notes, "call back");
    assert_eq!(row.archive_result, Some(ArchiveOutcome::Gain));
    Ok(())
}

#[test]
fn failed_note_save_keeps_the_draft_open() -> Result<()> {
    let mut controller = controller()?;
    controller.service_mut().fail_writes(Some("offline"));
    controller.dispatch(ViewCommand::OpenNote {
        row_id: RowId::from(1),
        text: "keep me".to_owned(),
    })?;

    assert!(controller.save_note_draft().is_err());
    assert_eq!(
        controller
            .state()
            .popups
            .note
            .as_ref()
            .map(|note| note.text.as_str()),
        Some("keep me")
    );
    Ok(())
}

#[test]
fn active_total_follows_filters_and_archived_totals_do_not() -> Result<()> {
    let mut controller = controller()?;
    assert_eq!(controller.totals(), Totals::Active { displayed: 1100.5 });

    controller.dispatch(ViewCommand::StartSearch)?;
    for ch in "weber".chars() {
        controller.dispatch(ViewCommand::InputChar(ch))?;
    }
    assert_eq!(controller.totals(), Totals::Active { displayed: 1000.5 });

    controller.dispatch(ViewCommand::ToggleView)?;
    assert!(controller.visible_rows().is_empty());
    assert_eq!(
        controller.totals(),
        Totals::Archived {
            loss: 200.0,
            gain: -50.0,
            no_answer: 0.0,
        }
    );
    Ok(())
}

#[test]
fn selection_stays_within_displayed_rows() -> Result<()> {
    let mut controller = controller()?;
    controller.move_selection(5);
    assert_eq!(controller.state().selected, 1);
    controller.delete(&RowId::from(2))?;
    assert_eq!(controller.state().selected, 0);
    assert_eq!(
        controller.selected_row().map(|row| row.id.clone()),
        Some(RowId::from(1))
    );
    Ok(())
}

#[test]
fn next_assignee_cycles_through_roster_and_unassigned() -> Result<()> {
    let controller = controller()?;
    assert_eq!(controller.next_assignee(""), "anna");
    assert_eq!(controller.next_assignee("anna"), "ben");
    assert_eq!(controller.next_assignee("ben"), "");
    assert_eq!(controller.next_assignee("someone else"), "anna");
    Ok(())
}
