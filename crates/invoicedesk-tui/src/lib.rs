// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use invoicedesk_app::{
    AmountTone, ArchiveDraft, ArchiveOutcome, AssigneeFilter, EXTRACTION_FAILED_MESSAGE,
    FormDraft, FormField, FormMode, InvoiceFormInput, NoteDraft, PopupKind, Row, RowService,
    RowView, RowViewController, SubmitOutcome, Totals, UploadOutcome, UploadReport, ViewCommand,
    display_amount, format_amount,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row as TableRow, Table, Wrap};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

const STAR_MARK: &str = "★";
const NOTE_MARK: &str = "✎";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Default)]
struct ViewData {
    status_token: u64,
}

pub fn run_app<S: RowService>(controller: &mut RowViewController<S>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = controller.refresh() {
        controller.show_error(&error);
    }

    let mut result = Ok(());
    loop {
        process_internal_events(controller, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, controller)) {
            result = Err(error).context("draw frame");
            break;
        }

        match next_key(|| event::poll(Duration::from_millis(120)), event::read) {
            Ok(Some(key)) => {
                if handle_key_event(controller, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Errors come back as values so the caller can still restore the terminal.
fn next_key(
    poll: impl FnOnce() -> io::Result<bool>,
    read: impl FnOnce() -> io::Result<Event>,
) -> Result<Option<KeyEvent>> {
    if !poll().context("poll event")? {
        return Ok(None);
    }
    match read().context("read event")? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn process_internal_events<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                report(controller, ViewCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    report(controller, ViewCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Dispatch and surface any fetch failure as an alert.
fn report<S: RowService>(controller: &mut RowViewController<S>, command: ViewCommand) {
    if let Err(error) = controller.dispatch(command) {
        controller.show_error(&error);
    }
}

fn handle_key_event<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match controller.state().top_popup() {
        Some(PopupKind::Alert | PopupKind::UploadReport) => {
            report(controller, ViewCommand::ClosePopup);
            false
        }
        Some(PopupKind::ConfirmDelete) => {
            if key.code == KeyCode::Char('y') {
                match controller.confirm_delete() {
                    Ok(()) => schedule_clear(view_data, internal_tx),
                    Err(error) => controller.show_error(&error),
                }
            } else {
                report(controller, ViewCommand::ClosePopup);
            }
            false
        }
        Some(PopupKind::Archive) => {
            handle_archive_key(controller, view_data, internal_tx, key);
            false
        }
        Some(PopupKind::Note) => {
            if key.code == KeyCode::Enter {
                match controller.save_note_draft() {
                    Ok(()) => schedule_clear(view_data, internal_tx),
                    Err(error) => controller.show_error(&error),
                }
            } else {
                handle_text_key(controller, key);
            }
            false
        }
        Some(PopupKind::Form) => {
            handle_form_key(controller, view_data, internal_tx, key);
            false
        }
        Some(PopupKind::UploadPrompt) => {
            if key.code == KeyCode::Enter {
                submit_upload_prompt(controller, view_data, internal_tx);
            } else {
                handle_text_key(controller, key);
            }
            false
        }
        Some(PopupKind::Search) => {
            match key.code {
                KeyCode::Enter => report(controller, ViewCommand::EndSearch),
                KeyCode::Esc => report(controller, ViewCommand::ClearSearch),
                _ => handle_text_key(controller, key),
            }
            false
        }
        None => handle_table_key(controller, view_data, internal_tx, key),
    }
}

/// Escape closes, backspace deletes, printable keys type.
fn handle_text_key<S: RowService>(controller: &mut RowViewController<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => report(controller, ViewCommand::ClosePopup),
        KeyCode::Backspace => report(controller, ViewCommand::InputBackspace),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            report(controller, ViewCommand::InputChar(ch));
        }
        _ => {}
    }
}

fn handle_archive_key<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('o') | KeyCode::Tab => report(controller, ViewCommand::CycleArchiveOutcome),
        KeyCode::Char('a') => {
            let current = controller
                .state()
                .popups
                .archive
                .as_ref()
                .map(|draft| draft.assignee.clone())
                .unwrap_or_default();
            let next = controller.next_assignee(&current);
            report(controller, ViewCommand::SetArchiveAssignee(next));
        }
        KeyCode::Enter => match controller.confirm_archive_draft() {
            Ok(()) => schedule_clear(view_data, internal_tx),
            Err(error) => controller.show_error(&error),
        },
        KeyCode::Esc => report(controller, ViewCommand::ClosePopup),
        _ => {}
    }
}

fn handle_form_key<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => report(controller, ViewCommand::MoveFormField(1)),
        KeyCode::BackTab | KeyCode::Up => report(controller, ViewCommand::MoveFormField(-1)),
        KeyCode::Enter => match controller.submit_form() {
            Ok(SubmitOutcome::Saved) => schedule_clear(view_data, internal_tx),
            Ok(SubmitOutcome::Invalid(errors)) => {
                let message = format!("fix {} field(s) before saving", errors.len());
                emit_status(controller, view_data, internal_tx, message);
            }
            Err(error) => controller.show_error(&error),
        },
        _ => handle_text_key(controller, key),
    }
}

/// Whitespace separates paths unless it sits inside double quotes.
fn split_paths(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            ch if ch.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                }
            }
            ch => current.push(ch),
        }
    }
    if !current.is_empty() {
        paths.push(PathBuf::from(current));
    }
    paths
}

fn submit_upload_prompt<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let paths = split_paths(
        controller
            .state()
            .popups
            .upload_prompt
            .as_deref()
            .unwrap_or_default(),
    );
    report(controller, ViewCommand::ClosePopup);
    debug!(files = paths.len(), "upload requested");
    match controller.upload(&paths) {
        Ok(UploadOutcome::ExtractionFailed) => {
            report(
                controller,
                ViewCommand::ShowAlert(EXTRACTION_FAILED_MESSAGE.to_owned()),
            );
        }
        Ok(UploadOutcome::Completed(summary)) => {
            let message = format!("{} new row(s) added", summary.added.len());
            emit_status(controller, view_data, internal_tx, message);
        }
        Err(error) => controller.show_error(&error),
    }
}

fn schedule_clear(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_table_key<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let view = controller.state().view;
    let selected = controller.selected_row().cloned();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => report(controller, ViewCommand::ToggleView),
        KeyCode::Char('/') => report(controller, ViewCommand::StartSearch),
        KeyCode::Char('s') => report(controller, ViewCommand::CycleSearchField),
        KeyCode::Char('*') => report(controller, ViewCommand::ToggleStarredOnly),
        KeyCode::Char('o') if view == RowView::Archived => {
            report(controller, ViewCommand::CycleOutcomeFilter);
        }
        KeyCode::Char('a') if view == RowView::Active => {
            let next =
                next_assignee_filter(&controller.state().filter.assignees, controller.roster());
            report(controller, ViewCommand::SetAssigneeFilter(next));
        }
        KeyCode::Char('j') | KeyCode::Down => controller.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => controller.move_selection(-1),
        KeyCode::Char('g') | KeyCode::Home => controller.move_selection(isize::MIN / 2),
        KeyCode::Char('G') | KeyCode::End => controller.move_selection(isize::MAX / 2),
        KeyCode::Char('r') => match controller.refresh() {
            Ok(()) => emit_status(controller, view_data, internal_tx, "reloaded"),
            Err(error) => controller.show_error(&error),
        },
        KeyCode::Char('c') => report(controller, ViewCommand::OpenCreateForm),
        KeyCode::Char('U') => report(controller, ViewCommand::OpenUploadPrompt),
        _ => {
            if let Some(row) = selected {
                handle_row_key(controller, view_data, internal_tx, &row, key);
            }
        }
    }
    false
}

fn handle_row_key<S: RowService>(
    controller: &mut RowViewController<S>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    row: &Row,
    key: KeyEvent,
) {
    let view = controller.state().view;
    let id = row.id.clone();
    let result = match key.code {
        KeyCode::Char(' ') => controller
            .toggle_star(&id)
            .map(|starred| String::from(if starred { "starred" } else { "unstarred" })),
        KeyCode::Char('A') => {
            let next = controller.next_assignee(&row.assigned_to);
            controller.assign(&id, &next).map(|()| {
                if next.is_empty() {
                    format!("row {id} unassigned")
                } else {
                    format!("row {id} assigned to {next}")
                }
            })
        }
        KeyCode::Char('O') if view == RowView::Archived => {
            let next = row
                .archive_result
                .map_or(ArchiveOutcome::Loss, ArchiveOutcome::next);
            controller
                .set_archive_outcome(&id, next)
                .map(|()| format!("outcome: {}", next.label()))
        }
        KeyCode::Char('u') if view == RowView::Archived => controller
            .unarchive(&id)
            .map(|()| format!("row {id} back in active")),
        KeyCode::Char('n') => {
            report(
                controller,
                ViewCommand::OpenNote {
                    row_id: id,
                    text: row.notes.clone(),
                },
            );
            return;
        }
        KeyCode::Char('x') if view == RowView::Active => {
            report(
                controller,
                ViewCommand::OpenArchive {
                    row_id: id,
                    assignee: row.assigned_to.clone(),
                },
            );
            return;
        }
        KeyCode::Char('e') => {
            report(
                controller,
                ViewCommand::OpenEditForm {
                    row_id: id,
                    input: InvoiceFormInput::from_row(row),
                },
            );
            return;
        }
        KeyCode::Char('d') => {
            report(controller, ViewCommand::ConfirmDelete(id));
            return;
        }
        _ => return,
    };
    match result {
        Ok(message) => emit_status(controller, view_data, internal_tx, message),
        Err(error) => controller.show_error(&error),
    }
}

/// All, then each roster member alone, then back to all.
fn next_assignee_filter(current: &AssigneeFilter, roster: &[String]) -> AssigneeFilter {
    let position = match current {
        AssigneeFilter::All => None,
        AssigneeFilter::Only(set) => roster
            .iter()
            .position(|name| set.len() == 1 && set.contains(name)),
    };
    let next = match (current, position) {
        (AssigneeFilter::All, _) => roster.first(),
        (AssigneeFilter::Only(_), Some(index)) => roster.get(index + 1),
        (AssigneeFilter::Only(_), None) => None,
    };
    next.map_or(AssigneeFilter::All, |name| {
        AssigneeFilter::only([name.clone()])
    })
}

fn render<S: RowService>(frame: &mut ratatui::Frame<'_>, controller: &RowViewController<S>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(controller))
        .block(Block::default().title("invoicedesk").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], controller);

    let status = Paragraph::new(status_text(controller))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    let state = controller.state();
    if let Some(form) = &state.popups.form {
        render_overlay(frame, form_title(form), render_form_overlay_text(form), 70, 60);
    }
    if let Some(prompt) = &state.popups.upload_prompt {
        let text = format!(
            "PDF paths, separated by spaces (quote paths containing spaces):\n\n{prompt}_\n\nenter upload | esc cancel"
        );
        render_overlay(frame, "upload", text, 70, 30);
    }
    if let Some(report) = &state.upload.report {
        render_overlay(frame, "upload report", render_upload_report_text(report), 70, 50);
    }
    if let Some(note) = &state.popups.note {
        render_overlay(frame, "note", render_note_overlay_text(note), 60, 35);
    }
    if let Some(draft) = &state.popups.archive {
        render_overlay(frame, "archive", render_archive_overlay_text(draft), 50, 30);
    }
    if let Some(id) = &state.popups.confirm_delete {
        let text = format!("delete row {id}?\n\ny confirm | any other key cancel");
        render_overlay(frame, "delete", text, 40, 20);
    }
    if let Some(alert) = &state.popups.alert {
        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(format!("{alert}\n\nany key dismiss"))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("error")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(widget, area);
    }
}

fn render_overlay(
    frame: &mut ratatui::Frame<'_>,
    title: &str,
    text: String,
    percent_x: u16,
    percent_y: u16,
) {
    let area = centered_rect(percent_x, percent_y, frame.area());
    frame.render_widget(Clear, area);
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title.to_owned()).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_table<S: RowService>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &RowViewController<S>,
) {
    let state = controller.state();
    let view = state.view;
    let columns = column_labels(view);
    let header = TableRow::new(columns.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = controller.visible_rows();
    let count = rows.len();
    let table_rows = rows.into_iter().enumerate().map(|(index, row)| {
        let selected = index == state.selected;
        let amount = display_amount(row, view);
        let cells = row_cells(row, view)
            .into_iter()
            .enumerate()
            .map(|(column, text)| {
                let mut style = Style::default();
                if column == AMOUNT_COLUMN {
                    style = style.fg(match amount.tone {
                        AmountTone::Gain => Color::Green,
                        AmountTone::Standard => Color::Red,
                    });
                }
                if selected {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                Cell::from(text).style(style)
            })
            .collect::<Vec<_>>();
        TableRow::new(cells)
    });

    let mut widths = vec![
        Constraint::Length(1),
        Constraint::Min(14),
        Constraint::Min(12),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(1),
    ];
    if view == RowView::Archived {
        widths.push(Constraint::Length(9));
    }

    let table = Table::new(table_rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(format!("{} ({count})", view.label()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

const AMOUNT_COLUMN: usize = 5;

fn column_labels(view: RowView) -> Vec<&'static str> {
    let mut labels = vec![
        "",
        "name",
        "recipient",
        "DZR no.",
        "invoice no.",
        "amount",
        "billed",
        "assignee",
        "",
    ];
    if view == RowView::Archived {
        labels.push("outcome");
    }
    labels
}

fn row_cells(row: &Row, view: RowView) -> Vec<String> {
    let fields = &row.fields;
    let mut cells = vec![
        if row.starred { STAR_MARK } else { "" }.to_owned(),
        fields.name.clone(),
        fields.recipient.clone(),
        fields.internal_ref.clone(),
        fields.external_ref.clone(),
        display_amount(row, view).text,
        fields.billing_date.clone(),
        row.assigned_to.clone(),
        if row.has_notes() { NOTE_MARK } else { "" }.to_owned(),
    ];
    if view == RowView::Archived {
        cells.push(
            row.archive_result
                .map(|outcome| outcome.label().to_owned())
                .unwrap_or_default(),
        );
    }
    cells
}

fn header_text<S: RowService>(controller: &RowViewController<S>) -> String {
    let state = controller.state();
    let filter = &state.filter;
    let mut parts = vec![format!("[{}]", state.view.label())];
    if !filter.query.is_empty() || state.popups.search_input {
        let cursor = if state.popups.search_input { "_" } else { "" };
        parts.push(format!(
            "{}: {}{cursor}",
            filter.search_field.label(),
            filter.query
        ));
    } else {
        parts.push(format!("search by {}", filter.search_field.label()));
    }
    if filter.starred_only {
        parts.push(format!("{STAR_MARK} only"));
    }
    match state.view {
        RowView::Active => parts.push(format!("assigned: {}", filter.assignees.label())),
        RowView::Archived => parts.push(format!(
            "outcome: {}",
            filter
                .outcome
                .map_or("all", ArchiveOutcome::label)
        )),
    }
    parts.push(totals_text(controller.totals()));
    parts.join(" | ")
}

fn totals_text(totals: Totals) -> String {
    match totals {
        Totals::Active { displayed } => format!("total {}", format_amount(displayed)),
        Totals::Archived {
            loss,
            gain,
            no_answer,
        } => format!(
            "loss {} | gain {} | no answer {}",
            format_amount(loss),
            format_amount(gain),
            format_amount(no_answer)
        ),
    }
}

fn status_text<S: RowService>(controller: &RowViewController<S>) -> String {
    let state = controller.state();
    if state.upload.in_flight {
        return format!("uploading {} file(s)", state.upload.selected.len());
    }
    let hints = match state.top_popup() {
        Some(PopupKind::Form) => "tab/shift+tab field | enter save | esc cancel",
        Some(PopupKind::Search) => "type to filter | enter keep | esc clear",
        Some(_) => "",
        None => match state.view {
            RowView::Active => {
                "tab archived | / s * a | j/k | space A n x e c d | U upload | r | q"
            }
            RowView::Archived => "tab active | / s * o | j/k | space A n O u e d | r | q",
        },
    };
    match &state.status_line {
        Some(status) if hints.is_empty() => status.clone(),
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}

fn form_title(form: &FormDraft) -> &'static str {
    match form.mode {
        FormMode::Create => "new invoice",
        FormMode::Edit(_) => "edit invoice",
    }
}

fn render_form_overlay_text(form: &FormDraft) -> String {
    let mut lines = Vec::new();
    for field in FormField::ALL {
        let marker = if field == form.field { ">" } else { " " };
        let cursor = if field == form.field { "_" } else { "" };
        lines.push(format!(
            "{marker} {:<18} {}{cursor}",
            field.label(),
            form.input.get(field)
        ));
        if let Some(message) = form.errors.get(field) {
            lines.push(format!("  {:<18} ! {message}", ""));
        }
    }
    lines.push(String::new());
    lines.push("tab/shift+tab field | enter save | esc cancel".to_owned());
    lines.join("\n")
}

fn render_note_overlay_text(note: &NoteDraft) -> String {
    format!(
        "row {}\n\n{}_\n\nenter save | esc cancel",
        note.row_id, note.text
    )
}

fn render_archive_overlay_text(draft: &ArchiveDraft) -> String {
    let assignee = if draft.assignee.is_empty() {
        "(unassigned)"
    } else {
        draft.assignee.as_str()
    };
    format!(
        "archive row {}\n\noutcome:  {}\nassignee: {assignee}\n\no outcome | a assignee | enter archive | esc cancel",
        draft.row_id,
        draft.outcome.label()
    )
}

fn render_upload_report_text(report: &UploadReport) -> String {
    let mut lines = report.lines();
    for fields in &report.added {
        lines.push(format!("+ {} ({})", fields.name, fields.external_ref));
    }
    lines.push(String::new());
    lines.push("any key close".to_owned());
    lines.join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
