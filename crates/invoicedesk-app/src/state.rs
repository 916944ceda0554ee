// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{
    ArchiveOutcome, AssigneeFilter, FieldErrors, FilterState, FormField, InvoiceFormInput, RowId,
    RowView, SelectedFile, UploadReport,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormMode {
    Create,
    Edit(RowId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    pub mode: FormMode,
    pub input: InvoiceFormInput,
    pub field: FormField,
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub row_id: RowId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDraft {
    pub row_id: RowId,
    pub outcome: ArchiveOutcome,
    pub assignee: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupKind {
    Alert,
    ConfirmDelete,
    Archive,
    Note,
    Form,
    UploadPrompt,
    UploadReport,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopupState {
    pub alert: Option<String>,
    pub confirm_delete: Option<RowId>,
    pub archive: Option<ArchiveDraft>,
    pub note: Option<NoteDraft>,
    pub form: Option<FormDraft>,
    pub upload_prompt: Option<String>,
    pub search_input: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadState {
    pub selected: Vec<SelectedFile>,
    pub in_flight: bool,
    pub report: Option<UploadReport>,
}

/// Everything the row view shows besides the rows themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub view: RowView,
    pub filter: FilterState,
    pub upload: UploadState,
    pub popups: PopupState,
    pub selected: usize,
    pub status_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SetView(RowView),
    ToggleView,
    CycleSearchField,
    StartSearch,
    EndSearch,
    ClearSearch,
    ToggleStarredOnly,
    CycleOutcomeFilter,
    SetAssigneeFilter(AssigneeFilter),
    Select(usize),
    InputChar(char),
    InputBackspace,
    OpenNote { row_id: RowId, text: String },
    OpenCreateForm,
    OpenEditForm { row_id: RowId, input: InvoiceFormInput },
    MoveFormField(isize),
    SetFormErrors(FieldErrors),
    OpenArchive { row_id: RowId, assignee: String },
    CycleArchiveOutcome,
    SetArchiveAssignee(String),
    ConfirmDelete(RowId),
    OpenUploadPrompt,
    UploadStarted(Vec<SelectedFile>),
    UploadFinished(Option<UploadReport>),
    ShowAlert(String),
    ClosePopup,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    ViewChanged(RowView),
    FilterChanged,
    AssigneeFilterChanged(AssigneeFilter),
    SelectionChanged(usize),
    PopupOpened(PopupKind),
    PopupClosed(PopupKind),
    InputEdited,
    UploadChanged { in_flight: bool },
    StatusUpdated(String),
    StatusCleared,
}

impl ViewEvent {
    /// Whether the row collections must be re-read after this event.
    pub const fn needs_refresh(&self) -> bool {
        matches!(self, Self::ViewChanged(_) | Self::AssigneeFilterChanged(_))
    }
}

impl ViewState {
    pub fn top_popup(&self) -> Option<PopupKind> {
        let popups = &self.popups;
        if popups.alert.is_some() {
            Some(PopupKind::Alert)
        } else if popups.confirm_delete.is_some() {
            Some(PopupKind::ConfirmDelete)
        } else if popups.archive.is_some() {
            Some(PopupKind::Archive)
        } else if popups.note.is_some() {
            Some(PopupKind::Note)
        } else if popups.form.is_some() {
            Some(PopupKind::Form)
        } else if popups.upload_prompt.is_some() {
            Some(PopupKind::UploadPrompt)
        } else if self.upload.report.is_some() {
            Some(PopupKind::UploadReport)
        } else if popups.search_input {
            Some(PopupKind::Search)
        } else {
            None
        }
    }

    pub fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SetView(view) => self.switch_view(view),
            ViewCommand::ToggleView => self.switch_view(self.view.toggled()),
            ViewCommand::CycleSearchField => {
                self.filter.search_field = self.filter.search_field.next();
                let label = format!("search by {}", self.filter.search_field.label());
                vec![ViewEvent::FilterChanged, self.set_status(label)]
            }
            ViewCommand::StartSearch => {
                self.popups.search_input = true;
                vec![ViewEvent::PopupOpened(PopupKind::Search)]
            }
            ViewCommand::EndSearch => {
                self.popups.search_input = false;
                vec![ViewEvent::PopupClosed(PopupKind::Search)]
            }
            ViewCommand::ClearSearch => {
                self.popups.search_input = false;
                self.filter.query.clear();
                self.selected = 0;
                vec![
                    ViewEvent::PopupClosed(PopupKind::Search),
                    ViewEvent::FilterChanged,
                ]
            }
            ViewCommand::ToggleStarredOnly => {
                self.filter.starred_only = !self.filter.starred_only;
                self.selected = 0;
                let label = if self.filter.starred_only {
                    "starred only"
                } else {
                    "all rows"
                };
                vec![ViewEvent::FilterChanged, self.set_status(label)]
            }
            ViewCommand::CycleOutcomeFilter => {
                self.filter.outcome = match self.filter.outcome {
                    None => Some(ArchiveOutcome::ALL[0]),
                    Some(outcome) if outcome == ArchiveOutcome::NoAnswer => None,
                    Some(outcome) => Some(outcome.next()),
                };
                self.selected = 0;
                let label = format!(
                    "outcome: {}",
                    self.filter.outcome.map_or("all", ArchiveOutcome::label)
                );
                vec![ViewEvent::FilterChanged, self.set_status(label)]
            }
            ViewCommand::SetAssigneeFilter(filter) => {
                if self.filter.assignees == filter {
                    return Vec::new();
                }
                self.filter.assignees = filter.clone();
                self.selected = 0;
                let label = format!("assigned: {}", filter.label());
                vec![
                    ViewEvent::AssigneeFilterChanged(filter),
                    self.set_status(label),
                ]
            }
            ViewCommand::Select(index) => {
                self.selected = index;
                vec![ViewEvent::SelectionChanged(index)]
            }
            ViewCommand::InputChar(ch) => self.edit_input(|text| text.push(ch)),
            ViewCommand::InputBackspace => self.edit_input(|text| {
                text.pop();
            }),
            ViewCommand::OpenNote { row_id, text } => {
                self.popups.note = Some(NoteDraft { row_id, text });
                vec![ViewEvent::PopupOpened(PopupKind::Note)]
            }
            ViewCommand::OpenCreateForm => {
                self.popups.form = Some(FormDraft {
                    mode: FormMode::Create,
                    input: InvoiceFormInput::default(),
                    field: FormField::Name,
                    errors: FieldErrors::default(),
                });
                vec![ViewEvent::PopupOpened(PopupKind::Form)]
            }
            ViewCommand::OpenEditForm { row_id, input } => {
                self.popups.form = Some(FormDraft {
                    mode: FormMode::Edit(row_id),
                    input,
                    field: FormField::Name,
                    errors: FieldErrors::default(),
                });
                vec![ViewEvent::PopupOpened(PopupKind::Form)]
            }
            ViewCommand::MoveFormField(delta) => {
                if let Some(form) = self.popups.form.as_mut() {
                    form.field = form.field.offset(delta);
                }
                Vec::new()
            }
            ViewCommand::SetFormErrors(errors) => {
                if let Some(form) = self.popups.form.as_mut() {
                    if let Some((field, _)) = errors.iter().next() {
                        form.field = field;
                    }
                    form.errors = errors;
                }
                Vec::new()
            }
            ViewCommand::OpenArchive { row_id, assignee } => {
                self.popups.archive = Some(ArchiveDraft {
                    row_id,
                    outcome: ArchiveOutcome::Loss,
                    assignee,
                });
                vec![ViewEvent::PopupOpened(PopupKind::Archive)]
            }
            ViewCommand::CycleArchiveOutcome => {
                if let Some(draft) = self.popups.archive.as_mut() {
                    draft.outcome = draft.outcome.next();
                }
                Vec::new()
            }
            ViewCommand::SetArchiveAssignee(assignee) => {
                if let Some(draft) = self.popups.archive.as_mut() {
                    draft.assignee = assignee;
                }
                Vec::new()
            }
            ViewCommand::ConfirmDelete(row_id) => {
                self.popups.confirm_delete = Some(row_id);
                vec![ViewEvent::PopupOpened(PopupKind::ConfirmDelete)]
            }
            ViewCommand::OpenUploadPrompt => {
                self.popups.upload_prompt = Some(String::new());
                vec![ViewEvent::PopupOpened(PopupKind::UploadPrompt)]
            }
            ViewCommand::UploadStarted(files) => {
                self.popups.upload_prompt = None;
                self.upload.selected = files;
                self.upload.in_flight = true;
                self.upload.report = None;
                vec![ViewEvent::UploadChanged { in_flight: true }]
            }
            ViewCommand::UploadFinished(report) => {
                self.upload.in_flight = false;
                self.upload.selected.clear();
                let mut events = vec![ViewEvent::UploadChanged { in_flight: false }];
                if report.is_some() {
                    events.push(ViewEvent::PopupOpened(PopupKind::UploadReport));
                }
                self.upload.report = report;
                events
            }
            ViewCommand::ShowAlert(message) => {
                self.popups.alert = Some(message);
                vec![ViewEvent::PopupOpened(PopupKind::Alert)]
            }
            ViewCommand::ClosePopup => self.close_top_popup(),
            ViewCommand::SetStatus(message) => vec![self.set_status(message)],
            ViewCommand::ClearStatus => {
                self.status_line = None;
                vec![ViewEvent::StatusCleared]
            }
        }
    }

    fn switch_view(&mut self, view: RowView) -> Vec<ViewEvent> {
        if self.view == view {
            return Vec::new();
        }
        self.view = view;
        self.selected = 0;
        self.popups.search_input = false;
        vec![
            ViewEvent::ViewChanged(view),
            self.set_status(format!("{} rows", view.label())),
        ]
    }

    fn edit_input(&mut self, edit: impl FnOnce(&mut String)) -> Vec<ViewEvent> {
        let popups = &mut self.popups;
        if let Some(form) = popups.form.as_mut()
            && popups.note.is_none()
            && popups.archive.is_none()
        {
            edit(form.input.get_mut(form.field));
            form.errors = FieldErrors::default();
            return vec![ViewEvent::InputEdited];
        }
        if let Some(note) = popups.note.as_mut() {
            edit(&mut note.text);
            return vec![ViewEvent::InputEdited];
        }
        if let Some(prompt) = popups.upload_prompt.as_mut() {
            edit(prompt);
            return vec![ViewEvent::InputEdited];
        }
        if popups.search_input {
            edit(&mut self.filter.query);
            self.selected = 0;
            return vec![ViewEvent::FilterChanged];
        }
        Vec::new()
    }

    fn close_top_popup(&mut self) -> Vec<ViewEvent> {
        let Some(kind) = self.top_popup() else {
            return Vec::new();
        };
        match kind {
            PopupKind::Alert => self.popups.alert = None,
            PopupKind::ConfirmDelete => self.popups.confirm_delete = None,
            PopupKind::Archive => self.popups.archive = None,
            PopupKind::Note => self.popups.note = None,
            PopupKind::Form => self.popups.form = None,
            PopupKind::UploadPrompt => self.popups.upload_prompt = None,
            PopupKind::UploadReport => self.upload.report = None,
            PopupKind::Search => self.popups.search_input = false,
        }
        vec![ViewEvent::PopupClosed(kind)]
    }

    fn set_status(&mut self, message: impl Into<String>) -> ViewEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        ViewEvent::StatusUpdated(message)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormMode, PopupKind, ViewCommand, ViewEvent, ViewState};
    use crate::{
        ArchiveOutcome, AssigneeFilter, FieldErrors, FormField, InvoiceFormInput, RowId, RowView,
        UploadReport,
    };

    #[test]
    fn toggling_view_requests_refresh() {
        let mut state = ViewState {
            selected: 4,
            ..ViewState::default()
        };

        let events = state.dispatch(ViewCommand::ToggleView);
        assert_eq!(state.view, RowView::Archived);
        assert_eq!(state.selected, 0);
        assert_eq!(
            events,
            vec![
                ViewEvent::ViewChanged(RowView::Archived),
                ViewEvent::StatusUpdated("archived rows".to_owned()),
            ]
        );
        assert!(events.iter().any(ViewEvent::needs_refresh));
    }

    #[test]
    fn setting_same_view_is_a_no_op() {
        let mut state = ViewState::default();
        assert!(state.dispatch(ViewCommand::SetView(RowView::Active)).is_empty());
    }

    #[test]
    fn assignee_filter_change_requests_refresh_once() {
        let mut state = ViewState::default();
        let filter = AssigneeFilter::only(["anna"]);

        let events = state.dispatch(ViewCommand::SetAssigneeFilter(filter.clone()));
        assert!(events.iter().any(ViewEvent::needs_refresh));
        assert!(
            state
                .dispatch(ViewCommand::SetAssigneeFilter(filter))
                .is_empty()
        );
    }

    #[test]
    fn local_filters_do_not_request_refresh() {
        let mut state = ViewState::default();
        for command in [
            ViewCommand::ToggleStarredOnly,
            ViewCommand::CycleOutcomeFilter,
            ViewCommand::CycleSearchField,
        ] {
            let events = state.dispatch(command);
            assert!(!events.iter().any(ViewEvent::needs_refresh));
        }
        assert!(state.filter.starred_only);
        assert_eq!(state.filter.outcome, Some(ArchiveOutcome::Loss));
    }

    #[test]
    fn outcome_filter_cycles_back_to_all() {
        let mut state = ViewState::default();
        for _ in 0..4 {
            state.dispatch(ViewCommand::CycleOutcomeFilter);
        }
        assert_eq!(state.filter.outcome, None);
    }

    #[test]
    fn typing_goes_to_the_focused_input() {
        let mut state = ViewState::default();

        state.dispatch(ViewCommand::StartSearch);
        state.dispatch(ViewCommand::InputChar('s'));
        state.dispatch(ViewCommand::InputChar('x'));
        state.dispatch(ViewCommand::InputBackspace);
        assert_eq!(state.filter.query, "s");

        state.dispatch(ViewCommand::OpenCreateForm);
        state.dispatch(ViewCommand::MoveFormField(1));
        state.dispatch(ViewCommand::InputChar('A'));
        let form = state.popups.form.as_ref().expect("form should be open");
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(form.input.recipient, "A");
        assert_eq!(state.filter.query, "s");

        state.dispatch(ViewCommand::OpenNote {
            row_id: RowId::from(1),
            text: "call".to_owned(),
        });
        state.dispatch(ViewCommand::InputChar('!'));
        assert_eq!(
            state.popups.note.as_ref().map(|note| note.text.as_str()),
            Some("call!")
        );
    }

    #[test]
    fn form_errors_focus_first_invalid_field_and_clear_on_edit() {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::OpenEditForm {
            row_id: RowId::from(9),
            input: InvoiceFormInput::default(),
        });

        let mut errors = FieldErrors::default();
        errors.insert(FormField::Amount, "bad");
        state.dispatch(ViewCommand::SetFormErrors(errors));
        let form = state.popups.form.as_ref().expect("form should be open");
        assert_eq!(form.field, FormField::Amount);
        assert!(!form.errors.is_valid());

        state.dispatch(ViewCommand::InputChar('1'));
        let form = state.popups.form.as_ref().expect("form should be open");
        assert!(form.errors.is_valid());
        assert_eq!(form.input.amount, "1");
    }

    #[test]
    fn close_popup_closes_topmost_first() {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::OpenCreateForm);
        state.dispatch(ViewCommand::ShowAlert("server down".to_owned()));
        assert_eq!(state.top_popup(), Some(PopupKind::Alert));

        assert_eq!(
            state.dispatch(ViewCommand::ClosePopup),
            vec![ViewEvent::PopupClosed(PopupKind::Alert)]
        );
        assert_eq!(state.top_popup(), Some(PopupKind::Form));
        state.dispatch(ViewCommand::ClosePopup);
        assert_eq!(state.top_popup(), None);
        assert!(state.dispatch(ViewCommand::ClosePopup).is_empty());
    }

    #[test]
    fn upload_lifecycle_tracks_in_flight_and_report() {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::OpenUploadPrompt);
        state.dispatch(ViewCommand::UploadStarted(Vec::new()));
        assert!(state.upload.in_flight);
        assert!(state.popups.upload_prompt.is_none());

        let events = state.dispatch(ViewCommand::UploadFinished(Some(UploadReport::default())));
        assert!(!state.upload.in_flight);
        assert!(events.contains(&ViewEvent::PopupOpened(PopupKind::UploadReport)));
        assert_eq!(state.top_popup(), Some(PopupKind::UploadReport));
    }

    #[test]
    fn archive_draft_cycles_outcome() {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::OpenArchive {
            row_id: RowId::from(2),
            assignee: "ben".to_owned(),
        });
        state.dispatch(ViewCommand::CycleArchiveOutcome);
        state.dispatch(ViewCommand::SetArchiveAssignee("clara".to_owned()));
        let draft = state.popups.archive.as_ref().expect("archive draft");
        assert_eq!(draft.outcome, ArchiveOutcome::Gain);
        assert_eq!(draft.assignee, "clara");
    }

    #[test]
    fn view_state_serializes() -> serde_json::Result<()> {
        let mut state = ViewState::default();
        state.dispatch(ViewCommand::OpenCreateForm);
        let encoded = serde_json::to_string(&state)?;
        let decoded: ViewState = serde_json::from_str(&encoded)?;
        assert_eq!(decoded, state);
        Ok(())
    }
}
