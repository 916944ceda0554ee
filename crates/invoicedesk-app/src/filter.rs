// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{ArchiveOutcome, Row, RowSets, RowView, SearchField, parse_amount};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssigneeFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl AssigneeFilter {
    pub fn only<I, S>(assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = assignees.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Only(set)
        }
    }

    /// `assigned_to` query value, or `None` when every row is wanted.
    pub fn query_value(&self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Only(set) => Some(set.iter().cloned().collect::<Vec<_>>().join(",")),
        }
    }

    pub fn matches(&self, assignee: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(assignee),
        }
    }

    pub fn label(&self) -> String {
        self.query_value().unwrap_or_else(|| "all".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub search_field: SearchField,
    pub query: String,
    pub starred_only: bool,
    /// Archived view only.
    pub outcome: Option<ArchiveOutcome>,
    /// Active view only; also narrows the fetch.
    pub assignees: AssigneeFilter,
}

impl FilterState {
    pub fn is_narrowing(&self, view: RowView) -> bool {
        !self.query.trim().is_empty()
            || self.starred_only
            || (view == RowView::Archived && self.outcome.is_some())
            || (view == RowView::Active && self.assignees != AssigneeFilter::All)
    }

    pub fn matches(&self, row: &Row, view: RowView) -> bool {
        if !matches_search(row, self.search_field, &self.query) {
            return false;
        }
        if self.starred_only && !row.starred {
            return false;
        }
        match view {
            RowView::Archived => self
                .outcome
                .is_none_or(|outcome| row.archive_result == Some(outcome)),
            RowView::Active => self.assignees.matches(&row.assigned_to),
        }
    }
}

pub fn matches_search(row: &Row, field: SearchField, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    field
        .value(&row.fields)
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Rows of `view` that pass every filter, in collection order.
pub fn visible_rows<'a>(rows: &'a RowSets, view: RowView, filter: &FilterState) -> Vec<&'a Row> {
    rows.rows(view)
        .iter()
        .filter(|row| filter.matches(row, view))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Totals {
    Active {
        displayed: f64,
    },
    Archived {
        loss: f64,
        gain: f64,
        no_answer: f64,
    },
}

/// The active total follows what is on screen; archived totals always cover
/// the whole archived collection.
pub fn totals(rows: &RowSets, view: RowView, displayed: &[&Row]) -> Totals {
    match view {
        RowView::Active => Totals::Active {
            displayed: displayed
                .iter()
                .map(|row| parse_amount(&row.fields.amount))
                .sum(),
        },
        RowView::Archived => {
            let sum_for = |outcome: ArchiveOutcome| -> f64 {
                rows.archived
                    .iter()
                    .filter(|row| row.archive_result == Some(outcome))
                    .map(|row| parse_amount(&row.fields.amount))
                    .sum()
            };
            Totals::Archived {
                loss: sum_for(ArchiveOutcome::Loss),
                gain: sum_for(ArchiveOutcome::Gain),
                no_answer: sum_for(ArchiveOutcome::NoAnswer),
            }
        }
    }
}
