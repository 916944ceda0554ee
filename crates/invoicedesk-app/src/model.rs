// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};

use crate::amount::format_amount;
use crate::ids::RowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArchiveOutcome {
    Loss,
    Gain,
    NoAnswer,
}

impl ArchiveOutcome {
    pub const ALL: [Self; 3] = [Self::Loss, Self::Gain, Self::NoAnswer];

    /// Value the backend stores in `archive_result`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loss => "red",
            Self::Gain => "green",
            Self::NoAnswer => "orange",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "red" => Some(Self::Loss),
            "green" => Some(Self::Gain),
            "orange" => Some(Self::NoAnswer),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Loss => "loss",
            Self::Gain => "gain",
            Self::NoAnswer => "no answer",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|outcome| *outcome == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RowView {
    #[default]
    Active,
    Archived,
}

impl RowView {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Archived,
            Self::Archived => Self::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SearchField {
    #[default]
    Name,
    InternalRef,
    ExternalRef,
    BillingDate,
}

impl SearchField {
    pub const ALL: [Self; 4] = [
        Self::Name,
        Self::InternalRef,
        Self::ExternalRef,
        Self::BillingDate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::InternalRef => "DZR no.",
            Self::ExternalRef => "invoice no.",
            Self::BillingDate => "billing date",
        }
    }

    pub fn value(self, fields: &InvoiceFields) -> &str {
        match self {
            Self::Name => &fields.name,
            Self::InternalRef => &fields.internal_ref,
            Self::ExternalRef => &fields.external_ref,
            Self::BillingDate => &fields.billing_date,
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// The six extracted invoice fields, keyed on the wire exactly as the
/// backend names them. Used for extracted rows, edits, and manual entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceFields {
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(
        rename = "Rechnungsempfängers",
        default,
        deserialize_with = "lenient_text"
    )]
    pub recipient: String,
    #[serde(rename = "Rechnungs-Nr. DZR", default, deserialize_with = "lenient_text")]
    pub internal_ref: String,
    #[serde(
        rename = "Ihre Rechnungs-Nr.",
        default,
        deserialize_with = "lenient_text"
    )]
    pub external_ref: String,
    #[serde(rename = "Betrag", default, deserialize_with = "lenient_amount")]
    pub amount: String,
    #[serde(rename = "Billing Date", default, deserialize_with = "lenient_text")]
    pub billing_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(flatten)]
    pub fields: InvoiceFields,
    #[serde(default, deserialize_with = "lenient_text")]
    pub assigned_to: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub starred: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(
        default,
        deserialize_with = "lenient_outcome",
        serialize_with = "serialize_outcome"
    )]
    pub archive_result: Option<ArchiveOutcome>,
}

impl Row {
    pub fn new(id: RowId, fields: InvoiceFields) -> Self {
        Self {
            id,
            fields,
            assigned_to: String::new(),
            starred: false,
            notes: String::new(),
            archive_result: None,
        }
    }

    pub fn external_ref(&self) -> &str {
        &self.fields.external_ref
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }
}

/// Both row collections as returned by `GET /api/rows`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowSets {
    #[serde(default)]
    pub active: Vec<Row>,
    #[serde(default)]
    pub archived: Vec<Row>,
}

impl RowSets {
    pub fn rows(&self, view: RowView) -> &[Row] {
        match view {
            RowView::Active => &self.active,
            RowView::Archived => &self.archived,
        }
    }

    pub fn rows_mut(&mut self, view: RowView) -> &mut Vec<Row> {
        match view {
            RowView::Active => &mut self.active,
            RowView::Archived => &mut self.archived,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &Row> {
        self.active.iter().chain(self.archived.iter())
    }

    pub fn contains_external_ref(&self, external_ref: &str) -> bool {
        self.all().any(|row| row.external_ref() == external_ref)
    }

    pub fn find(&self, id: &RowId) -> Option<(RowView, &Row)> {
        [RowView::Active, RowView::Archived]
            .into_iter()
            .find_map(|view| {
                self.rows(view)
                    .iter()
                    .find(|row| &row.id == id)
                    .map(|row| (view, row))
            })
    }

    pub fn find_mut(&mut self, id: &RowId) -> Option<&mut Row> {
        self.active
            .iter_mut()
            .chain(self.archived.iter_mut())
            .find(|row| &row.id == id)
    }

    pub fn remove(&mut self, id: &RowId) -> Option<(RowView, Row)> {
        for view in [RowView::Active, RowView::Archived] {
            let rows = self.rows_mut(view);
            if let Some(index) = rows.iter().position(|row| &row.id == id) {
                return Some((view, rows.remove(index)));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.archived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.archived.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawText>::deserialize(deserializer)? {
        Some(RawText::Text(value)) => value,
        Some(RawText::Integer(value)) => value.to_string(),
        Some(RawText::Float(value)) => value.to_string(),
        Some(RawText::Null) | None => String::new(),
    })
}

/// Numeric amounts are rewritten in German notation so `parse_amount`
/// reads them back unchanged.
fn lenient_amount<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawText>::deserialize(deserializer)? {
        Some(RawText::Text(value)) => value,
        Some(RawText::Integer(value)) => format_amount(value as f64),
        Some(RawText::Float(value)) => format_amount(value),
        Some(RawText::Null) | None => String::new(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn lenient_outcome<'de, D>(deserializer: D) -> Result<Option<ArchiveOutcome>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ArchiveOutcome::parse))
}

fn serialize_outcome<S>(value: &Option<ArchiveOutcome>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(outcome) => serializer.serialize_str(outcome.as_str()),
        None => serializer.serialize_none(),
    }
}
