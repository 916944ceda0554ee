// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::{InvoiceFields, Row};

static INTERNAL_REF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:/[0-9]+)*$").expect("valid internal ref pattern"));
static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(?:[.,][0-9]+)?$").expect("valid amount pattern"));
static BILLING_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("valid billing date pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormField {
    Name,
    Recipient,
    InternalRef,
    ExternalRef,
    Amount,
    BillingDate,
}

impl FormField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Recipient,
        Self::InternalRef,
        Self::ExternalRef,
        Self::Amount,
        Self::BillingDate,
    ];

    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Recipient => "Rechnungsempfängers",
            Self::InternalRef => "Rechnungs-Nr. DZR",
            Self::ExternalRef => "Ihre Rechnungs-Nr.",
            Self::Amount => "Betrag",
            Self::BillingDate => "Billing Date",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Recipient => "recipient",
            Self::InternalRef => "DZR invoice no.",
            Self::ExternalRef => "your invoice no.",
            Self::Amount => "amount",
            Self::BillingDate => "billing date",
        }
    }

    pub fn offset(self, delta: isize) -> Self {
        let index = Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0) as isize;
        let len = Self::ALL.len() as isize;
        Self::ALL[(index + delta).rem_euclid(len) as usize]
    }
}

/// First violated rule per field. Empty means the form may be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn summary(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("{}: {message}", field.label()))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceFormInput {
    pub name: String,
    pub recipient: String,
    pub internal_ref: String,
    pub external_ref: String,
    pub amount: String,
    pub billing_date: String,
}

impl InvoiceFormInput {
    pub fn from_row(row: &Row) -> Self {
        let fields = &row.fields;
        Self {
            name: fields.name.clone(),
            recipient: fields.recipient.clone(),
            internal_ref: fields.internal_ref.clone(),
            external_ref: fields.external_ref.clone(),
            amount: fields.amount.clone(),
            billing_date: fields.billing_date.clone(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Recipient => &self.recipient,
            FormField::InternalRef => &self.internal_ref,
            FormField::ExternalRef => &self.external_ref,
            FormField::Amount => &self.amount,
            FormField::BillingDate => &self.billing_date,
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Recipient => &mut self.recipient,
            FormField::InternalRef => &mut self.internal_ref,
            FormField::ExternalRef => &mut self.external_ref,
            FormField::Amount => &mut self.amount,
            FormField::BillingDate => &mut self.billing_date,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in FormField::ALL {
            let value = self.get(field).trim();
            if value.is_empty() {
                errors.insert(field, format!("{} is required", field.label()));
                continue;
            }
            match field {
                FormField::InternalRef if !INTERNAL_REF_PATTERN.is_match(value) => {
                    errors.insert(
                        field,
                        "use digit groups separated by / (for example 123456/01/2024)",
                    );
                }
                FormField::Amount if !AMOUNT_PATTERN.is_match(value) => {
                    errors.insert(field, "use a number like -123,45 or 80,00");
                }
                FormField::BillingDate if !BILLING_DATE_PATTERN.is_match(value) => {
                    errors.insert(field, "use DD.MM.YYYY");
                }
                _ => {}
            }
        }
        errors
    }

    /// Trimmed wire payload for `edit` and `manual_entry`.
    pub fn to_fields(&self) -> InvoiceFields {
        InvoiceFields {
            name: self.name.trim().to_owned(),
            recipient: self.recipient.trim().to_owned(),
            internal_ref: self.internal_ref.trim().to_owned(),
            external_ref: self.external_ref.trim().to_owned(),
            amount: self.amount.trim().to_owned(),
            billing_date: self.billing_date.trim().to_owned(),
        }
    }
}
