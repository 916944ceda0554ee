// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod memory;

pub use memory::{MemoryRowService, ServiceCall};

use invoicedesk_app::{
    ArchiveOutcome, IncompleteEntry, InvalidFile, InvoiceFields, Row, RowId, RowSets,
    UploadResponse, format_amount,
};

const FIRST_NAMES: [&str; 16] = [
    "Anna", "Jonas", "Lea", "Lukas", "Marie", "Felix", "Sophie", "Paul", "Emma", "Leon", "Hannah",
    "Finn", "Mia", "Elias", "Lina", "Noah",
];
const LAST_NAMES: [&str; 18] = [
    "Müller", "Schmidt", "Schneider", "Fischer", "Weber", "Meyer", "Wagner", "Becker", "Schulz",
    "Hoffmann", "Koch", "Richter", "Klein", "Wolf", "Neumann", "Braun", "Zimmermann", "Krüger",
];
const RECIPIENTS: [&str; 10] = [
    "AOK Bayern",
    "Techniker Krankenkasse",
    "Barmer",
    "DAK-Gesundheit",
    "IKK classic",
    "KKH Kaufmännische Krankenkasse",
    "hkk Krankenkasse",
    "HEK Hanseatische Krankenkasse",
    "Allianz Private Krankenversicherung",
    "Debeka",
];
const EXTERNAL_PREFIXES: [&str; 8] = ["TK", "AOK", "BAR", "DAK", "IKK", "KKH", "HKK", "DEB"];
const NOTES: [&str; 6] = [
    "called, waiting for reply",
    "reminder sent",
    "partial payment received",
    "patient moved",
    "needs second opinion",
    "check with billing",
];

pub const DEMO_ROSTER: [&str; 3] = ["anna", "ben", "clara"];
const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible invoice rows. The same seed always yields
/// the same sequence.
#[derive(Debug, Clone)]
pub struct InvoiceFaker {
    rng: DeterministicRng,
    seed: u64,
    sequence: u32,
}

impl InvoiceFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            sequence: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn fields(&mut self) -> InvoiceFields {
        self.sequence += 1;
        let month = self.int_range(1, 12);
        let day = self.int_range(1, 28);
        let prefix = self.pick(&EXTERNAL_PREFIXES);
        InvoiceFields {
            name: format!("{}, {}", self.pick(&LAST_NAMES), self.pick(&FIRST_NAMES)),
            recipient: self.pick(&RECIPIENTS).to_owned(),
            internal_ref: format!(
                "{:06}/{month:02}/{REFERENCE_YEAR}",
                self.int_range(100_000, 999_999)
            ),
            external_ref: format!(
                "{prefix}-{REFERENCE_YEAR}-{:04}{:02}",
                self.int_range(1, 9_999),
                self.sequence % 100
            ),
            amount: self.amount(),
            billing_date: format!("{day:02}.{month:02}.{REFERENCE_YEAR}"),
        }
    }

    /// Amount text in the backend's German notation; a few are credits.
    pub fn amount(&mut self) -> String {
        let cents = self.int_range(1_500, 450_000) as f64;
        let sign = if self.int_n(8) == 0 { -1.0 } else { 1.0 };
        format_amount(sign * cents / 100.0)
    }

    pub fn row(&mut self, id: RowId) -> Row {
        let mut row = Row::new(id, self.fields());
        if self.rng.bool() {
            row.assigned_to = self.pick(&DEMO_ROSTER).to_owned();
        }
        row.starred = self.int_n(5) == 0;
        if self.int_n(3) == 0 {
            row.notes = self.pick(&NOTES).to_owned();
        }
        row
    }

    pub fn archived_row(&mut self, id: RowId) -> Row {
        let mut row = self.row(id);
        row.archive_result = Some(ArchiveOutcome::ALL[self.int_n(ArchiveOutcome::ALL.len())]);
        if row.assigned_to.is_empty() {
            row.assigned_to = self.pick(&DEMO_ROSTER).to_owned();
        }
        row
    }

    /// Numbered rows: active ids start at 1, archived ids follow.
    pub fn row_sets(&mut self, active: usize, archived: usize) -> RowSets {
        let mut rows = RowSets::default();
        for index in 0..active {
            rows.active.push(self.row(RowId::from(index as i64 + 1)));
        }
        for index in 0..archived {
            let id = RowId::from((active + index) as i64 + 1);
            rows.archived.push(self.archived_row(id));
        }
        rows
    }

    /// An extraction result for the given file names: one row per file,
    /// with the occasional unreadable or partially read file.
    pub fn upload_response(&mut self, filenames: &[String]) -> UploadResponse {
        let mut response = UploadResponse::default();
        for filename in filenames {
            match self.int_n(10) {
                0 => response.invalid_files.push(InvalidFile {
                    filename: filename.clone(),
                    reason: "no data found".to_owned(),
                }),
                1 => {
                    let fields = self.fields();
                    response
                        .incomplete_entries_with_names
                        .push(IncompleteEntry {
                            filename: filename.clone(),
                            added_names: vec![fields.name.clone()],
                        });
                    response.data.push(fields);
                }
                _ => response.data.push(self.fields()),
            }
        }
        response
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}
