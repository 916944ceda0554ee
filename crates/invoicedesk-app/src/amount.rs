// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ArchiveOutcome, Row, RowView};

/// Parse a textual amount written in German notation (`.` groups thousands,
/// `,` separates decimals). Anything unparseable counts as zero.
pub fn parse_amount(input: &str) -> f64 {
    let normalized: String = input
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, ',' | '.' | '-'))
        .filter(|ch| *ch != '.')
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Render with two decimals in German notation, e.g. `-1.234,50`.
pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as i64;
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    format!("{sign}{},{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTone {
    Gain,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayAmount {
    pub text: String,
    pub tone: AmountTone,
}

/// Archived gains show as a positive magnitude; every other row shows the
/// parsed value as-is. Stored amounts are never re-signed.
pub fn display_amount(row: &Row, view: RowView) -> DisplayAmount {
    let value = parse_amount(&row.fields.amount);
    if view == RowView::Archived && row.archive_result == Some(ArchiveOutcome::Gain) {
        return DisplayAmount {
            text: format!("+{}", format_amount(value.abs())),
            tone: AmountTone::Gain,
        };
    }
    DisplayAmount {
        text: format_amount(value),
        tone: AmountTone::Standard,
    }
}

#[cfg(test)]
mod tests {
    use super::{AmountTone, display_amount, format_amount, parse_amount};
    use crate::{ArchiveOutcome, InvoiceFields, Row, RowId, RowView};

    fn row_with_amount(amount: &str, outcome: Option<ArchiveOutcome>) -> Row {
        let mut row = Row::new(
            RowId::from(1),
            InvoiceFields {
                amount: amount.to_owned(),
                ..InvoiceFields::default()
            },
        );
        row.archive_result = outcome;
        row
    }

    #[test]
    fn parses_german_notation() {
        assert_eq!(parse_amount("1.234,56"), 1234.56);
        assert_eq!(parse_amount("-45,00"), -45.0);
        assert_eq!(parse_amount("EUR 2.000,10 €"), 2000.10);
    }

    #[test]
    fn empty_or_garbage_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount("--"), 0.0);
        assert_eq!(parse_amount("1,2,3"), 0.0);
    }

    #[test]
    fn dot_is_always_a_thousands_separator() {
        assert_eq!(parse_amount("12.34"), 1234.0);
    }

    #[test]
    fn formats_with_grouping_and_two_decimals() {
        assert_eq!(format_amount(1234.5), "1.234,50");
        assert_eq!(format_amount(-1_234_567.891), "-1.234.567,89");
        assert_eq!(format_amount(0.0), "0,00");
        assert_eq!(format_amount(-0.001), "0,00");
        assert_eq!(format_amount(999.0), "999,00");
    }

    #[test]
    fn archived_gain_renders_positive_magnitude() {
        let row = row_with_amount("-150,00", Some(ArchiveOutcome::Gain));
        let shown = display_amount(&row, RowView::Archived);
        assert_eq!(shown.text, "+150,00");
        assert_eq!(shown.tone, AmountTone::Gain);
    }

    #[test]
    fn other_rows_render_parsed_value() {
        let loss = row_with_amount("-150,00", Some(ArchiveOutcome::Loss));
        let shown = display_amount(&loss, RowView::Archived);
        assert_eq!(shown.text, "-150,00");
        assert_eq!(shown.tone, AmountTone::Standard);

        let active = row_with_amount("80,00", Some(ArchiveOutcome::Gain));
        assert_eq!(display_amount(&active, RowView::Active).tone, AmountTone::Standard);
    }
}
